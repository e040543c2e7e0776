use crate::commands::{activation_for, registry_for};
use crate::core::config::Config;
use crate::error::Result;

pub fn list_versions() -> Result<()> {
    let config = Config::load()?;
    let registry = registry_for(&config);
    let status = activation_for(&config).status();

    let versions = registry.list_installed()?;

    if versions.is_empty() {
        println!("No Node.js versions installed.");
        println!();
        println!("To install a version, run:");
        println!("  nodeswap install <version>");
        return Ok(());
    }

    let active = status.active_version();
    for installed in &versions {
        let marker = if Some(installed.version) == active {
            "* "
        } else {
            "  "
        };
        println!("{marker}{}", installed.version);
    }

    if !status.is_healthy() {
        println!();
        println!("⚠️  {status}");
    }

    Ok(())
}
