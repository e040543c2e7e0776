use crate::commands::{activation_for, registry_for};
use crate::core::activation::ActivationManager;
use crate::core::config::Config;
use crate::core::link::SymlinkProvider;
use crate::core::registry::{InstalledVersion, Registry};
use crate::core::version;
use crate::error::{NodeSwapError, Result};

pub fn use_version(raw: &str) -> Result<()> {
    let config = Config::load()?;
    let registry = registry_for(&config);
    let manager = activation_for(&config);

    let installed = use_with(raw, &registry, &manager)?;

    println!("Now using Node.js {}", installed.version);
    Ok(())
}

/// Only `latest` or a fully qualified installed version is accepted here;
/// prefixes are an `install`-only convenience.
pub fn resolve_installed(raw: &str, registry: &Registry) -> Result<InstalledVersion> {
    if version::is_latest(raw) {
        return registry
            .find_latest()?
            .ok_or(NodeSwapError::NoVersionsInstalled);
    }

    let version = version::strict_parse(raw)?;
    registry
        .find_exact(&version)?
        .ok_or_else(|| NodeSwapError::NotInstalled {
            version: version.to_string(),
        })
}

pub fn use_with<S: SymlinkProvider>(
    raw: &str,
    registry: &Registry,
    manager: &ActivationManager<S>,
) -> Result<InstalledVersion> {
    let target = resolve_installed(raw, registry)?;

    let status = manager.status();
    if !status.is_healthy() {
        log::debug!("Found inconsistent active state before switching: {status:?}");
        eprintln!("⚠️  Previous active state was inconsistent ({status}); rewriting it");
    }

    manager.activate(&target)?;
    Ok(target)
}
