use crate::commands::{activation_for, registry_for};
use crate::core::activation::ActiveStatus;
use crate::core::config::Config;
use crate::core::version;
use crate::error::{NodeSwapError, Result};
use crate::utils::fs;
use dialoguer::Confirm;

pub fn uninstall_version(raw: &str, force: bool, yes: bool) -> Result<()> {
    let config = Config::load()?;
    let registry = registry_for(&config);
    let manager = activation_for(&config);

    let version = version::strict_parse(raw)?;
    let installed = registry
        .find_exact(&version)?
        .ok_or_else(|| NodeSwapError::NotInstalled {
            version: version.to_string(),
        })?;

    let is_active = match manager.status() {
        ActiveStatus::Active { path, .. } | ActiveStatus::Inconsistent { target: path, .. } => {
            path == installed.path
        }
        _ => false,
    };

    if is_active && !force {
        return Err(NodeSwapError::ActiveVersion {
            version: version.to_string(),
        });
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Uninstall Node.js {version}?"))
            .default(false)
            .interact()
            .map_err(|e| NodeSwapError::config_error(format!("could not read confirmation: {e}")))?;

        if !confirmed {
            println!("Uninstall cancelled.");
            return Ok(());
        }
    }

    if is_active {
        manager.deactivate()?;
        println!("Cleared the active version.");
    }

    log::debug!("Removing {}", installed.path.display());
    fs::remove_dir_recursive(&installed.path)?;

    println!("✅ Uninstalled Node.js {version}");
    Ok(())
}
