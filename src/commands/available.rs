use crate::commands::registry_for;
use crate::core::config::Config;
use crate::core::remote::{NodeDistCatalog, RemoteCatalog};
use crate::core::version::{self, Version, VersionSpec};
use crate::error::Result;

const DEFAULT_LIMIT: usize = 20;

pub fn list_available_versions(filter: Option<&str>, all: bool) -> Result<()> {
    let config = Config::load()?;
    let installed: Vec<Version> = registry_for(&config)
        .list_installed()?
        .into_iter()
        .map(|i| i.version)
        .collect();

    let spec = filter.map(version::parse).transpose()?;

    println!("Fetching available versions...");
    let catalog = NodeDistCatalog::new(config.mirror());
    let versions = filter_versions(catalog.list()?, spec.as_ref());

    if versions.is_empty() {
        println!("No published versions match.");
        return Ok(());
    }

    let shown = if all { versions.len() } else { DEFAULT_LIMIT };
    for version in versions.iter().take(shown) {
        let note = if installed.contains(version) {
            " (installed)"
        } else {
            ""
        };
        println!("  {version}{note}");
    }

    if versions.len() > shown {
        println!("  ... and {} more (use --all)", versions.len() - shown);
    }

    Ok(())
}

/// `latest` narrows the list to the single newest version.
fn filter_versions(versions: Vec<Version>, spec: Option<&VersionSpec>) -> Vec<Version> {
    match spec {
        None => versions,
        Some(VersionSpec::Latest) => versions.into_iter().max().into_iter().collect(),
        Some(spec) => versions.into_iter().filter(|v| spec.matches(v)).collect(),
    }
}
