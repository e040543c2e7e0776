use crate::commands::registry_for;
use crate::core::config::Config;
use crate::core::download::{ConsolePrinter, Downloader, Progress, ReleaseInstaller};
use crate::core::registry::{InstalledVersion, Registry};
use crate::core::remote::{NodeDistCatalog, RemoteCatalog};
use crate::core::version;
use crate::error::{NodeSwapError, Result};

pub fn install_version(raw: &str) -> Result<()> {
    let config = Config::load()?;
    let registry = registry_for(&config);
    let catalog = NodeDistCatalog::new(config.mirror());
    let downloader = Downloader::new(config.get_temp_dir());

    println!("Resolving {raw}...");
    let installed = install_with(raw, &registry, &catalog, &downloader, &ConsolePrinter)?;

    println!("✅ Installed Node.js {}", installed.version);
    println!("   Location: {}", installed.path.display());
    println!();
    println!("To use this version, run:");
    println!("   nodeswap use {}", installed.version);

    Ok(())
}

/// Resolve `raw` against the catalog and install it unless it is already
/// present locally.
pub fn install_with(
    raw: &str,
    registry: &Registry,
    catalog: &dyn RemoteCatalog,
    installer: &dyn ReleaseInstaller,
    progress: &dyn Progress,
) -> Result<InstalledVersion> {
    let spec = version::parse(raw)?;
    let release = catalog.resolve(&spec)?;
    log::debug!("{spec} resolved to {}", release.version);

    if registry.is_installed(&release.version)? {
        return Err(NodeSwapError::AlreadyInstalled {
            version: release.version.to_string(),
        });
    }

    let dest = registry.versions_dir().join(release.version.dir_name());
    installer.install(&release, &dest, progress)?;

    registry
        .find_exact(&release.version)?
        .ok_or_else(|| NodeSwapError::NotInstalled {
            version: release.version.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::download::Silent;
    use crate::core::remote::RemoteRelease;
    use crate::core::version::Version;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use tempfile::{tempdir, TempDir};

    struct FixedCatalog(Vec<Version>);

    impl RemoteCatalog for FixedCatalog {
        fn list(&self) -> Result<Vec<Version>> {
            Ok(self.0.clone())
        }

        fn download_url(&self, version: &Version) -> String {
            format!("https://example.test/node-v{version}.tar.gz")
        }
    }

    /// Creates the version directory and records what it was asked for.
    #[derive(Default)]
    struct RecordingInstaller {
        calls: RefCell<Vec<(RemoteRelease, PathBuf)>>,
    }

    impl ReleaseInstaller for RecordingInstaller {
        fn install(&self, release: &RemoteRelease, dest: &Path, _: &dyn Progress) -> Result<()> {
            std::fs::create_dir_all(dest.join("bin"))?;
            self.calls
                .borrow_mut()
                .push((release.clone(), dest.to_path_buf()));
            Ok(())
        }
    }

    struct FailingInstaller;

    impl ReleaseInstaller for FailingInstaller {
        fn install(&self, release: &RemoteRelease, _: &Path, _: &dyn Progress) -> Result<()> {
            Err(NodeSwapError::Download {
                url: release.download_url.clone(),
            })
        }
    }

    fn setup(installed: &[&str]) -> (TempDir, Registry, FixedCatalog) {
        let dir = tempdir().unwrap();
        for name in installed {
            std::fs::create_dir_all(dir.path().join("versions").join(name)).unwrap();
        }
        let registry = Registry::new(dir.path().join("versions"));
        let catalog = FixedCatalog(vec![
            Version::new(20, 1, 0),
            Version::new(18, 16, 0),
            Version::new(18, 5, 1),
            Version::new(16, 2, 0),
        ]);
        (dir, registry, catalog)
    }

    #[test]
    fn test_install_prefix_picks_highest_published() {
        let (dir, registry, catalog) = setup(&[]);
        let installer = RecordingInstaller::default();

        let installed = install_with("v18", &registry, &catalog, &installer, &Silent).unwrap();

        assert_eq!(installed.version, Version::new(18, 16, 0));
        let calls = installer.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].0.download_url,
            "https://example.test/node-v18.16.0.tar.gz"
        );
        assert_eq!(calls[0].1, dir.path().join("versions/18.16.0"));
    }

    #[test]
    fn test_install_latest() {
        let (_dir, registry, catalog) = setup(&["18.5.1"]);
        let installer = RecordingInstaller::default();

        let installed = install_with("latest", &registry, &catalog, &installer, &Silent).unwrap();

        assert_eq!(installed.version, Version::new(20, 1, 0));
        assert_eq!(registry.list_installed().unwrap().len(), 2);
    }

    #[test]
    fn test_already_installed_skips_download() {
        let (_dir, registry, catalog) = setup(&["16.2.0"]);
        let installer = RecordingInstaller::default();

        let err = install_with("16.2.0", &registry, &catalog, &installer, &Silent).unwrap_err();

        assert!(matches!(err, NodeSwapError::AlreadyInstalled { ref version } if version == "16.2.0"));
        assert!(installer.calls.borrow().is_empty());
    }

    #[test]
    fn test_unpublished_and_malformed_requests() {
        let (_dir, registry, catalog) = setup(&[]);
        let installer = RecordingInstaller::default();

        let err = install_with("17", &registry, &catalog, &installer, &Silent).unwrap_err();
        assert!(matches!(err, NodeSwapError::NotFound { .. }));

        let err = install_with("18.x", &registry, &catalog, &installer, &Silent).unwrap_err();
        assert!(matches!(err, NodeSwapError::Parse(_)));
        assert!(installer.calls.borrow().is_empty());
    }

    #[test]
    fn test_collaborator_failure_surfaces_unchanged() {
        let (_dir, registry, catalog) = setup(&[]);

        let err = install_with("20", &registry, &catalog, &FailingInstaller, &Silent).unwrap_err();

        assert!(
            matches!(err, NodeSwapError::Download { ref url } if url.ends_with("node-v20.1.0.tar.gz"))
        );
        assert!(registry.list_installed().unwrap().is_empty());
    }
}
