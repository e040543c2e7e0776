//! Activation of an installed version.
//!
//! The active version is recorded twice: a directory symlink at a fixed path
//! (the functional source of truth) and a plain-text marker file holding the
//! version string. [`ActivationManager::activate`] rewrites both; it never
//! repairs them on its own.

use crate::core::link::{self, PlatformSymlinks, SymlinkProvider};
use crate::core::registry::InstalledVersion;
use crate::core::version::{self, Version};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActivationError {
    #[error("Unable to delete the symlink at {}: {source}. Be sure you have write access to it (on Windows, run this in an elevated terminal)", .path.display())]
    CannotClearExisting {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to create the symlink at {}: {source}. Be sure you have write access to it (on Windows, run this in an elevated terminal)", .path.display())]
    CannotCreateLink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Symlink switched but the active version could not be recorded in {}: {source}", .path.display())]
    MarkerNotWritten {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What the symlink and the marker currently say about the active version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveStatus {
    /// Neither a link nor a marker exists.
    Inactive,
    /// Link and marker agree.
    Active { version: Version, path: PathBuf },
    /// The marker names a version but there is no link (interrupted switch).
    MissingLink { marker: String },
    /// The link exists but its target is gone.
    BrokenLink { target: PathBuf },
    /// The link path is taken by something that is not a symlink.
    Occupied { path: PathBuf },
    /// Link and marker both exist and disagree, or the marker is unreadable.
    Inconsistent {
        target: PathBuf,
        linked: Option<Version>,
        marker: Option<String>,
    },
}

impl ActiveStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ActiveStatus::Inactive | ActiveStatus::Active { .. })
    }

    pub fn active_version(&self) -> Option<Version> {
        match self {
            ActiveStatus::Active { version, .. } => Some(*version),
            _ => None,
        }
    }
}

impl fmt::Display for ActiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveStatus::Inactive => write!(f, "no active version"),
            ActiveStatus::Active { version, .. } => write!(f, "{version}"),
            ActiveStatus::MissingLink { marker } => write!(
                f,
                "marker says {marker} but the active symlink is missing (a previous switch was interrupted)"
            ),
            ActiveStatus::BrokenLink { target } => write!(
                f,
                "the active symlink points at {}, which no longer exists",
                target.display()
            ),
            ActiveStatus::Occupied { path } => write!(
                f,
                "{} exists but is not a symlink",
                path.display()
            ),
            ActiveStatus::Inconsistent {
                target,
                linked,
                marker,
            } => {
                let linked = linked.map_or_else(|| target.display().to_string(), |v| v.to_string());
                let marker = marker.as_deref().unwrap_or("nothing");
                write!(f, "the symlink points at {linked} but the marker records {marker}")
            }
        }
    }
}

pub struct ActivationManager<S = PlatformSymlinks> {
    symlinks: S,
    link_path: PathBuf,
    marker_path: PathBuf,
}

impl ActivationManager<PlatformSymlinks> {
    pub fn new(link_path: impl Into<PathBuf>, marker_path: impl Into<PathBuf>) -> Self {
        Self::with_provider(PlatformSymlinks, link_path, marker_path)
    }
}

impl<S: SymlinkProvider> ActivationManager<S> {
    pub fn with_provider(
        symlinks: S,
        link_path: impl Into<PathBuf>,
        marker_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            symlinks,
            link_path: link_path.into(),
            marker_path: marker_path.into(),
        }
    }

    pub fn link_path(&self) -> &Path {
        &self.link_path
    }

    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Point the active symlink at `target` and record its version.
    ///
    /// A failure to clear the old link aborts before anything is changed.
    /// Once the old link is gone, a failure to create the new one leaves no
    /// active version until the next successful call.
    pub fn activate(&self, target: &InstalledVersion) -> Result<(), ActivationError> {
        self.clear_existing()?;
        self.create_link(&target.path)?;
        self.write_marker(&target.version)?;

        log::info!(
            "Activated {} ({} -> {})",
            target.version,
            self.link_path.display(),
            target.path.display()
        );
        Ok(())
    }

    fn clear_existing(&self) -> Result<(), ActivationError> {
        if !link::entry_exists(&self.link_path) {
            return Ok(());
        }

        if !link::is_symlink(&self.link_path) {
            return Err(ActivationError::CannotClearExisting {
                path: self.link_path.clone(),
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "the path is occupied by something that is not a symlink",
                ),
            });
        }

        log::debug!("Removing existing link {}", self.link_path.display());
        self.symlinks
            .remove(&self.link_path)
            .map_err(|source| ActivationError::CannotClearExisting {
                path: self.link_path.clone(),
                source,
            })
    }

    fn create_link(&self, target: &Path) -> Result<(), ActivationError> {
        let cannot_create = |source| ActivationError::CannotCreateLink {
            path: self.link_path.clone(),
            source,
        };

        if let Some(parent) = self.link_path.parent() {
            std::fs::create_dir_all(parent).map_err(cannot_create)?;
        }

        // A relative target would resolve against the link's directory.
        let target = std::path::absolute(target).map_err(cannot_create)?;
        self.symlinks
            .create_directory_symlink(&self.link_path, &target)
            .map_err(cannot_create)?;

        if !self.link_path.is_dir() {
            return Err(cannot_create(io::Error::new(
                io::ErrorKind::NotFound,
                "the link does not resolve to a directory after creation",
            )));
        }

        Ok(())
    }

    fn write_marker(&self, version: &Version) -> Result<(), ActivationError> {
        let not_written = |source| ActivationError::MarkerNotWritten {
            path: self.marker_path.clone(),
            source,
        };

        if let Some(parent) = self.marker_path.parent() {
            std::fs::create_dir_all(parent).map_err(not_written)?;
        }
        std::fs::write(&self.marker_path, version.to_string()).map_err(not_written)
    }

    /// Remove both halves of the active state, e.g. before uninstalling the
    /// active version.
    pub fn deactivate(&self) -> Result<(), ActivationError> {
        self.clear_existing()?;

        match std::fs::remove_file(&self.marker_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                Err(ActivationError::MarkerNotWritten {
                    path: self.marker_path.clone(),
                    source: e,
                })
            }
            _ => Ok(()),
        }
    }

    /// Inspect the link and the marker without changing either.
    pub fn status(&self) -> ActiveStatus {
        let marker = std::fs::read_to_string(&self.marker_path)
            .ok()
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());

        if !link::entry_exists(&self.link_path) {
            return match marker {
                Some(marker) => ActiveStatus::MissingLink { marker },
                None => ActiveStatus::Inactive,
            };
        }

        let Some(target) = link::read_link_target(&self.link_path) else {
            return ActiveStatus::Occupied {
                path: self.link_path.clone(),
            };
        };

        if !self.link_path.is_dir() {
            return ActiveStatus::BrokenLink { target };
        }

        let linked = target
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| version::strict_parse(name).ok());
        let recorded = marker
            .as_deref()
            .and_then(|marker| version::strict_parse(marker).ok());

        match (linked, recorded) {
            (Some(linked), Some(recorded)) if linked == recorded => ActiveStatus::Active {
                version: linked,
                path: target,
            },
            _ => ActiveStatus::Inconsistent {
                target,
                linked,
                marker,
            },
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self { dir: tempdir().unwrap() }
        }

        fn install(&self, name: &str) -> InstalledVersion {
            let path = self.dir.path().join("versions").join(name);
            std::fs::create_dir_all(path.join("bin")).unwrap();
            InstalledVersion {
                version: version::strict_parse(name).unwrap(),
                path,
            }
        }

        fn link(&self) -> PathBuf {
            self.dir.path().join("current")
        }

        fn marker(&self) -> PathBuf {
            self.dir.path().join("active-version")
        }

        fn manager(&self) -> ActivationManager {
            ActivationManager::new(self.link(), self.marker())
        }

        fn manager_with<S: SymlinkProvider>(&self, provider: S) -> ActivationManager<S> {
            ActivationManager::with_provider(provider, self.link(), self.marker())
        }

        fn marker_content(&self) -> String {
            std::fs::read_to_string(self.marker()).unwrap()
        }
    }

    /// Refuses to remove anything.
    struct DenyRemove;

    impl SymlinkProvider for DenyRemove {
        fn create_directory_symlink(&self, link: &Path, target: &Path) -> io::Result<()> {
            PlatformSymlinks.create_directory_symlink(link, target)
        }

        fn remove(&self, _link: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    /// Reports success without creating anything.
    struct SilentCreate;

    impl SymlinkProvider for SilentCreate {
        fn create_directory_symlink(&self, _link: &Path, _target: &Path) -> io::Result<()> {
            Ok(())
        }

        fn remove(&self, link: &Path) -> io::Result<()> {
            PlatformSymlinks.remove(link)
        }
    }

    #[test]
    fn test_first_activation_creates_link_and_marker() {
        let fx = Fixture::new();
        let a = fx.install("18.5.1");

        fx.manager().activate(&a).unwrap();

        assert_eq!(std::fs::read_link(fx.link()).unwrap(), a.path);
        assert_eq!(fx.marker_content(), "18.5.1");
        assert_eq!(
            fx.manager().status(),
            ActiveStatus::Active {
                version: a.version,
                path: a.path.clone()
            }
        );
    }

    #[test]
    fn test_activation_is_idempotent() {
        let fx = Fixture::new();
        let a = fx.install("16.2.0");
        let manager = fx.manager();

        manager.activate(&a).unwrap();
        let first = (std::fs::read_link(fx.link()).unwrap(), fx.marker_content());
        manager.activate(&a).unwrap();
        let second = (std::fs::read_link(fx.link()).unwrap(), fx.marker_content());

        assert_eq!(first, second);
    }

    #[test]
    fn test_switching_replaces_both_halves() {
        let fx = Fixture::new();
        let a = fx.install("14.0.0");
        let b = fx.install("18.5.1");
        let manager = fx.manager();

        manager.activate(&a).unwrap();
        manager.activate(&b).unwrap();

        assert_eq!(std::fs::read_link(fx.link()).unwrap(), b.path);
        assert_eq!(fx.marker_content(), "18.5.1");
        assert!(a.path.is_dir());
    }

    #[test]
    fn test_occupied_directory_is_left_untouched() {
        let fx = Fixture::new();
        let b = fx.install("18.5.1");
        std::fs::create_dir(fx.link()).unwrap();
        std::fs::write(fx.link().join("keep.txt"), "mine").unwrap();

        let err = fx.manager().activate(&b).unwrap_err();

        assert!(matches!(err, ActivationError::CannotClearExisting { .. }));
        assert!(fx.link().is_dir());
        assert_eq!(
            std::fs::read_to_string(fx.link().join("keep.txt")).unwrap(),
            "mine"
        );
        assert!(!fx.marker().exists());
        assert_eq!(fx.manager().status(), ActiveStatus::Occupied { path: fx.link() });
    }

    #[test]
    fn test_denied_removal_keeps_previous_version() {
        let fx = Fixture::new();
        let a = fx.install("14.0.0");
        let b = fx.install("16.2.0");
        fx.manager().activate(&a).unwrap();

        let err = fx.manager_with(DenyRemove).activate(&b).unwrap_err();

        assert!(matches!(
            err,
            ActivationError::CannotClearExisting { ref source, .. }
                if source.kind() == io::ErrorKind::PermissionDenied
        ));
        assert_eq!(std::fs::read_link(fx.link()).unwrap(), a.path);
        assert_eq!(fx.marker_content(), "14.0.0");
    }

    #[test]
    fn test_missing_link_after_creation_is_reported() {
        let fx = Fixture::new();
        let a = fx.install("14.0.0");

        let err = fx.manager_with(SilentCreate).activate(&a).unwrap_err();

        assert!(matches!(err, ActivationError::CannotCreateLink { .. }));
        assert!(!fx.marker().exists());
    }

    #[test]
    fn test_dangling_link_is_replaced() {
        let fx = Fixture::new();
        let a = fx.install("14.0.0");
        std::os::unix::fs::symlink(fx.dir.path().join("versions/9.9.9"), fx.link()).unwrap();
        assert!(matches!(fx.manager().status(), ActiveStatus::BrokenLink { .. }));

        fx.manager().activate(&a).unwrap();

        assert_eq!(fx.manager().status().active_version(), Some(a.version));
    }

    #[test]
    fn test_marker_failure_surfaces_after_switch() {
        let fx = Fixture::new();
        let a = fx.install("14.0.0");
        std::fs::create_dir(fx.marker()).unwrap();

        let err = fx.manager().activate(&a).unwrap_err();

        assert!(matches!(err, ActivationError::MarkerNotWritten { .. }));
        assert_eq!(std::fs::read_link(fx.link()).unwrap(), a.path);
    }

    #[test]
    fn test_status_detects_disagreement() {
        let fx = Fixture::new();
        let a = fx.install("14.0.0");
        let manager = fx.manager();
        assert_eq!(manager.status(), ActiveStatus::Inactive);

        manager.activate(&a).unwrap();
        std::fs::write(fx.marker(), "16.2.0").unwrap();
        assert_eq!(
            manager.status(),
            ActiveStatus::Inconsistent {
                target: a.path.clone(),
                linked: Some(a.version),
                marker: Some("16.2.0".to_string()),
            }
        );

        std::fs::remove_file(fx.link()).unwrap();
        assert_eq!(
            manager.status(),
            ActiveStatus::MissingLink {
                marker: "16.2.0".to_string()
            }
        );
        assert!(!manager.status().is_healthy());
    }

    #[test]
    fn test_deactivate_clears_both_halves() {
        let fx = Fixture::new();
        let a = fx.install("14.0.0");
        let manager = fx.manager();
        manager.activate(&a).unwrap();

        manager.deactivate().unwrap();

        assert!(!link::entry_exists(&fx.link()));
        assert!(!fx.marker().exists());
        assert!(a.path.is_dir());
        manager.deactivate().unwrap();
    }

    #[test]
    fn test_relative_target_is_linked_absolutely() {
        let dir = tempfile::Builder::new()
            .prefix("nodeswap-relative")
            .tempdir_in(".")
            .unwrap();
        let root = PathBuf::from(".").join(dir.path().file_name().unwrap());
        assert!(root.is_relative());

        let installed = InstalledVersion {
            version: Version::new(18, 5, 1),
            path: root.join("versions/18.5.1"),
        };
        std::fs::create_dir_all(installed.path.join("bin")).unwrap();
        let link = root.join("links/current");
        let manager = ActivationManager::new(&link, root.join("active-version"));

        manager.activate(&installed).unwrap();

        let target = std::fs::read_link(&link).unwrap();
        assert!(target.is_absolute());
        assert!(link.is_dir());
        assert!(link.join("bin").is_dir());
        assert_eq!(manager.status().active_version(), Some(Version::new(18, 5, 1)));
    }
}
