//! Installed-version registry.
//!
//! The set of installed versions is rebuilt from the storage root on every
//! call; nothing is cached between runs.

use crate::core::version::{self, Version, VersionPrefix};
use crate::error::Result;
use std::fs::read_dir;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    pub version: Version,
    pub path: PathBuf,
}

pub struct Registry {
    versions_dir: PathBuf,
}

impl Registry {
    pub fn new(versions_dir: impl Into<PathBuf>) -> Self {
        Self {
            versions_dir: versions_dir.into(),
        }
    }

    pub fn versions_dir(&self) -> &Path {
        &self.versions_dir
    }

    /// All installed versions, highest first. A missing storage root is an
    /// empty list. Entries whose name is not a full version are skipped.
    pub fn list_installed(&self) -> Result<Vec<InstalledVersion>> {
        if !self.versions_dir.exists() {
            return Ok(vec![]);
        }

        let mut versions = Vec::new();

        for entry in read_dir(&self.versions_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match version::strict_parse(name) {
                Ok(version) => versions.push(InstalledVersion { version, path }),
                Err(e) => log::debug!("Ignoring {}: {e}", path.display()),
            }
        }

        // Canonical `X.Y.Z` directory names sort ahead of `vX.Y.Z` ones so
        // that dedup keeps them.
        versions.sort_by(|a, b| {
            b.version
                .cmp(&a.version)
                .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
        });
        versions.dedup_by_key(|installed| installed.version);

        Ok(versions)
    }

    pub fn find_exact(&self, version: &Version) -> Result<Option<InstalledVersion>> {
        Ok(self
            .list_installed()?
            .into_iter()
            .find(|installed| installed.version == *version))
    }

    /// Highest installed version, or `None` when nothing is installed.
    pub fn find_latest(&self) -> Result<Option<InstalledVersion>> {
        Ok(self.list_installed()?.into_iter().next())
    }

    /// Highest installed version whose leading components equal `prefix`.
    pub fn resolve_prefix(&self, prefix: &VersionPrefix) -> Result<Option<InstalledVersion>> {
        Ok(self
            .list_installed()?
            .into_iter()
            .find(|installed| prefix.matches(&installed.version)))
    }

    pub fn is_installed(&self, version: &Version) -> Result<bool> {
        Ok(self.find_exact(version)?.is_some())
    }
}
