//! Published-version catalog.
//!
//! The rest of the crate only sees [`RemoteCatalog`]; [`NodeDistCatalog`] is
//! the implementation backed by the Node.js distribution index.

use crate::core::version::{self, Version, VersionSpec};
use crate::error::{NodeSwapError, Result};
use serde::Deserialize;
use std::process::Command;

/// A concrete published version and where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRelease {
    pub version: Version,
    pub download_url: String,
}

pub trait RemoteCatalog {
    /// Published versions for this platform, highest first.
    fn list(&self) -> Result<Vec<Version>>;

    fn download_url(&self, version: &Version) -> String;

    /// `Latest` and `Prefix` give the highest match, `Exact` gives the version
    /// itself; anything unpublished is `NotFound`.
    fn resolve(&self, spec: &VersionSpec) -> Result<RemoteRelease> {
        let versions = self.list()?;
        let version = select(&versions, spec).ok_or_else(|| NodeSwapError::NotFound {
            spec: spec.to_string(),
        })?;

        Ok(RemoteRelease {
            version,
            download_url: self.download_url(&version),
        })
    }
}

/// Highest version in `versions` that satisfies `spec`.
pub fn select(versions: &[Version], spec: &VersionSpec) -> Option<Version> {
    versions.iter().filter(|v| spec.matches(v)).max().copied()
}

/// Operating system and architecture names as used by the dist index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
}

impl Platform {
    pub fn current() -> Self {
        let os = if cfg!(target_os = "windows") {
            "win"
        } else if cfg!(target_os = "macos") {
            "darwin"
        } else {
            "linux"
        };

        let arch = if cfg!(target_arch = "aarch64") {
            "arm64"
        } else if cfg!(target_arch = "x86") {
            "x86"
        } else {
            "x64"
        };

        Platform { os, arch }
    }

    fn extension(&self) -> &'static str {
        if self.os == "win" {
            "zip"
        } else {
            "tar.gz"
        }
    }

    /// Key listed in an index entry's `files` when this platform's archive
    /// was published (`linux-x64`, `osx-arm64-tar`, `win-x64-zip`).
    pub fn file_key(&self) -> String {
        match self.os {
            "darwin" => format!("osx-{}-tar", self.arch),
            "win" => format!("win-{}-zip", self.arch),
            os => format!("{os}-{}", self.arch),
        }
    }

    pub fn archive_name(&self, version: &Version) -> String {
        format!(
            "node-v{version}-{}-{}.{}",
            self.os,
            self.arch,
            self.extension()
        )
    }
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    version: String,
    #[serde(default)]
    files: Vec<String>,
}

/// Versions from a dist `index.json` body that ship an archive for `platform`.
pub fn parse_index(body: &str, platform: &Platform) -> Result<Vec<Version>> {
    let entries: Vec<IndexEntry> = serde_json::from_str(body)?;
    let key = platform.file_key();

    let mut versions: Vec<Version> = entries
        .into_iter()
        .filter(|entry| entry.files.iter().any(|f| *f == key))
        .filter_map(|entry| version::strict_parse(&entry.version).ok())
        .collect();

    versions.sort_by(|a, b| b.cmp(a));
    versions.dedup();
    Ok(versions)
}

pub struct NodeDistCatalog {
    mirror: String,
    platform: Platform,
}

impl NodeDistCatalog {
    pub fn new(mirror: &str) -> Self {
        Self {
            mirror: mirror.trim_end_matches('/').to_string(),
            platform: Platform::current(),
        }
    }

    fn fetch_index(&self) -> Result<String> {
        let url = format!("{}/index.json", self.mirror);
        log::debug!("Fetching {url}");

        let output = Command::new("curl")
            .arg("-s")
            .arg("-f")
            .arg("-L")
            .arg("-H")
            .arg(concat!("User-Agent: nodeswap/", env!("CARGO_PKG_VERSION")))
            .arg(&url)
            .output()
            .map_err(|e| NodeSwapError::remote_error(format!("failed to run curl: {e}")))?;

        if !output.status.success() {
            return Err(NodeSwapError::remote_error(format!(
                "fetching {url} failed: curl exited with status {:?}",
                output.status.code()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| NodeSwapError::remote_error(format!("invalid index encoding: {e}")))
    }
}

impl RemoteCatalog for NodeDistCatalog {
    fn list(&self) -> Result<Vec<Version>> {
        let body = self.fetch_index()?;
        parse_index(&body, &self.platform)
    }

    fn download_url(&self, version: &Version) -> String {
        format!(
            "{}/v{version}/{}",
            self.mirror,
            self.platform.archive_name(version)
        )
    }
}
