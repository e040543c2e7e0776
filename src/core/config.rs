use crate::error::{NodeSwapError, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "NODESWAP_HOME";
pub const SYMLINK_ENV: &str = "NODESWAP_SYMLINK";
pub const DEFAULT_MIRROR: &str = "https://nodejs.org/dist";

const CONFIG_FILE: &str = "config.json";
const MARKER_FILE: &str = "active-version";

/// Settings persisted in `<root>/config.json`. Every field is optional so a
/// missing or partial file falls back to defaults.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symlink_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub root_dir: PathBuf,
    pub settings: Settings,
    symlink_override: Option<PathBuf>,
}

impl Config {
    /// Config rooted at `root_dir` with default settings. Nothing is read
    /// from or written to disk.
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Self {
        Config {
            root_dir: root_dir.into(),
            settings: Settings::default(),
            symlink_override: None,
        }
    }

    pub fn load() -> Result<Self> {
        let root_dir = get_root_dir()?;
        let mut config = Self::load_from(&root_dir)?;
        config.symlink_override = std::env::var_os(SYMLINK_ENV)
            .filter(|v| !v.is_empty())
            .map(std::path::absolute)
            .transpose()?;
        Ok(config)
    }

    pub fn load_from(root_dir: &Path) -> Result<Self> {
        let config_path = root_dir.join(CONFIG_FILE);
        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Settings::default()
        };

        log::debug!("Loaded config from {}", root_dir.display());

        Ok(Config {
            root_dir: root_dir.to_path_buf(),
            settings,
            symlink_override: None,
        })
    }

    pub fn save(&self) -> Result<()> {
        fs::ensure_dir_exists(&self.root_dir)?;
        let content = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(self.config_path(), content)?;
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.root_dir.join(CONFIG_FILE)
    }

    /// Storage root holding one directory per installed version.
    pub fn get_versions_dir(&self) -> PathBuf {
        self.root_dir.join("versions")
    }

    pub fn get_temp_dir(&self) -> PathBuf {
        self.root_dir.join("tmp")
    }

    /// Fixed path of the active-version symlink. A relative path from
    /// `config.json` is taken relative to the root directory.
    pub fn get_symlink_path(&self) -> PathBuf {
        self.symlink_override
            .clone()
            .or_else(|| {
                self.settings
                    .symlink_path
                    .as_ref()
                    .map(|path| self.root_dir.join(path))
            })
            .unwrap_or_else(|| self.root_dir.join("current"))
    }

    /// Plain-text record of the active version.
    pub fn get_marker_path(&self) -> PathBuf {
        self.root_dir.join(MARKER_FILE)
    }

    pub fn mirror(&self) -> &str {
        self.settings
            .mirror
            .as_deref()
            .unwrap_or(DEFAULT_MIRROR)
            .trim_end_matches('/')
    }
}

fn get_root_dir() -> Result<PathBuf> {
    // Symlink targets are built from the root, so it must not depend on
    // the directory the link lives in.
    if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(std::path::absolute(root)?);
    }

    dirs::home_dir()
        .map(|home| home.join(".nodeswap"))
        .ok_or(NodeSwapError::HomeDirectoryNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_layout() {
        let config = Config::with_root("/opt/nodeswap");
        assert_eq!(config.get_versions_dir(), PathBuf::from("/opt/nodeswap/versions"));
        assert_eq!(config.get_symlink_path(), PathBuf::from("/opt/nodeswap/current"));
        assert_eq!(
            config.get_marker_path(),
            PathBuf::from("/opt/nodeswap/active-version")
        );
        assert_eq!(config.mirror(), DEFAULT_MIRROR);
    }

    #[test]
    fn test_load_without_file_does_not_create_storage() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.settings, Settings::default());
        assert!(!config.get_versions_dir().exists());
    }

    #[test]
    fn test_save_and_reload_settings() {
        let dir = tempdir().unwrap();
        let mut config = Config::with_root(dir.path());
        config.settings.symlink_path = Some(dir.path().join("node"));
        config.settings.mirror = Some("https://mirror.example/dist/".to_string());
        config.save().unwrap();

        let reloaded = Config::load_from(dir.path()).unwrap();
        assert_eq!(reloaded.get_symlink_path(), dir.path().join("node"));
        assert_eq!(reloaded.mirror(), "https://mirror.example/dist");
    }

    #[test]
    fn test_relative_symlink_setting_is_under_root() {
        let mut config = Config::with_root("/opt/nodeswap");
        config.settings.symlink_path = Some(PathBuf::from("links/node"));
        assert_eq!(
            config.get_symlink_path(),
            PathBuf::from("/opt/nodeswap/links/node")
        );

        config.settings.symlink_path = Some(PathBuf::from("/usr/local/node"));
        assert_eq!(config.get_symlink_path(), PathBuf::from("/usr/local/node"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert!(matches!(
            Config::load_from(dir.path()),
            Err(NodeSwapError::Json(_))
        ));
    }
}
