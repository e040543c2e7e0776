pub mod available;
pub mod config;
pub mod current;
pub mod doctor;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod use_version;

use crate::core::activation::ActivationManager;
use crate::core::config::Config;
use crate::core::registry::Registry;

pub(crate) fn registry_for(config: &Config) -> Registry {
    Registry::new(config.get_versions_dir())
}

pub(crate) fn activation_for(config: &Config) -> ActivationManager {
    ActivationManager::new(config.get_symlink_path(), config.get_marker_path())
}
