use crate::core::activation::ActivationError;
use crate::core::version::ParseError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NodeSwapError>;

#[derive(Error, Debug)]
pub enum NodeSwapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error("{version} not installed")]
    NotInstalled { version: String },

    #[error("No version matching '{spec}' found")]
    NotFound { spec: String },

    #[error("{version} already installed")]
    AlreadyInstalled { version: String },

    #[error("There are no versions installed")]
    NoVersionsInstalled,

    #[error("{version} is the active version; pass --force to uninstall it anyway")]
    ActiveVersion { version: String },

    #[error("Active version state is broken: {detail}. Run 'nodeswap use <version>' to repair it")]
    BrokenState { detail: String },

    #[error("Version catalog error: {message}")]
    Remote { message: String },

    #[error("Download failed: {url}")]
    Download { url: String },

    #[error("Extraction failed: {path}")]
    Extraction { path: PathBuf },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
}

impl NodeSwapError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        NodeSwapError::Config {
            message: message.into(),
        }
    }

    pub fn remote_error<S: Into<String>>(message: S) -> Self {
        NodeSwapError::Remote {
            message: message.into(),
        }
    }
}
