//! Platform symlink capability used by activation.

use std::io;
use std::path::{Path, PathBuf};

/// Creates and removes the directory symlink that marks the active version.
pub trait SymlinkProvider {
    fn create_directory_symlink(&self, link: &Path, target: &Path) -> io::Result<()>;

    /// Remove the link itself, never what it points to.
    fn remove(&self, link: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformSymlinks;

#[cfg(unix)]
impl SymlinkProvider for PlatformSymlinks {
    fn create_directory_symlink(&self, link: &Path, target: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    fn remove(&self, link: &Path) -> io::Result<()> {
        std::fs::remove_file(link)
    }
}

#[cfg(windows)]
impl SymlinkProvider for PlatformSymlinks {
    fn create_directory_symlink(&self, link: &Path, target: &Path) -> io::Result<()> {
        std::os::windows::fs::symlink_dir(target, link)
    }

    // Directory symlinks are removed as directories on Windows.
    fn remove(&self, link: &Path) -> io::Result<()> {
        std::fs::remove_dir(link)
    }
}

/// Whether anything, including a dangling symlink, occupies `path`.
pub fn entry_exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

pub fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Where the symlink at `path` points, if it is one.
pub fn read_link_target(path: &Path) -> Option<PathBuf> {
    if !is_symlink(path) {
        return None;
    }
    std::fs::read_link(path).ok()
}
