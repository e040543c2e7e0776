use crate::error::{NodeSwapError, Result};
use std::path::{Path, PathBuf};

fn map_permission(path: &Path, e: std::io::Error) -> NodeSwapError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => NodeSwapError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => NodeSwapError::from(e),
    }
}

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| map_permission(path, e))?;
    }
    Ok(())
}

pub fn remove_dir_recursive(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| map_permission(path, e))?;
    }
    Ok(())
}

pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir_exists(dst)?;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

/// Move a directory, falling back to copy + delete when `rename` is refused
/// (e.g. across filesystems).
pub fn move_dir(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir_exists(parent)?;
    }

    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    log::debug!(
        "rename {} -> {} failed, copying instead",
        src.display(),
        dst.display()
    );
    copy_dir_recursive(src, dst)?;
    remove_dir_recursive(src)
}

/// The only entry of `dir` if it is a directory, which is how release
/// archives wrap their contents (`node-v18.5.1-linux-x64/...`).
pub fn single_child_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    if entries.len() != 1 {
        return Ok(None);
    }

    let path = entries.remove(0).path();
    Ok(path.is_dir().then_some(path))
}
