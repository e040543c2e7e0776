use crate::core::remote::RemoteRelease;
use crate::error::{NodeSwapError, Result};
use crate::utils::fs;
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

/// Receives human-readable stage updates from long-running steps.
pub trait Progress {
    fn stage(&self, message: &str);
}

/// Prints each stage on its own line.
pub struct ConsolePrinter;

impl Progress for ConsolePrinter {
    fn stage(&self, message: &str) {
        println!("{message}");
    }
}

pub struct Silent;

impl Progress for Silent {
    fn stage(&self, _message: &str) {}
}

/// Turns a resolved release into a populated version directory.
pub trait ReleaseInstaller {
    fn install(&self, release: &RemoteRelease, dest: &Path, progress: &dyn Progress) -> Result<()>;
}

pub struct Downloader {
    temp_dir: PathBuf,
}

impl Downloader {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    pub fn download_file(&self, url: &str, destination: &Path) -> Result<()> {
        log::debug!("Downloading {url} to {}", destination.display());

        if let Some(parent) = destination.parent() {
            fs::ensure_dir_exists(parent)?;
        }

        let output = std::process::Command::new("curl")
            .arg("-L") // Follow redirects
            .arg("-s") // Silent
            .arg("-f") // Fail on HTTP errors
            .arg("-H")
            .arg(concat!("User-Agent: nodeswap/", env!("CARGO_PKG_VERSION")))
            .arg("-o")
            .arg(destination)
            .arg(url)
            .output()?;

        if !output.status.success() {
            log::debug!(
                "curl exited with status {:?} for {url}",
                output.status.code()
            );
            return Err(NodeSwapError::Download {
                url: url.to_string(),
            });
        }

        Ok(())
    }

    pub fn extract_archive(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        log::debug!(
            "Extracting {} to {}",
            archive_path.display(),
            destination.display()
        );

        fs::ensure_dir_exists(destination)?;

        let file_name = archive_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        let extracted = if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
            self.extract_tar_gz(archive_path, destination)
        } else if file_name.ends_with(".zip") {
            self.extract_zip(archive_path, destination)
        } else {
            Err(anyhow::anyhow!("Unsupported archive format: {file_name}"))
        };

        extracted.map_err(|e| {
            log::warn!("Extraction of {} failed: {e}", archive_path.display());
            NodeSwapError::Extraction {
                path: archive_path.to_path_buf(),
            }
        })
    }

    fn extract_tar_gz(&self, archive_path: &Path, destination: &Path) -> anyhow::Result<()> {
        let file = File::open(archive_path)?;
        let decoder = GzDecoder::new(file);
        let mut archive = Archive::new(decoder);
        archive.unpack(destination)?;
        Ok(())
    }

    fn extract_zip(&self, archive_path: &Path, destination: &Path) -> anyhow::Result<()> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file)?;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let outpath = match file.enclosed_name() {
                Some(path) => destination.join(path),
                None => continue,
            };

            if file.name().ends_with('/') {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(p) = outpath.parent() {
                    if !p.exists() {
                        std::fs::create_dir_all(p)?;
                    }
                }
                let mut outfile = File::create(&outpath)?;
                std::io::copy(&mut file, &mut outfile)?;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }
        }
        Ok(())
    }

    /// Place the extracted tree at `dest`, unwrapping the archive's single
    /// top-level directory when there is one.
    fn promote(&self, staging: &Path, dest: &Path) -> Result<()> {
        let root = fs::single_child_dir(staging)?.unwrap_or_else(|| staging.to_path_buf());
        fs::move_dir(&root, dest)
    }
}

impl ReleaseInstaller for Downloader {
    fn install(&self, release: &RemoteRelease, dest: &Path, progress: &dyn Progress) -> Result<()> {
        let archive_name = release
            .download_url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("archive")
            .to_string();
        let work_dir = self.temp_dir.join(format!("node-{}", release.version));
        fs::remove_dir_recursive(&work_dir)?;

        let archive_path = work_dir.join(&archive_name);
        let staging = work_dir.join("staging");

        progress.stage(&format!("Downloading {}...", release.download_url));
        let result = self
            .download_file(&release.download_url, &archive_path)
            .and_then(|()| {
                progress.stage("Extracting...");
                self.extract_archive(&archive_path, &staging)
            })
            .and_then(|()| self.promote(&staging, dest));

        if let Err(e) = fs::remove_dir_recursive(&work_dir) {
            log::warn!("Could not clean up {}: {e}", work_dir.display());
        }

        result
    }
}
