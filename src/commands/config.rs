use crate::core::config::Config;
use crate::error::Result;
use std::path::PathBuf;

pub fn show_or_update(symlink_path: Option<PathBuf>, mirror: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if symlink_path.is_some() || mirror.is_some() {
        if let Some(path) = symlink_path {
            config.settings.symlink_path = Some(std::path::absolute(path)?);
        }
        if mirror.is_some() {
            config.settings.mirror = mirror;
        }
        config.save()?;
        println!("Saved {}", config.config_path().display());
        println!();
    }

    println!("root:     {}", config.root_dir.display());
    println!("versions: {}", config.get_versions_dir().display());
    println!("symlink:  {}", config.get_symlink_path().display());
    println!("marker:   {}", config.get_marker_path().display());
    println!("mirror:   {}", config.mirror());

    Ok(())
}
