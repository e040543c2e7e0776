use crate::commands::{activation_for, registry_for};
use crate::core::config::Config;
use crate::error::Result;
use crate::utils::shell;

pub fn check_environment() -> Result<()> {
    println!("🔍 NodeSwap - Environment Check");
    println!();

    let config = Config::load()?;
    let registry = registry_for(&config);
    let manager = activation_for(&config);

    let mut issues_found = 0;

    println!("📁 Directory Structure:");
    println!("  root directory: {}", config.root_dir.display());
    if config.root_dir.exists() {
        println!("    ✅ exists");
    } else {
        println!("    ⚠️  missing (created on first install)");
    }

    let versions_dir = config.get_versions_dir();
    println!("  versions directory: {}", versions_dir.display());
    println!();

    println!("📦 Installed Versions:");
    let versions = registry.list_installed()?;
    if versions.is_empty() {
        println!("  ⚠️  No versions installed");
    } else {
        for installed in &versions {
            println!("  {}", installed.version);
        }
    }
    println!();

    println!("🔗 Active Version:");
    let status = manager.status();
    println!("  symlink: {}", manager.link_path().display());
    println!("  marker:  {}", manager.marker_path().display());
    if status.is_healthy() {
        println!("  ✅ {status}");
    } else {
        println!("  ❌ {status}");
        issues_found += 1;
    }
    println!();

    println!("🛣️  PATH Configuration:");
    let bin_dir = shell::node_bin_dir(manager.link_path());
    if shell::is_on_path(&bin_dir) {
        println!("  ✅ {} is in PATH", bin_dir.display());
    } else {
        println!("  ❌ {} is NOT in PATH", bin_dir.display());
        println!("    Add this to your shell config:");
        println!(
            "    {}",
            shell::path_export_line(&shell::detect_shell(), &bin_dir)
        );
        issues_found += 1;
    }

    match which::which("node") {
        Ok(node) if node.starts_with(&bin_dir) => {
            println!("  ✅ 'node' resolves to {}", node.display());
        }
        Ok(node) => {
            println!(
                "  ❌ 'node' resolves to {}, outside the active symlink",
                node.display()
            );
            issues_found += 1;
        }
        Err(_) => {
            println!("  ❌ 'node' command not found");
            issues_found += 1;
        }
    }
    println!();

    if issues_found == 0 {
        println!("🎉 Environment looks good! No issues found.");
    } else {
        println!("⚠️  Found {issues_found} issue(s) that need attention.");
        println!();
        println!("💡 To fix issues:");
        println!("  - Run 'nodeswap install <version>' to install a version");
        println!("  - Run 'nodeswap use <version>' to (re)activate a version");
    }

    Ok(())
}
