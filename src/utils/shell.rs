use std::path::{Path, PathBuf};

/// Name of the user's shell, taken from `$SHELL` (`bash`, `zsh`, `fish`).
pub fn detect_shell() -> String {
    if cfg!(windows) {
        return "powershell".to_string();
    }

    std::env::var("SHELL")
        .ok()
        .and_then(|shell| {
            Path::new(&shell)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "bash".to_string())
}

/// Directory holding the `node` executable of the version the symlink
/// points at.
pub fn node_bin_dir(symlink_path: &Path) -> PathBuf {
    if cfg!(windows) {
        symlink_path.to_path_buf()
    } else {
        symlink_path.join("bin")
    }
}

/// Line to add to the shell's startup file so `dir` is searched first.
pub fn path_export_line(shell: &str, dir: &Path) -> String {
    let dir = dir.display();
    match shell {
        "fish" => format!("fish_add_path {dir}"),
        "powershell" | "pwsh" => format!("$env:Path = \"{dir};\" + $env:Path"),
        _ => format!("export PATH=\"{dir}:$PATH\""),
    }
}

pub fn is_on_path(dir: &Path) -> bool {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).any(|entry| entry == dir))
        .unwrap_or(false)
}
