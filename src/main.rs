use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nodeswap::{commands, logging};

#[derive(Parser)]
#[clap(name = "nodeswap")]
#[clap(about = "Install Node.js versions side by side and switch between them")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Print debug diagnostics to stderr
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a version (e.g., 18.5.1, 18, 18.5, latest)
    Install {
        /// Version to install
        version: String,
    },
    /// Switch the active version
    Use {
        /// Installed version (exact, e.g. 18.5.1) or latest
        version: String,
    },
    /// List installed versions
    List,
    /// List versions published for this platform
    Available {
        /// Only show versions matching this prefix (e.g., 18 or 18.5)
        filter: Option<String>,
        /// Show every match instead of the newest few
        #[clap(long)]
        all: bool,
    },
    /// Print the active version
    Current,
    /// Remove an installed version
    Uninstall {
        /// Version to uninstall (exact)
        version: String,
        /// Also remove it if it is the active version
        #[clap(long)]
        force: bool,
        /// Do not ask for confirmation
        #[clap(long, short)]
        yes: bool,
    },
    /// Check the environment setup
    Doctor,
    /// Show or change settings
    Config {
        /// Where the active-version symlink lives
        #[clap(long)]
        symlink_path: Option<PathBuf>,
        /// Base URL of the Node.js distribution mirror
        #[clap(long)]
        mirror: Option<String>,
    },
}

fn main() -> Result<()> {
    // Usage errors exit with 1 like every other handled failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Install { version } => {
            commands::install::install_version(&version).map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Use { version } => {
            commands::use_version::use_version(&version).map_err(|e| anyhow::anyhow!(e))
        }
        Commands::List => commands::list::list_versions().map_err(|e| anyhow::anyhow!(e)),
        Commands::Available { filter, all } => {
            commands::available::list_available_versions(filter.as_deref(), all)
                .map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Current => commands::current::show_current().map_err(|e| anyhow::anyhow!(e)),
        Commands::Uninstall {
            version,
            force,
            yes,
        } => commands::uninstall::uninstall_version(&version, force, yes)
            .map_err(|e| anyhow::anyhow!(e)),
        Commands::Doctor => {
            commands::doctor::check_environment().map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Config {
            symlink_path,
            mirror,
        } => commands::config::show_or_update(symlink_path, mirror)
            .map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
