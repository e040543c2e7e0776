use crate::commands::activation_for;
use crate::core::activation::ActiveStatus;
use crate::core::config::Config;
use crate::error::{NodeSwapError, Result};

pub fn show_current() -> Result<()> {
    let config = Config::load()?;

    match activation_for(&config).status() {
        ActiveStatus::Active { version, .. } => println!("{version}"),
        ActiveStatus::Inactive => println!("No active version. Run 'nodeswap use <version>' to pick one."),
        broken => {
            return Err(NodeSwapError::BrokenState {
                detail: broken.to_string(),
            })
        }
    }

    Ok(())
}
