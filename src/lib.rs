//! NodeSwap library
//!
//! Version resolution and activation for side-by-side Node.js installs.
//! The `nodeswap` binary is a thin clap front-end over [`commands`].

pub mod commands;
pub mod core;
pub mod error;
pub mod logging;
pub mod utils;
