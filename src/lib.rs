//! # pkbin
//!
//! Run named shell commands from a `pkbin.jsonc` manifest in the current
//! directory, forwarding stdio, environment and the script's exit code.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod parser;

pub use error::{Error, Result};
pub use manifest::Manifest;
