//! # pk
//!
//! Run scripts defined in a `pkbin.jsonc` file in the current directory.
//!
//! ## Usage
//!
//! - Run a script: `pk build`
//! - List scripts: `pk --list`
//!
//! The exit code is the script's own exit code, or 1 if the manifest or
//! script could not be found, parsed or started.

/// Entry point for the CLI tool.
fn main() {
    std::process::exit(pkbin::cli::run_cli());
}
