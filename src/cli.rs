//! CLI module containing the main entry point logic.
//!
//! This is the only place that reads process-wide state (current directory,
//! environment) and the only place that turns errors into exit codes.

use crate::config::{self, MANIFEST_FILENAME};
use crate::error::{Error, Result};
use crate::executor::{Environment, ProcessExecutor};
use clap::{CommandFactory, Parser as ClapParser};
use std::path::PathBuf;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter (`env_logger` syntax).
pub const LOG_ENV: &str = "PK_LOG";

/// CLI arguments for the pk tool.
#[derive(ClapParser)]
#[command(name = "pk")]
#[command(version = PKG_VERSION)]
#[command(about = "Run scripts defined in pkbin.jsonc", long_about = None)]
struct Cli {
    /// Name of the script to run
    #[arg(value_name = "SCRIPT")]
    script: Option<String>,

    /// Extra arguments are accepted and ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    extra: Vec<String>,

    /// List the scripts defined in pkbin.jsonc
    #[arg(short, long)]
    list: bool,
}

/// Process state captured once at startup and handed down explicitly.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub working_dir: PathBuf,
    pub env: Environment,
}

impl Invocation {
    /// Snapshot the real current directory and environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRead`] if the current directory cannot be determined.
    pub fn from_process() -> Result<Self> {
        let working_dir = std::env::current_dir().map_err(|source| Error::ConfigRead {
            path: PathBuf::from("."),
            source,
        })?;

        Ok(Self {
            working_dir,
            env: std::env::vars_os().collect(),
        })
    }
}

/// Load the manifest, resolve `name` and run it.
///
/// Returns the script's own exit code.
///
/// # Errors
///
/// Any manifest, lookup or spawn error; see [`Error`].
pub fn run_script(name: &str, invocation: &Invocation, executor: &ProcessExecutor) -> Result<i32> {
    let manifest = config::load_manifest(&invocation.working_dir)?;
    let command = manifest.resolve(name)?;
    log::debug!("script '{name}' resolved to `{command}`");

    executor.execute(command, &invocation.working_dir, &invocation.env)
}

/// Render the `--list` output for the manifest in `invocation.working_dir`.
///
/// # Errors
///
/// Any manifest error; see [`Error`].
pub fn list_scripts(invocation: &Invocation) -> Result<String> {
    let manifest = config::load_manifest(&invocation.working_dir)?;

    if manifest.is_empty() {
        return Ok(format!("No scripts defined in {MANIFEST_FILENAME}."));
    }

    let mut out = String::from("Available scripts:");
    for name in manifest.names() {
        out.push_str("\n  ");
        out.push_str(name);
    }
    Ok(out)
}

/// Install the `env_logger` backend, filtered by `PK_LOG` (default `warn`).
pub fn init_logging() {
    let env = env_logger::Env::new().filter_or(LOG_ENV, "warn");
    // A second init (e.g. from a wrapper) keeps the first logger.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn report(err: &Error) -> i32 {
    eprintln!("Error: {err}");
    err.exit_code()
}

/// Main CLI logic. Returns the process exit code.
pub fn run_cli() -> i32 {
    init_logging();
    let cli = Cli::parse();

    if !cli.extra.is_empty() {
        log::debug!("ignoring extra arguments: {:?}", cli.extra);
    }

    let invocation = match Invocation::from_process() {
        Ok(invocation) => invocation,
        Err(err) => return report(&err),
    };

    if cli.list {
        return match list_scripts(&invocation) {
            Ok(listing) => {
                println!("{listing}");
                0
            }
            Err(err) => report(&err),
        };
    }

    let Some(script) = cli.script else {
        eprintln!("{}", Cli::command().render_usage());
        return 1;
    };

    let executor = ProcessExecutor::host();
    match run_script(&script, &invocation, &executor) {
        Ok(code) => code,
        Err(err) => report(&err),
    }
}
