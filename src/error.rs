//! Error taxonomy for loading manifests and running scripts.
//!
//! Every variant is terminal for the invocation and maps to exit code 1.
//! A script that starts and exits non-zero is not an error: its code is
//! returned from [`crate::executor::ProcessExecutor::execute`] as a value.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::MANIFEST_FILENAME;
use crate::parser::ParseError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The manifest file does not exist in the searched directory.
    #[error("{} not found in current directory", MANIFEST_FILENAME)]
    ConfigNotFound(PathBuf),

    /// The manifest exists but could not be read.
    #[error("failed to read {}: {source}", MANIFEST_FILENAME)]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The manifest is not valid JSONC, or its `scripts` table has the wrong shape.
    #[error(transparent)]
    ConfigParse(#[from] Box<ParseError>),

    #[error("script '{0}' not found")]
    ScriptNotFound(String),

    /// Rejected before anything was spawned.
    #[error("{0}")]
    InvalidArgument(&'static str),

    /// The shell itself could not be started.
    #[error("failed to execute command: could not start `{shell}`: {source}")]
    SpawnFailure {
        shell: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Always 1: a child that really exited with 1 is reported through the
    /// `Ok` path, so the two cannot be confused by callers.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Line and column of a parse error, when one is known.
    #[must_use]
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::ConfigParse(err) => err.location(),
            _ => None,
        }
    }
}
