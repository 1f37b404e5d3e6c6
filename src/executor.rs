//! Shell command execution.
//!
//! A command string is handed verbatim to the host shell (`/bin/sh -c` or
//! `cmd /c`). The child gets exactly the environment snapshot and working
//! directory it is given, shares the parent's stdin/stdout/stderr, and its
//! real exit status is returned unchanged.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{Error, Result};

/// An environment snapshot: ordered `(name, value)` pairs.
pub type Environment = Vec<(OsString, OsString)>;

/// A shell program and the flag that makes it run a command string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shell {
    pub program: &'static str,
    pub flag: &'static str,
}

/// Platform tag to shell. Adding a platform means adding a row here.
pub const SHELL_TABLE: [(&str, Shell); 2] = [
    (
        "windows",
        Shell {
            program: "cmd",
            flag: "/c",
        },
    ),
    (
        "unix",
        Shell {
            program: "/bin/sh",
            flag: "-c",
        },
    ),
];

impl Shell {
    /// Look up the shell for a platform tag.
    #[must_use]
    pub fn for_platform(tag: &str) -> Option<Shell> {
        SHELL_TABLE
            .iter()
            .find(|(platform, _)| *platform == tag)
            .map(|(_, shell)| *shell)
    }

    /// The shell for the platform this binary was built for.
    #[must_use]
    pub fn host() -> Shell {
        let tag = if cfg!(windows) { "windows" } else { "unix" };
        // Both tags are rows of SHELL_TABLE.
        Self::for_platform(tag).unwrap_or(SHELL_TABLE[1].1)
    }
}

/// Runs one command at a time through a fixed shell.
#[derive(Debug, Clone, Copy)]
pub struct ProcessExecutor {
    shell: Shell,
}

impl ProcessExecutor {
    #[must_use]
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }

    #[must_use]
    pub fn host() -> Self {
        Self::new(Shell::host())
    }

    #[must_use]
    pub fn shell(&self) -> Shell {
        self.shell
    }

    /// Run `command` through the shell and block until it exits.
    ///
    /// Returns the child's exit code. A non-zero code is a normal result,
    /// not an error.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `command` is empty; nothing is spawned
    /// - [`Error::SpawnFailure`] if the shell itself cannot be started
    pub fn execute(
        &self,
        command: &str,
        working_dir: &Path,
        env: &[(OsString, OsString)],
    ) -> Result<i32> {
        if command.is_empty() {
            return Err(Error::InvalidArgument("command cannot be empty"));
        }

        log::debug!(
            "spawning `{} {} {}` in {}",
            self.shell.program,
            self.shell.flag,
            command,
            working_dir.display()
        );

        let mut child = Command::new(self.shell.program)
            .arg(self.shell.flag)
            .arg(command)
            .current_dir(working_dir)
            .env_clear()
            .envs(env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| {
                log::debug!("failed to spawn {}: {source}", self.shell.program);
                Error::SpawnFailure {
                    shell: self.shell.program.to_string(),
                    source,
                }
            })?;

        log::debug!("running as pid {}", child.id());

        // Once spawned, a wait failure cannot be told apart from a lost child.
        let status = child.wait().map_err(|source| Error::SpawnFailure {
            shell: self.shell.program.to_string(),
            source,
        })?;

        let code = exit_code(status);
        log::debug!("terminated with {status} (exit code {code})");
        Ok(code)
    }
}

/// Map a termination status to an exit code.
///
/// A Unix child killed by signal `N` reports `128 + N`, as shells do.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
