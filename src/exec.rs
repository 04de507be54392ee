//! External command execution.
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::DotfilesError;

/// Result of a command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, or `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl From<ExitStatus> for ExecResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Runs external programs on behalf of the sync driver.
///
/// The production implementation is [`SystemExecutor`]; tests substitute a
/// recording fake.
pub trait Executor: std::fmt::Debug {
    /// Run `program args…` in `dir` with stdin, stdout and stderr inherited
    /// from this process, and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns [`DotfilesError::CommandLaunch`] if the process cannot be
    /// started. A non-zero exit is reported through [`ExecResult::success`],
    /// not as an error.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, DotfilesError>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, DotfilesError> {
        Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map(ExecResult::from)
            .map_err(|source| DotfilesError::CommandLaunch {
                command: command_line(program, args),
                source,
            })
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Render `program args…` for messages.
#[must_use]
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command and fail unless it exits successfully.
///
/// # Errors
///
/// Returns [`DotfilesError::CommandLaunch`] if the process cannot be started,
/// or [`DotfilesError::CommandFailed`] if it exits non-zero.
pub fn run_checked(
    executor: &dyn Executor,
    dir: &Path,
    program: &str,
    args: &[&str],
) -> Result<(), DotfilesError> {
    let result = executor.run_in(dir, program, args)?;
    if result.success {
        Ok(())
    } else {
        Err(DotfilesError::CommandFailed {
            command: command_line(program, args),
            code: result.code,
        })
    }
}
