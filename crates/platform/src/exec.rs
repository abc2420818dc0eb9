//! Shell command lines with exit status checking

use crate::process::{PlatformCommand, ProcessOperations};
use mosdeps_errors::{Error, ProcessError};
use std::path::PathBuf;

/// Options applied to a shell command line
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Working directory; the current one when unset
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl ExecOptions {
    #[must_use]
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
            env: Vec::new(),
        }
    }
}

/// Decoded output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `command` through `sh -c`
///
/// # Errors
///
/// Returns `ProcessError::LaunchFailed` if the shell cannot be started and
/// `ProcessError::NonZeroExit` if the command exits unsuccessfully.
pub async fn exec<P: ProcessOperations + ?Sized>(
    ops: &P,
    command: &str,
    options: &ExecOptions,
) -> Result<ExecOutput, Error> {
    let mut cmd = ops.create_command("sh");
    cmd.arg("-c").arg(command);
    apply_options(&mut cmd, options);

    let output = ops.execute_command(cmd).await?;
    let stdout = output.stdout_lossy();
    let stderr = output.stderr_lossy();

    if !output.success() {
        return Err(ProcessError::NonZeroExit {
            command: command.to_string(),
            code: output.code,
            stderr: stderr.trim_end().to_string(),
        }
        .into());
    }

    Ok(ExecOutput { stdout, stderr })
}

/// Run `command` inside a login shell so the user's profile sets `PATH`
///
/// # Errors
///
/// Same as [`exec`].
pub async fn login_exec<P: ProcessOperations + ?Sized>(
    ops: &P,
    command: &str,
    options: &ExecOptions,
) -> Result<ExecOutput, Error> {
    exec(ops, &login_command(command), options).await
}

/// Wrap a command line as `bash -l -c '<command>'`
///
/// Single quotes inside `command` are escaped so the string reaches bash
/// unchanged.
#[must_use]
pub fn login_command(command: &str) -> String {
    format!("bash -l -c '{}'", command.replace('\'', r"'\''"))
}

fn apply_options(cmd: &mut PlatformCommand, options: &ExecOptions) {
    if let Some(dir) = &options.cwd {
        cmd.current_dir(dir);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }
}
