//! Queries against the firmware CLI

use mosdeps_errors::{Error, ProcessError};
use mosdeps_platform::{exec, login_exec, ExecOptions, ProcessOperations};
use std::path::PathBuf;
use std::sync::Arc;

/// The firmware CLI, run in a project directory
#[derive(Clone)]
pub struct FirmwareCli {
    ops: Arc<dyn ProcessOperations>,
    program: String,
    project_dir: PathBuf,
    login_shell: bool,
}

impl FirmwareCli {
    #[must_use]
    pub fn new(
        ops: Arc<dyn ProcessOperations>,
        program: impl Into<String>,
        project_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ops,
            program: program.into(),
            project_dir: project_dir.into(),
            login_shell: true,
        }
    }

    /// Run through a login shell so the user's profile puts the CLI on `PATH`
    #[must_use]
    pub fn login_shell(mut self, enabled: bool) -> Self {
        self.login_shell = enabled;
        self
    }

    /// Raw platform string of the project's manifest
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if the CLI cannot be run or fails.
    pub async fn platform(&self) -> Result<String, Error> {
        let stdout = self.run("-X eval-manifest-expr platform").await?;
        Ok(stdout.trim().to_string())
    }

    /// Include directories declared by the project's manifest
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::InvalidOutput` if the CLI does not print a JSON
    /// list of strings, or the errors of a failed run.
    pub async fn includes(&self) -> Result<Vec<String>, Error> {
        let args = "-X eval-manifest-expr includes";
        let stdout = self.run(args).await?;
        parse_string_list(&stdout).map_err(|message| {
            ProcessError::InvalidOutput {
                command: self.command_line(args),
                message,
            }
            .into()
        })
    }

    /// Directory of the firmware repository clone
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if the CLI cannot be run or fails.
    pub async fn repo_dir(&self) -> Result<PathBuf, Error> {
        let stdout = self.run("-X get-mos-repo-dir").await?;
        Ok(PathBuf::from(stdout.replace(['\n', '\r'], "")))
    }

    fn command_line(&self, args: &str) -> String {
        format!("{} {args}", self.program)
    }

    async fn run(&self, args: &str) -> Result<String, Error> {
        let command = self.command_line(args);
        let options = ExecOptions::in_dir(&self.project_dir);
        tracing::debug!(command = %command, dir = %self.project_dir.display(), "running firmware CLI");

        let output = if self.login_shell {
            login_exec(self.ops.as_ref(), &command, &options).await?
        } else {
            exec(self.ops.as_ref(), &command, &options).await?
        };
        Ok(output.stdout)
    }
}

fn parse_string_list(stdout: &str) -> Result<Vec<String>, String> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Option<Vec<String>>>(trimmed)
        .map(Option::unwrap_or_default)
        .map_err(|e| e.to_string())
}
