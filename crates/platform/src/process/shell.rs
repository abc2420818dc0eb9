//! Process operations backed by `tokio::process`

use async_trait::async_trait;
use mosdeps_errors::{Error, ProcessError};
use mosdeps_events::{EventEmitter, EventSender};
use std::time::Instant;
use tokio::process::Command;

use super::{CommandOutput, PlatformCommand, ProcessOperations};

/// Runs commands as real child processes
#[derive(Debug, Clone, Default)]
pub struct ShellProcessOperations {
    tx: Option<EventSender>,
}

impl ShellProcessOperations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report each executed command as a debug event
    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }
}

impl EventEmitter for ShellProcessOperations {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

#[async_trait]
impl ProcessOperations for ShellProcessOperations {
    async fn execute_command(&self, cmd: PlatformCommand) -> Result<CommandOutput, Error> {
        let start = Instant::now();
        let command_line = cmd.to_string();

        let mut command = Command::new(cmd.program());
        command.args(cmd.get_args());

        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }

        for (key, value) in cmd.get_env_vars() {
            command.env(key, value);
        }

        let output = command
            .output()
            .await
            .map_err(|e| ProcessError::LaunchFailed {
                command: command_line.clone(),
                message: e.to_string(),
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        };

        tracing::debug!(
            command = %command_line,
            code = ?result.code,
            elapsed_ms = start.elapsed().as_millis(),
            "process finished"
        );
        self.emit_debug(format!(
            "ran `{command_line}` ({} ms)",
            start.elapsed().as_millis()
        ));

        Ok(result)
    }
}
