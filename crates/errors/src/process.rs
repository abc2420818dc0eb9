//! External process error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    #[error("failed to launch `{command}`: {message}")]
    LaunchFailed { command: String, message: String },

    #[error("`{command}` exited with {}: {stderr}", exit_description(*.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("unexpected output from `{command}`: {message}")]
    InvalidOutput { command: String, message: String },
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl ProcessError {
    /// Command line that failed
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            Self::LaunchFailed { command, .. }
            | Self::NonZeroExit { command, .. }
            | Self::InvalidOutput { command, .. } => command,
        }
    }
}

impl UserFacingError for ProcessError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::LaunchFailed { .. } => {
                Some("Make sure the tool is installed and reachable from a login shell's PATH.")
            }
            Self::NonZeroExit { .. } => Some("Run the command by hand in the project directory to see the full output."),
            Self::InvalidOutput { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::LaunchFailed { .. } => "process.launch_failed",
            Self::NonZeroExit { .. } => "process.non_zero_exit",
            Self::InvalidOutput { .. } => "process.invalid_output",
        })
    }
}
