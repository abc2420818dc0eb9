use super::FailureContext;
use serde::{Deserialize, Serialize};

/// Download-specific events for the event system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Request issued for a package
    Started {
        package: String,
        description: String,
        url: String,
    },

    /// Server answered with a redirect that is being followed
    Redirected {
        package: String,
        location: String,
        hop: usize,
    },

    /// Response accepted, body transfer begins
    Connected {
        package: String,
        total_size: Option<u64>,
    },

    /// Periodic progress report, only emitted when the size is known
    Progress {
        package: String,
        percent: u64,
        bytes_downloaded: u64,
        /// Bytes per second since the previous report
        bytes_per_sec: f64,
    },

    /// Body fully written to the temporary file
    Completed { package: String, size: u64 },

    /// Package already present on disk, nothing fetched
    Skipped { package: String, reason: String },

    /// Download failed
    Failed {
        package: String,
        failure: FailureContext,
    },
}

impl DownloadEvent {
    /// Package this event refers to
    #[must_use]
    pub fn package(&self) -> &str {
        match self {
            Self::Started { package, .. }
            | Self::Redirected { package, .. }
            | Self::Connected { package, .. }
            | Self::Progress { package, .. }
            | Self::Completed { package, .. }
            | Self::Skipped { package, .. }
            | Self::Failed { package, .. } => package,
        }
    }
}
