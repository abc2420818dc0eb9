use super::FailureContext;
use mosdeps_types::Platform;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Installation domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InstallEvent {
    /// Extraction of a downloaded archive started
    Started {
        package: String,
        install_path: PathBuf,
    },

    /// Archive fully extracted
    Completed {
        package: String,
        install_path: PathBuf,
        files: usize,
        directories: usize,
    },

    /// Nothing was downloaded for this package
    Skipped { package: String },

    /// Extraction failed
    Failed {
        package: String,
        failure: FailureContext,
    },

    /// Install marker touched for a platform
    MarkerWritten { platform: Platform, path: PathBuf },

    /// Every selected package of a batch has been handled
    BatchCompleted {
        platform: Platform,
        installed: usize,
        skipped: usize,
    },
}
