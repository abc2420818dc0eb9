use mosdeps_types::Platform;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project setup events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SetupEvent {
    /// Target platform determined for the project
    PlatformResolved { raw: String, platform: Platform },

    /// Markers show the target is already installed
    AlreadyInstalled { platform: Platform },

    /// Download and install of one platform's packages started
    PlatformStarted { platform: Platform, packages: usize },

    /// One platform's packages are installed
    PlatformCompleted { platform: Platform },

    /// IDE include configuration written
    ConfigGenerated { path: PathBuf, include_paths: usize },

    /// Install markers removed
    MarkersCleared { platforms: Vec<Platform> },
}
