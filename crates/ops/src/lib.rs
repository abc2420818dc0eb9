#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for mosdeps
//!
//! This crate sits between the CLI and the specialised crates. It selects
//! the packages for a target platform, runs the download and install
//! batches, and builds the IDE include configuration from the firmware CLI
//! and the host compiler.

mod compiler;
mod context;
mod cpp;
mod firmware;
mod large_ops;
mod manager;
mod small_ops;
mod types;

pub use compiler::{compiler_search_paths, parse_search_paths};
pub use context::{OpsContextBuilder, OpsCtx};
pub use cpp::{Browse, CppConfiguration, CppProperties, IncludeSources};
pub use firmware::FirmwareCli;
pub use manager::{DownloadSummary, PackageManager};
pub use types::{
    ConfigReport, PackageOutcome, PlatformInfo, PlatformReport, PlatformStatus, SetupReport,
};

pub use large_ops::{generate_cpp_config, setup};
pub use small_ops::{detect_platform, load_manifest, manifest_path, reset, resolve_target, status};

use mosdeps_errors::Error;
use mosdeps_types::Platform;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    Setup(SetupReport),
    Config(ConfigReport),
    Status(Vec<PlatformStatus>),
    Platform(PlatformInfo),
    /// Platforms whose markers were removed
    Reset(Vec<Platform>),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
