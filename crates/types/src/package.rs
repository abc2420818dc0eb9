//! Package-related type definitions

use crate::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A downloadable toolchain component declared by the manifest
///
/// Descriptors are read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    /// Raw platform string, classified with [`Platform::classify`]
    pub platform: String,
    /// Directory relative to the install root; the root itself when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_path: Option<String>,
    /// File relative to the install directory whose presence marks this
    /// package as installed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_file: Option<String>,
}

impl PackageDescriptor {
    /// Resolved target platform of this package
    #[must_use]
    pub fn resolved_platform(&self) -> Platform {
        Platform::classify(&self.platform)
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.platform)
    }
}
