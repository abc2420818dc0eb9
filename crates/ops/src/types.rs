//! Types for operations and results

use mosdeps_install::InstallReport;
use mosdeps_types::Platform;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one installed package
#[derive(Clone, Debug, Serialize)]
pub struct PackageOutcome {
    pub name: String,
    pub install_path: PathBuf,
    pub files: usize,
    pub directories: usize,
    /// Nothing was downloaded for this package
    pub skipped: bool,
}

impl From<InstallReport> for PackageOutcome {
    fn from(report: InstallReport) -> Self {
        Self {
            name: report.package,
            install_path: report.install_path,
            files: report.files,
            directories: report.directories,
            skipped: report.skipped,
        }
    }
}

/// Per-platform part of a setup run
#[derive(Clone, Debug, Serialize)]
pub struct PlatformReport {
    pub platform: Platform,
    pub downloaded: usize,
    pub packages: Vec<PackageOutcome>,
}

/// Result of the setup operation
#[derive(Clone, Debug, Serialize)]
pub struct SetupReport {
    pub target: Platform,
    /// Markers showed the target was already installed; nothing ran
    pub already_installed: bool,
    pub platforms: Vec<PlatformReport>,
}

impl SetupReport {
    /// Total number of packages extracted
    #[must_use]
    pub fn installed_count(&self) -> usize {
        self.platforms
            .iter()
            .flat_map(|p| &p.packages)
            .filter(|p| !p.skipped)
            .count()
    }
}

/// Marker state of one platform
#[derive(Clone, Debug, Serialize)]
pub struct PlatformStatus {
    pub platform: Platform,
    pub installed: bool,
    pub marker: PathBuf,
}

/// Platform reported by the firmware CLI
#[derive(Clone, Debug, Serialize)]
pub struct PlatformInfo {
    pub raw: String,
    pub platform: Platform,
}

/// Result of IDE config generation
#[derive(Clone, Debug, Serialize)]
pub struct ConfigReport {
    pub path: PathBuf,
    pub include_paths: Vec<String>,
}
