//! Package installer

use crate::extract::{extract_zip, ExtractFailure};
use mosdeps_config::InstallRoot;
use mosdeps_errors::{Error, InstallStage, PackageError};
use mosdeps_events::{AppEvent, EventEmitter, EventSender, InstallEvent};
use mosdeps_net::DownloadedArtifact;
use mosdeps_state::InstallState;
use mosdeps_types::PackageDescriptor;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Outcome of installing one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub package: String,
    pub install_path: PathBuf,
    pub files: usize,
    pub directories: usize,
    /// No archive was available, nothing was extracted
    pub skipped: bool,
}

/// Extracts downloaded archives into their install directories
#[derive(Debug, Clone)]
pub struct PackageInstaller {
    root: InstallRoot,
    state: InstallState,
}

impl PackageInstaller {
    #[must_use]
    pub fn new(root: InstallRoot, state: InstallState) -> Self {
        Self { root, state }
    }

    /// Install `pkg` from its downloaded archive
    ///
    /// Without an artifact the package is skipped. On success the temporary
    /// file is deleted and the package's platform marker is touched. On
    /// failure the package's test file is removed so the next run does not
    /// mistake a half-extracted package for an installed one.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::Install` naming the failed stage, or
    /// `PackageError::Cleanup` wrapping it when the test file could not be
    /// removed afterwards. Marker write failures are returned as I/O errors.
    pub async fn install(
        &self,
        pkg: &PackageDescriptor,
        artifact: Option<DownloadedArtifact>,
        tx: &EventSender,
    ) -> Result<InstallReport, Error> {
        let install_path = self.root.package_dir(pkg);

        let Some(artifact) = artifact else {
            tracing::debug!(package = %pkg.name, "no archive, skipping install");
            tx.emit(AppEvent::Install(InstallEvent::Skipped {
                package: pkg.name.clone(),
            }));
            return Ok(InstallReport {
                package: pkg.name.clone(),
                install_path,
                files: 0,
                directories: 0,
                skipped: true,
            });
        };

        tx.emit(AppEvent::Install(InstallEvent::Started {
            package: pkg.name.clone(),
            install_path: install_path.clone(),
        }));

        let stats = match extract(&artifact, install_path.clone()).await {
            Ok(stats) => stats,
            Err(failure) => {
                let err = self.cleanup_after_failure(pkg, failure).await;
                tx.emit_install_failed(&pkg.name, &err);
                return Err(err.into());
            }
        };

        // Deletes the temporary file
        drop(artifact);

        let platform = pkg.resolved_platform();
        if platform.is_concrete() {
            self.state.mark_installed(platform).await?;
        } else {
            tracing::warn!(package = %pkg.name, raw = %pkg.platform, "no platform marker for package");
        }

        tracing::info!(
            package = %pkg.name,
            files = stats.files,
            directories = stats.directories,
            "package installed"
        );
        tx.emit(AppEvent::Install(InstallEvent::Completed {
            package: pkg.name.clone(),
            install_path: install_path.clone(),
            files: stats.files,
            directories: stats.directories,
        }));

        Ok(InstallReport {
            package: pkg.name.clone(),
            install_path,
            files: stats.files,
            directories: stats.directories,
            skipped: false,
        })
    }

    /// Remove the test file after a failed extraction
    async fn cleanup_after_failure(
        &self,
        pkg: &PackageDescriptor,
        failure: ExtractFailure,
    ) -> PackageError {
        let cause = PackageError::Install {
            package: pkg.name.clone(),
            stage: failure.stage,
            message: failure.message,
        };

        let Some(test_file) = self.root.test_file(pkg) else {
            return cause;
        };

        match tokio::fs::remove_file(&test_file).await {
            Ok(()) => {
                tracing::debug!(path = %test_file.display(), "removed test file after failed install");
                cause
            }
            Err(e) if e.kind() == ErrorKind::NotFound => cause,
            Err(e) => PackageError::Cleanup {
                package: pkg.name.clone(),
                path: test_file.display().to_string(),
                message: e.to_string(),
                cause: Box::new(cause),
            },
        }
    }
}

async fn extract(
    artifact: &DownloadedArtifact,
    dest: PathBuf,
) -> Result<crate::ExtractStats, ExtractFailure> {
    let archive = artifact.reopen().map_err(|e| ExtractFailure {
        stage: InstallStage::OpenArchive,
        message: e.to_string(),
    })?;

    tokio::task::spawn_blocking(move || extract_zip(archive, &dest))
        .await
        .map_err(|e| ExtractFailure {
            stage: InstallStage::Worker,
            message: format!("task join error: {e}"),
        })?
}
