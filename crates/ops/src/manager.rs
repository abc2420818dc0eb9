//! Download and install orchestration for one target platform

use futures::future::try_join_all;
use mosdeps_errors::Error;
use mosdeps_events::{AppEvent, DownloadEvent, EventEmitter, EventSender, InstallEvent};
use mosdeps_install::{InstallReport, PackageInstaller};
use mosdeps_net::{DownloadedArtifact, PackageDownloader};
use mosdeps_state::InstallState;
use mosdeps_types::{Manifest, PackageDescriptor, Platform};
use tokio::sync::Mutex;

/// Result of a download batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    /// Packages whose test file was already present
    pub skipped: usize,
}

/// Runs the download and install batches for the packages of one target
///
/// Downloaded archives are held in a runtime slot per selected package
/// between the two batches. Within a batch packages are processed
/// concurrently and the first failure fails the whole batch: the remaining
/// futures are dropped, which deletes their temporary files.
pub struct PackageManager {
    target: Platform,
    packages: Vec<PackageDescriptor>,
    downloader: PackageDownloader,
    installer: PackageInstaller,
    state: InstallState,
    tx: EventSender,
    /// Indexed like `packages`; names need not be unique
    artifacts: Mutex<Vec<Option<DownloadedArtifact>>>,
}

impl PackageManager {
    /// Create a manager for `target`
    ///
    /// Packages whose platform string cannot be resolved never match a
    /// target and are left out of every batch.
    #[must_use]
    pub fn new(
        manifest: &Manifest,
        target: Platform,
        downloader: PackageDownloader,
        installer: PackageInstaller,
        state: InstallState,
        tx: EventSender,
    ) -> Self {
        let packages: Vec<PackageDescriptor> =
            manifest.select(target).into_iter().cloned().collect();
        let artifacts = packages.iter().map(|_| None).collect();

        Self {
            target,
            packages,
            downloader,
            installer,
            state,
            tx,
            artifacts: Mutex::new(artifacts),
        }
    }

    /// Packages wanted for the target
    #[must_use]
    pub fn select_packages(&self) -> &[PackageDescriptor] {
        &self.packages
    }

    /// Download every selected package whose test file is missing
    ///
    /// A package with its test file on disk is not fetched; its platform is
    /// marked installed instead.
    ///
    /// # Errors
    ///
    /// Returns the first download error. Archives already downloaded by the
    /// batch are discarded.
    pub async fn download_packages(&self) -> Result<DownloadSummary, Error> {
        let results = try_join_all(
            self.packages
                .iter()
                .enumerate()
                .map(|(slot, pkg)| self.download_one(slot, pkg)),
        )
        .await;

        match results {
            Ok(fetched) => {
                let downloaded = fetched.iter().filter(|f| **f).count();
                Ok(DownloadSummary {
                    downloaded,
                    skipped: fetched.len() - downloaded,
                })
            }
            Err(e) => {
                self.discard_artifacts().await;
                Err(e)
            }
        }
    }

    async fn download_one(&self, slot: usize, pkg: &PackageDescriptor) -> Result<bool, Error> {
        if self.state.is_package_present(pkg).await {
            self.state.mark_installed(pkg.resolved_platform()).await?;
            tracing::debug!(package = %pkg.name, "test file present, not downloading");
            self.tx.emit(AppEvent::Download(DownloadEvent::Skipped {
                package: pkg.name.clone(),
                reason: "already installed".to_string(),
            }));
            return Ok(false);
        }

        let artifact = self.downloader.download(pkg, &self.tx).await?;
        self.artifacts.lock().await[slot] = Some(artifact);
        Ok(true)
    }

    /// Drop every archive still held, deleting its temporary file
    async fn discard_artifacts(&self) {
        for artifact in self.artifacts.lock().await.iter_mut() {
            artifact.take();
        }
    }

    /// Install every selected package from its downloaded archive
    ///
    /// Packages without an archive (skipped downloads) are reported as
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the first install error. Archives not yet installed are
    /// discarded.
    pub async fn install_packages(&self) -> Result<Vec<InstallReport>, Error> {
        let results = try_join_all(self.packages.iter().enumerate().map(|(slot, pkg)| async move {
            let artifact = self.artifacts.lock().await[slot].take();
            self.installer.install(pkg, artifact, &self.tx).await
        }))
        .await;

        let reports = match results {
            Ok(reports) => reports,
            Err(e) => {
                self.discard_artifacts().await;
                return Err(e);
            }
        };

        let skipped = reports.iter().filter(|r| r.skipped).count();
        self.tx.emit(AppEvent::Install(InstallEvent::BatchCompleted {
            platform: self.target,
            installed: reports.len() - skipped,
            skipped,
        }));

        Ok(reports)
    }
}
