#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Install state tracking for mosdeps
//!
//! Whether a platform's packages are installed is recorded by a zero-byte
//! marker file `install.<platform>` at the install root. The marker is the
//! only signal consulted; it carries no content or version.
//!
//! Marker writes are not synchronised. Two tasks touching the same marker
//! both succeed and leave the same empty file behind.

use futures::future::join_all;
use mosdeps_config::InstallRoot;
use mosdeps_errors::Error;
use mosdeps_events::{EventEmitter, EventSender};
use mosdeps_types::{PackageDescriptor, Platform};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Reads and writes install markers under an install root
#[derive(Debug, Clone)]
pub struct InstallState {
    root: InstallRoot,
    tx: Option<EventSender>,
}

impl EventEmitter for InstallState {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl InstallState {
    #[must_use]
    pub fn new(root: InstallRoot) -> Self {
        Self { root, tx: None }
    }

    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Marker file for a concrete platform
    #[must_use]
    pub fn marker_path(&self, platform: Platform) -> PathBuf {
        self.root.marker(platform)
    }

    /// Whether `platform` is installed
    ///
    /// For [`Platform::None`] every concrete marker is checked and the
    /// results are combined with a logical AND.
    pub async fn is_installed(&self, platform: Platform) -> bool {
        let checks = scope(platform)
            .iter()
            .map(|p| is_file(self.marker_path(*p)));
        join_all(checks).await.into_iter().all(|present| present)
    }

    /// Concrete platforms within `platform`'s scope that have no marker
    pub async fn pending_platforms(&self, platform: Platform) -> Vec<Platform> {
        let mut pending = Vec::new();
        for p in scope(platform) {
            if !is_file(self.marker_path(*p)).await {
                pending.push(*p);
            }
        }
        pending
    }

    /// Marker state of every concrete platform
    pub async fn status(&self) -> Vec<(Platform, bool)> {
        let mut status = Vec::new();
        for p in Platform::concrete() {
            status.push((*p, is_file(self.marker_path(*p)).await));
        }
        status
    }

    /// Touch the marker for `platform`
    ///
    /// For [`Platform::None`] only the concrete markers that are missing are
    /// written. Returns the platforms whose marker was written.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the install root or a marker cannot be created.
    pub async fn mark_installed(&self, platform: Platform) -> Result<Vec<Platform>, Error> {
        let targets = if platform.is_concrete() {
            vec![platform]
        } else {
            self.pending_platforms(platform).await
        };

        if targets.is_empty() {
            return Ok(targets);
        }

        fs::create_dir_all(self.root.path())
            .await
            .map_err(|e| Error::io_with_path(&e, self.root.path()))?;

        for p in &targets {
            let path = self.marker_path(*p);
            fs::write(&path, b"")
                .await
                .map_err(|e| Error::io_with_path(&e, &path))?;
            tracing::debug!(platform = %p, path = %path.display(), "install marker written");
            self.emit_marker_written(*p, path);
        }

        Ok(targets)
    }

    /// Remove the marker for `platform`, or every marker for `None`
    ///
    /// A marker that does not exist is not an error. Returns the platforms
    /// whose marker was removed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if an existing marker cannot be removed.
    pub async fn clear_installed(&self, platform: Platform) -> Result<Vec<Platform>, Error> {
        let mut cleared = Vec::new();
        for p in scope(platform) {
            let path = self.marker_path(*p);
            match fs::remove_file(&path).await {
                Ok(()) => cleared.push(*p),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(Error::io_with_path(&e, &path)),
            }
        }
        Ok(cleared)
    }

    /// Whether the package's test file is present on disk
    ///
    /// Packages without a test file are never considered present.
    pub async fn is_package_present(&self, pkg: &PackageDescriptor) -> bool {
        match self.root.test_file(pkg) {
            Some(path) => is_file(path).await,
            None => false,
        }
    }
}

fn scope(platform: Platform) -> &'static [Platform] {
    match platform {
        Platform::Esp8266 => &[Platform::Esp8266],
        Platform::Esp32 => &[Platform::Esp32],
        Platform::None => Platform::concrete(),
    }
}

async fn is_file(path: impl AsRef<Path>) -> bool {
    fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
