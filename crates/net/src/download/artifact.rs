//! Downloaded archive held in a temporary file

use std::fs::File;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// A fully downloaded package archive
///
/// Owns its temporary file: dropping the artifact deletes the file, so a
/// download that is abandoned or cancelled leaves nothing behind.
#[derive(Debug)]
pub struct DownloadedArtifact {
    package: String,
    file: NamedTempFile,
    size: u64,
}

impl DownloadedArtifact {
    pub(crate) fn new(package: String, file: NamedTempFile, size: u64) -> Self {
        Self {
            package,
            file,
            size,
        }
    }

    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of body bytes written
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Open an independent read handle positioned at the start of the file
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file can no longer be opened.
    pub fn reopen(&self) -> io::Result<File> {
        self.file.reopen()
    }

    /// Delete the temporary file now, reporting failure
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }

    /// Build an artifact around an existing temporary file
    ///
    /// The file is taken as already complete; intended for callers that
    /// obtained the archive some other way.
    ///
    /// # Errors
    ///
    /// Returns an error if the file's metadata cannot be read.
    pub fn from_temp_file(package: impl Into<String>, file: NamedTempFile) -> io::Result<Self> {
        let size = file.as_file().metadata()?.len();
        Ok(Self::new(package.into(), file, size))
    }
}
