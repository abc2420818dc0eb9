//! Package acquisition error types

use std::borrow::Cow;
use std::fmt;

use crate::UserFacingError;
use thiserror::Error;

/// Step of an installation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    OpenArchive,
    CreateInstallDir,
    CreateDirectory,
    ReadEntry,
    WriteFile,
    Worker,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::OpenArchive => "open archive",
            Self::CreateInstallDir => "create install path",
            Self::CreateDirectory => "create directory",
            Self::ReadEntry => "read entry",
            Self::WriteFile => "write file",
            Self::Worker => "worker",
        };
        f.write_str(stage)
    }
}

#[derive(Debug, Clone, Error)]
pub enum PackageError {
    #[error("{package}: HTTP {status} - {message}")]
    HttpStatus {
        package: String,
        status: u16,
        message: String,
    },

    #[error("{package}: gave up after {limit} redirects")]
    TooManyRedirects { package: String, limit: usize },

    #[error("{package}: invalid URL {url}: {message}")]
    InvalidUrl {
        package: String,
        url: String,
        message: String,
    },

    #[error("{package}: download error: {message}")]
    Transfer { package: String, message: String },

    #[error("{package}: temporary file error: {message}")]
    TempFile { package: String, message: String },

    #[error("{package}: {stage} failed: {message}")]
    Install {
        package: String,
        stage: InstallStage,
        message: String,
    },

    #[error("{package}: could not remove test file {path}: {message} (after: {cause})")]
    Cleanup {
        package: String,
        path: String,
        message: String,
        cause: Box<PackageError>,
    },
}

impl PackageError {
    /// Name of the package the error belongs to
    #[must_use]
    pub fn package(&self) -> &str {
        match self {
            Self::HttpStatus { package, .. }
            | Self::TooManyRedirects { package, .. }
            | Self::InvalidUrl { package, .. }
            | Self::Transfer { package, .. }
            | Self::TempFile { package, .. }
            | Self::Install { package, .. }
            | Self::Cleanup { package, .. } => package,
        }
    }

    /// Error that triggered this one, for chained cleanup failures
    #[must_use]
    pub fn cause(&self) -> Option<&PackageError> {
        match self {
            Self::Cleanup { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl UserFacingError for PackageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::HttpStatus { .. } | Self::InvalidUrl { .. } => {
                Some("Check the package URL declared in the manifest.")
            }
            Self::TooManyRedirects { .. } => {
                Some("The server keeps redirecting; raise network.max_redirects or fix the URL.")
            }
            Self::Transfer { .. } => Some("Check your network connection and retry."),
            Self::Install { .. } | Self::Cleanup { .. } => {
                Some("Run `mosdeps reset` and `mosdeps setup` to reinstall the packages.")
            }
            Self::TempFile { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => *status >= 500,
            Self::Transfer { .. } | Self::TempFile { .. } => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::HttpStatus { .. } => "package.http_status",
            Self::TooManyRedirects { .. } => "package.too_many_redirects",
            Self::InvalidUrl { .. } => "package.invalid_url",
            Self::Transfer { .. } => "package.transfer",
            Self::TempFile { .. } => "package.temp_file",
            Self::Install { .. } => "package.install",
            Self::Cleanup { .. } => "package.cleanup",
        })
    }
}
