//! Package archive downloads

mod artifact;
mod progress;

pub use artifact::DownloadedArtifact;
pub use progress::{ProgressMeter, ProgressSample};

use crate::client::NetClient;
use futures::StreamExt;
use mosdeps_config::constants::TEMP_FILE_PREFIX;
use mosdeps_errors::{Error, PackageError};
use mosdeps_events::{AppEvent, DownloadEvent, EventEmitter, EventSender};
use mosdeps_types::PackageDescriptor;
use reqwest::header::LOCATION;
use reqwest::{Response, StatusCode};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Downloads package archives into temporary files
#[derive(Debug, Clone)]
pub struct PackageDownloader {
    client: NetClient,
    temp_dir: Option<PathBuf>,
}

impl PackageDownloader {
    #[must_use]
    pub fn new(client: NetClient) -> Self {
        Self {
            client,
            temp_dir: None,
        }
    }

    /// Create temporary files in `dir` instead of the system default
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Download `pkg` into a fresh temporary file
    ///
    /// 3xx responses carrying a `Location` are followed against the same
    /// temporary file, up to the client's redirect limit. Any failure drops
    /// the temporary file.
    ///
    /// # Errors
    ///
    /// Returns a `PackageError` for an invalid URL, too many redirects, a
    /// non-200 final status, a transfer failure, or a temp file failure.
    pub async fn download(
        &self,
        pkg: &PackageDescriptor,
        tx: &EventSender,
    ) -> Result<DownloadedArtifact, Error> {
        tx.emit(AppEvent::Download(DownloadEvent::Started {
            package: pkg.name.clone(),
            description: pkg.description.clone(),
            url: pkg.url.clone(),
        }));

        let result = self.fetch(pkg, tx).await;
        match &result {
            Ok(artifact) => {
                tracing::debug!(package = %pkg.name, size = artifact.size(), "download finished");
                tx.emit(AppEvent::Download(DownloadEvent::Completed {
                    package: pkg.name.clone(),
                    size: artifact.size(),
                }));
            }
            Err(e) => tx.emit_download_failed(&pkg.name, e),
        }
        result
    }

    async fn fetch(
        &self,
        pkg: &PackageDescriptor,
        tx: &EventSender,
    ) -> Result<DownloadedArtifact, Error> {
        let temp = self.create_temp_file(&pkg.name)?;
        let url = parse_url(&pkg.name, &pkg.url)?;
        let response = self.follow_redirects(pkg, url, tx).await?;

        tx.emit(AppEvent::Download(DownloadEvent::Connected {
            package: pkg.name.clone(),
            total_size: response.content_length(),
        }));

        let size = stream_to_file(pkg, response, &temp, tx).await?;
        Ok(DownloadedArtifact::new(pkg.name.clone(), temp, size))
    }

    fn create_temp_file(&self, package: &str) -> Result<NamedTempFile, Error> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX);
        let created = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        created.map_err(|e| {
            PackageError::TempFile {
                package: package.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Issue requests until a non-redirect response arrives
    async fn follow_redirects(
        &self,
        pkg: &PackageDescriptor,
        mut url: Url,
        tx: &EventSender,
    ) -> Result<Response, Error> {
        let limit = self.client.config().max_redirects;
        let mut hops = 0;

        loop {
            let response = self
                .client
                .get(url.clone())
                .await
                .map_err(|e| transfer_error(&pkg.name, &e))?;
            let status = response.status();

            if is_redirect(status) {
                hops += 1;
                if hops > limit {
                    return Err(PackageError::TooManyRedirects {
                        package: pkg.name.clone(),
                        limit,
                    }
                    .into());
                }

                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .ok_or_else(|| PackageError::InvalidUrl {
                        package: pkg.name.clone(),
                        url: url.to_string(),
                        message: format!("{status} without a Location header"),
                    })?;
                let next = url.join(location).map_err(|e| PackageError::InvalidUrl {
                    package: pkg.name.clone(),
                    url: location.to_string(),
                    message: e.to_string(),
                })?;
                check_scheme(&pkg.name, &next)?;

                tracing::debug!(package = %pkg.name, from = %url, to = %next, "following redirect");
                tx.emit(AppEvent::Download(DownloadEvent::Redirected {
                    package: pkg.name.clone(),
                    location: next.to_string(),
                    hop: hops,
                }));
                url = next;
                continue;
            }

            if status != StatusCode::OK {
                return Err(PackageError::HttpStatus {
                    package: pkg.name.clone(),
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or_default().to_string(),
                }
                .into());
            }

            return Ok(response);
        }
    }
}

/// Stream the response body into `temp`, reporting progress
async fn stream_to_file(
    pkg: &PackageDescriptor,
    response: Response,
    temp: &NamedTempFile,
    tx: &EventSender,
) -> Result<u64, Error> {
    let temp_error = |e: std::io::Error| PackageError::TempFile {
        package: pkg.name.clone(),
        message: e.to_string(),
    };

    let handle = temp.as_file().try_clone().map_err(temp_error)?;
    let mut file = tokio::fs::File::from_std(handle);
    let mut meter = ProgressMeter::new(response.content_length());
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| transfer_error(&pkg.name, &e))?;
        file.write_all(&chunk).await.map_err(temp_error)?;

        if let Some(sample) = meter.record(chunk.len() as u64) {
            tx.emit(AppEvent::Download(DownloadEvent::Progress {
                package: pkg.name.clone(),
                percent: sample.percent,
                bytes_downloaded: sample.bytes_downloaded,
                bytes_per_sec: sample.bytes_per_sec,
            }));
        }
    }

    file.flush().await.map_err(temp_error)?;
    Ok(meter.received())
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn parse_url(package: &str, raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw).map_err(|e| PackageError::InvalidUrl {
        package: package.to_string(),
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    check_scheme(package, &url)?;
    Ok(url)
}

fn check_scheme(package: &str, url: &Url) -> Result<(), Error> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(PackageError::InvalidUrl {
            package: package.to_string(),
            url: url.to_string(),
            message: format!("unsupported scheme `{other}`"),
        }
        .into()),
    }
}

fn transfer_error(package: &str, err: &reqwest::Error) -> Error {
    let message = err.to_string();
    PackageError::Transfer {
        package: package.to_string(),
        message: if message.is_empty() {
            "NONE".to_string()
        } else {
            message
        },
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_statuses() {
        assert!(is_redirect(StatusCode::MOVED_PERMANENTLY));
        assert!(is_redirect(StatusCode::FOUND));
        assert!(is_redirect(StatusCode::PERMANENT_REDIRECT));
        assert!(!is_redirect(StatusCode::NOT_MODIFIED));
        assert!(!is_redirect(StatusCode::OK));
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(parse_url("sdk", "ftp://example.com/sdk.zip").is_err());
        assert!(parse_url("sdk", "not a url").is_err());
        assert!(parse_url("sdk", "https://example.com/sdk.zip").is_ok());
    }
}
