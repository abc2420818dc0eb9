//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use mosdeps_errors::{Error, PackageError};
    use mosdeps_events::{channel, AppEvent, DownloadEvent, EventReceiver};
    use mosdeps_net::*;
    use mosdeps_types::PackageDescriptor;
    use std::path::Path;
    use tempfile::tempdir;

    fn package(url: String) -> PackageDescriptor {
        PackageDescriptor {
            name: "sdk".into(),
            description: "esp32 headers".into(),
            url,
            platform: "esp32".into(),
            install_path: None,
            test_file: None,
        }
    }

    fn downloader(temp_dir: &Path, max_redirects: usize) -> PackageDownloader {
        let client = NetClient::new(NetConfig {
            max_redirects,
            ..NetConfig::default()
        })
        .unwrap();
        PackageDownloader::new(client).with_temp_dir(temp_dir)
    }

    fn drain(rx: &mut EventReceiver) -> Vec<DownloadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Download(event) = event {
                events.push(event);
            }
        }
        events
    }

    fn temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_download_ok() {
        let server = MockServer::start_async().await;
        let (tx, mut rx) = channel();
        let content = vec![7u8; 4096];

        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/sdk.zip");
                then.status(200)
                    .header("content-length", content.len().to_string())
                    .body(&content);
            })
            .await;

        let temp = tempdir().unwrap();
        let artifact = downloader(temp.path(), 10)
            .download(&package(server.url("/sdk.zip")), &tx)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(artifact.size(), content.len() as u64);
        assert_eq!(std::fs::read(artifact.path()).unwrap(), content);
        let name = artifact.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("package-"));

        let events = drain(&mut rx);
        assert!(matches!(events.first(), Some(DownloadEvent::Started { .. })));
        assert!(matches!(events.last(), Some(DownloadEvent::Completed { size: 4096, .. })));

        let percents: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                DownloadEvent::Progress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect();
        assert!(!percents.is_empty());
        assert!(percents.windows(2).all(|w| w[1] - w[0] > 20));
        assert!(percents.iter().all(|p| *p <= 100));

        // Dropping the artifact removes the temporary file
        drop(artifact);
        assert_eq!(temp_files(temp.path()), 0);
    }

    #[tokio::test]
    async fn test_follows_redirect() {
        let server = MockServer::start_async().await;
        let (tx, mut rx) = channel();

        let moved = server
            .mock_async(|when, then| {
                when.method(GET).path("/old.zip");
                then.status(302).header("Location", "/new.zip");
            })
            .await;
        let target = server
            .mock_async(|when, then| {
                when.method(GET).path("/new.zip");
                then.status(200).body("zipdata");
            })
            .await;

        let temp = tempdir().unwrap();
        let artifact = downloader(temp.path(), 10)
            .download(&package(server.url("/old.zip")), &tx)
            .await
            .unwrap();

        moved.assert_async().await;
        target.assert_async().await;
        assert_eq!(std::fs::read(artifact.path()).unwrap(), b"zipdata");
        assert_eq!(temp_files(temp.path()), 1);

        let redirects = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, DownloadEvent::Redirected { .. }))
            .count();
        assert_eq!(redirects, 1);
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start_async().await;
        let (tx, mut rx) = channel();

        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing.zip");
                then.status(404);
            })
            .await;

        let temp = tempdir().unwrap();
        let err = downloader(temp.path(), 10)
            .download(&package(server.url("/missing.zip")), &tx)
            .await
            .unwrap_err();

        match err {
            Error::Package(PackageError::HttpStatus {
                package,
                status,
                message,
            }) => {
                assert_eq!(package, "sdk");
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(temp_files(temp.path()), 0);
        assert!(drain(&mut rx)
            .iter()
            .any(|e| matches!(e, DownloadEvent::Failed { .. })));
    }

    #[tokio::test]
    async fn test_redirect_loop_is_bounded() {
        let server = MockServer::start_async().await;
        let (tx, _rx) = channel();

        let looping = server
            .mock_async(|when, then| {
                when.method(GET).path("/loop");
                then.status(301).header("Location", "/loop");
            })
            .await;

        let temp = tempdir().unwrap();
        let err = downloader(temp.path(), 3)
            .download(&package(server.url("/loop")), &tx)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Package(PackageError::TooManyRedirects { limit: 3, .. })
        ));
        // Initial request plus three followed hops
        looping.assert_hits_async(4).await;
        assert_eq!(temp_files(temp.path()), 0);
    }

    #[tokio::test]
    async fn test_redirect_without_location() {
        let server = MockServer::start_async().await;
        let (tx, _rx) = channel();

        server
            .mock_async(|when, then| {
                when.method(GET).path("/nowhere");
                then.status(302);
            })
            .await;

        let temp = tempdir().unwrap();
        let err = downloader(temp.path(), 10)
            .download(&package(server.url("/nowhere")), &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Package(PackageError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transfer_error() {
        let (tx, _rx) = channel();
        let temp = tempdir().unwrap();

        // Port 9 (discard) is not expected to be listening
        let err = downloader(temp.path(), 10)
            .download(&package("http://127.0.0.1:9/sdk.zip".into()), &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Package(PackageError::Transfer { .. })
        ));
        assert_eq!(temp_files(temp.path()), 0);
    }

    #[tokio::test]
    async fn test_truncated_body_is_transfer_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Promise 64 KiB, send 1 KiB, then hang up
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 65536\r\n\r\n")
                .await
                .unwrap();
            socket.write_all(&[0u8; 1024]).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let (tx, mut rx) = channel();
        let temp = tempdir().unwrap();

        let err = downloader(temp.path(), 10)
            .download(&package(format!("http://{addr}/sdk.zip")), &tx)
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            err,
            Error::Package(PackageError::Transfer { ref message, .. }) if !message.is_empty()
        ));
        assert_eq!(temp_files(temp.path()), 0);

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, DownloadEvent::Connected { total_size: Some(65536), .. })));
        assert!(matches!(events.last(), Some(DownloadEvent::Failed { .. })));
    }
}
