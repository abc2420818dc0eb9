//! Integration tests for events

#[cfg(test)]
mod tests {
    use mosdeps_errors::{PackageError, UserFacingError};
    use mosdeps_events::*;
    use mosdeps_types::Platform;

    #[tokio::test]
    async fn test_emitter_helpers() {
        let (tx, mut rx) = channel();

        tx.emit_operation_failed("setup", "download failed");
        tx.emit_debug("test debug");

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            event1,
            AppEvent::General(GeneralEvent::OperationFailed { .. })
        ));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(
            event2,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning_with_context("ignored", "test");
    }

    #[tokio::test]
    async fn test_failure_context_from_error() {
        let (tx, mut rx) = channel();
        let err = PackageError::HttpStatus {
            package: "sdk".into(),
            status: 503,
            message: "Service Unavailable".into(),
        };
        tx.emit_download_failed("sdk", &err);

        match rx.recv().await.unwrap() {
            AppEvent::Download(DownloadEvent::Failed { package, failure }) => {
                assert_eq!(package, "sdk");
                assert_eq!(failure.message, err.user_message());
                assert_eq!(failure.code.as_deref(), err.user_code());
                assert!(failure.retryable);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_log_levels() {
        let progress = AppEvent::Download(DownloadEvent::Progress {
            package: "sdk".into(),
            percent: 40,
            bytes_downloaded: 400,
            bytes_per_sec: 1024.0,
        });
        assert_eq!(progress.log_level(), tracing::Level::DEBUG);
        assert_eq!(progress.log_target(), "mosdeps::events::download");

        let warning = AppEvent::General(GeneralEvent::warning_with_context("unknown platform", "pic32"));
        assert_eq!(warning.log_level(), tracing::Level::WARN);

        let done = AppEvent::Install(InstallEvent::BatchCompleted {
            platform: Platform::Esp32,
            installed: 1,
            skipped: 0,
        });
        assert_eq!(done.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_serialized_shape() {
        let event = AppEvent::Setup(SetupEvent::AlreadyInstalled {
            platform: Platform::Esp8266,
        });
        let value: serde_json::Value = serde_json::from_str(&event.log_fields()).unwrap();
        assert_eq!(value["domain"], "setup");
        assert_eq!(value["event"]["type"], "AlreadyInstalled");
        assert_eq!(value["event"]["platform"], "esp8266");
    }
}
