//! Integration tests for install markers

use mosdeps_config::InstallRoot;
use mosdeps_events::{channel, AppEvent, InstallEvent};
use mosdeps_state::InstallState;
use mosdeps_types::{PackageDescriptor, Platform};
use tempfile::TempDir;

fn state_in(dir: &TempDir) -> InstallState {
    InstallState::new(InstallRoot::new(dir.path()).unwrap())
}

#[tokio::test]
async fn test_mark_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let state = state_in(&dir);

    assert!(!state.is_installed(Platform::Esp32).await);
    state.mark_installed(Platform::Esp32).await.unwrap();
    state.mark_installed(Platform::Esp32).await.unwrap();
    assert!(state.is_installed(Platform::Esp32).await);

    let marker = dir.path().join("install.esp32");
    assert_eq!(std::fs::metadata(&marker).unwrap().len(), 0);
    assert!(!state.is_installed(Platform::Esp8266).await);
}

#[tokio::test]
async fn test_none_requires_every_marker() {
    let dir = TempDir::new().unwrap();
    let state = state_in(&dir);

    state.mark_installed(Platform::Esp32).await.unwrap();
    assert!(!state.is_installed(Platform::None).await);
    assert_eq!(
        state.pending_platforms(Platform::None).await,
        [Platform::Esp8266]
    );

    state.mark_installed(Platform::Esp8266).await.unwrap();
    assert!(state.is_installed(Platform::None).await);
    assert!(state.pending_platforms(Platform::None).await.is_empty());
}

#[tokio::test]
async fn test_mark_none_touches_missing_only() {
    let dir = TempDir::new().unwrap();
    let state = state_in(&dir);

    state.mark_installed(Platform::Esp8266).await.unwrap();
    let written = state.mark_installed(Platform::None).await.unwrap();
    assert_eq!(written, [Platform::Esp32]);
    assert!(state.is_installed(Platform::None).await);
}

#[tokio::test]
async fn test_clear() {
    let dir = TempDir::new().unwrap();
    let state = state_in(&dir);

    // Clearing absent markers is fine
    assert!(state.clear_installed(Platform::None).await.unwrap().is_empty());

    state.mark_installed(Platform::None).await.unwrap();
    let cleared = state.clear_installed(Platform::Esp32).await.unwrap();
    assert_eq!(cleared, [Platform::Esp32]);
    assert_eq!(
        state.status().await,
        [(Platform::Esp8266, true), (Platform::Esp32, false)]
    );

    state.clear_installed(Platform::None).await.unwrap();
    assert!(!state.is_installed(Platform::Esp8266).await);
}

#[tokio::test]
async fn test_marker_events() {
    let dir = TempDir::new().unwrap();
    let (tx, mut rx) = channel();
    let state = state_in(&dir).with_events(tx);

    state.mark_installed(Platform::Esp32).await.unwrap();
    match rx.recv().await.unwrap() {
        AppEvent::Install(InstallEvent::MarkerWritten { platform, path }) => {
            assert_eq!(platform, Platform::Esp32);
            assert_eq!(path, dir.path().join("install.esp32"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_root_created_on_demand() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("not").join("yet");
    let state = InstallState::new(InstallRoot::new(&root).unwrap());

    state.mark_installed(Platform::Esp8266).await.unwrap();
    assert!(root.join("install.esp8266").is_file());
}

#[tokio::test]
async fn test_package_presence() {
    let dir = TempDir::new().unwrap();
    let state = state_in(&dir);
    let pkg = PackageDescriptor {
        name: "sdk".into(),
        description: String::new(),
        url: "http://example.com/sdk.zip".into(),
        platform: "esp32".into(),
        install_path: Some("sdk".into()),
        test_file: Some("include/sdk.h".into()),
    };

    assert!(!state.is_package_present(&pkg).await);
    std::fs::create_dir_all(dir.path().join("sdk/include")).unwrap();
    std::fs::write(dir.path().join("sdk/include/sdk.h"), "").unwrap();
    assert!(state.is_package_present(&pkg).await);

    let no_test_file = PackageDescriptor {
        test_file: None,
        ..pkg
    };
    assert!(!state.is_package_present(&no_test_file).await);
}
