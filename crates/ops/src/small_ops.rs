//! Single-step operations

use crate::types::{PlatformInfo, PlatformStatus};
use crate::OpsCtx;
use mosdeps_config::constants::MANIFEST_FILE;
use mosdeps_errors::Error;
use mosdeps_events::{AppEvent, EventEmitter, SetupEvent};
use mosdeps_types::{Manifest, Platform};
use std::path::{Path, PathBuf};

/// Location of the manifest for `project_dir`
///
/// The configured manifest wins over the project's own.
#[must_use]
pub fn manifest_path(ctx: &OpsCtx, project_dir: &Path) -> PathBuf {
    ctx.config
        .paths
        .manifest
        .clone()
        .unwrap_or_else(|| project_dir.join(MANIFEST_FILE))
}

/// Load the package manifest for `project_dir`
///
/// # Errors
///
/// Returns a `ConfigError` if the manifest is missing or malformed.
pub async fn load_manifest(ctx: &OpsCtx, project_dir: &Path) -> Result<Manifest, Error> {
    let path = manifest_path(ctx, project_dir);
    let manifest = tokio::task::spawn_blocking({
        let path = path.clone();
        move || Manifest::load(&path)
    })
    .await
    .map_err(|e| Error::internal(format!("task join error: {e}")))??;

    tracing::debug!(path = %path.display(), packages = manifest.packages().len(), "manifest loaded");
    Ok(manifest)
}

/// Ask the firmware CLI which platform the project targets
///
/// # Errors
///
/// Returns a `ProcessError` if the firmware CLI fails.
pub async fn detect_platform(ctx: &OpsCtx, project_dir: &Path) -> Result<PlatformInfo, Error> {
    let raw = ctx.firmware_cli(project_dir).platform().await?;
    let platform = Platform::classify(&raw);
    Ok(PlatformInfo { raw, platform })
}

/// Decide the target platform
///
/// An explicit choice wins, then the configured platform, then whatever the
/// firmware CLI reports for the project. Unknown CLI output resolves to
/// [`Platform::None`].
///
/// # Errors
///
/// Returns a `ConfigError` for an invalid configured platform, or a
/// `ProcessError` if the firmware CLI has to be asked and fails.
pub async fn resolve_target(
    ctx: &OpsCtx,
    explicit: Option<Platform>,
    project_dir: &Path,
) -> Result<Platform, Error> {
    let info = match explicit.or(ctx.config.platform()?) {
        Some(platform) => PlatformInfo {
            raw: platform.name().to_string(),
            platform,
        },
        None => detect_platform(ctx, project_dir).await?,
    };

    if !info.platform.is_concrete() {
        tracing::warn!(raw = %info.raw, "no known platform, using all platforms");
    }
    ctx.tx.emit(AppEvent::Setup(SetupEvent::PlatformResolved {
        raw: info.raw,
        platform: info.platform,
    }));
    Ok(info.platform)
}

/// Marker state of every concrete platform
pub async fn status(ctx: &OpsCtx) -> Vec<PlatformStatus> {
    ctx.state
        .status()
        .await
        .into_iter()
        .map(|(platform, installed)| PlatformStatus {
            platform,
            installed,
            marker: ctx.state.marker_path(platform),
        })
        .collect()
}

/// Remove install markers so the next setup reinstalls
///
/// # Errors
///
/// Returns an I/O error if an existing marker cannot be removed.
pub async fn reset(ctx: &OpsCtx, platform: Platform) -> Result<Vec<Platform>, Error> {
    let cleared = ctx.state.clear_installed(platform).await?;
    tracing::info!(count = cleared.len(), "install markers cleared");
    ctx.tx.emit(AppEvent::Setup(SetupEvent::MarkersCleared {
        platforms: cleared.clone(),
    }));
    Ok(cleared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsContextBuilder;
    use mosdeps_config::{Config, InstallRoot};
    use tempfile::TempDir;

    fn context(root: &Path, config: Config) -> (OpsCtx, mosdeps_events::EventReceiver) {
        let (tx, rx) = mosdeps_events::channel();
        let ctx = OpsContextBuilder::new()
            .with_config(config)
            .with_event_sender(tx)
            .with_install_root(InstallRoot::new(root).unwrap())
            .build()
            .unwrap();
        (ctx, rx)
    }

    #[tokio::test]
    async fn test_explicit_target_skips_cli() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.general.platform = Some("esp8266".into());
        // A CLI that does not exist proves it is never launched
        config.toolchain.cli = "/nonexistent/mos".into();
        let (ctx, mut rx) = context(dir.path(), config);

        let target = resolve_target(&ctx, Some(Platform::Esp32), dir.path()).await.unwrap();
        assert_eq!(target, Platform::Esp32);

        let target = resolve_target(&ctx, None, dir.path()).await.unwrap();
        assert_eq!(target, Platform::Esp8266);

        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::Setup(SetupEvent::PlatformResolved { platform: Platform::Esp32, .. })
        ));
    }

    #[tokio::test]
    async fn test_reset_and_status() {
        let dir = TempDir::new().unwrap();
        let (ctx, _rx) = context(dir.path(), Config::default());

        ctx.state.mark_installed(Platform::None).await.unwrap();
        assert!(status(&ctx).await.iter().all(|s| s.installed));

        let cleared = reset(&ctx, Platform::Esp32).await.unwrap();
        assert_eq!(cleared, [Platform::Esp32]);

        let report = status(&ctx).await;
        assert!(!report.iter().find(|s| s.platform == Platform::Esp32).unwrap().installed);
        assert!(report.iter().find(|s| s.platform == Platform::Esp8266).unwrap().installed);

        // Clearing twice is fine
        assert!(reset(&ctx, Platform::Esp32).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_manifest_location() {
        let dir = TempDir::new().unwrap();
        let (ctx, _rx) = context(dir.path(), Config::default());
        assert_eq!(manifest_path(&ctx, dir.path()), dir.path().join("package.json"));

        let err = load_manifest(&ctx, dir.path()).await.unwrap_err();
        assert_eq!(err.kind(), mosdeps_errors::ErrorKind::Configuration);

        std::fs::write(
            dir.path().join("package.json"),
            r#"{"ideDeps": [{"name": "a", "url": "http://x/a.zip", "platform": "esp32"}]}"#,
        )
        .unwrap();
        let manifest = load_manifest(&ctx, dir.path()).await.unwrap();
        assert_eq!(manifest.packages().len(), 1);
    }
}
