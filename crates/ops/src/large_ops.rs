//! Multi-step operations: package setup and IDE config generation

use crate::compiler::compiler_search_paths;
use crate::cpp::{CppProperties, IncludeSources};
use crate::manager::PackageManager;
use crate::types::{ConfigReport, PackageOutcome, PlatformReport, SetupReport};
use crate::OpsCtx;
use mosdeps_errors::Error;
use mosdeps_events::{AppEvent, EventEmitter, SetupEvent};
use mosdeps_types::{Manifest, Platform};
use std::path::Path;

/// Make sure the packages for `target` are installed
///
/// Nothing runs when the markers show `target` is installed. Otherwise
/// packages with an unknown platform are reported once and each pending
/// platform in the target's scope gets a download batch followed by
/// an install batch, and its marker is written once both succeed.
///
/// # Errors
///
/// Returns the first package error of a failed batch, or an I/O error if a
/// marker cannot be written. Platforms completed before the failure keep
/// their markers.
pub async fn setup(ctx: &OpsCtx, manifest: &Manifest, target: Platform) -> Result<SetupReport, Error> {
    if ctx.state.is_installed(target).await {
        tracing::info!(platform = %target, "packages already installed");
        ctx.tx
            .emit(AppEvent::Setup(SetupEvent::AlreadyInstalled { platform: target }));
        return Ok(SetupReport {
            target,
            already_installed: true,
            platforms: Vec::new(),
        });
    }

    ctx.tx.emit_operation_started("setup");

    for pkg in manifest.unresolved() {
        tracing::warn!(package = %pkg.name, platform = %pkg.platform, "unknown package platform");
        ctx.tx.emit_warning_with_context(
            format!("skipping {}: unknown platform", pkg.name),
            pkg.platform.clone(),
        );
    }

    let mut platforms = Vec::new();
    for platform in ctx.state.pending_platforms(target).await {
        match setup_platform(ctx, manifest, platform).await {
            Ok(report) => platforms.push(report),
            Err(e) => {
                ctx.tx.emit_operation_failed("setup", e.to_string());
                return Err(e);
            }
        }
    }

    ctx.tx.emit_operation_completed("setup", true);

    Ok(SetupReport {
        target,
        already_installed: false,
        platforms,
    })
}

async fn setup_platform(
    ctx: &OpsCtx,
    manifest: &Manifest,
    platform: Platform,
) -> Result<PlatformReport, Error> {
    let manager = PackageManager::new(
        manifest,
        platform,
        ctx.downloader.clone(),
        ctx.installer.clone(),
        ctx.state.clone(),
        ctx.tx.clone(),
    );

    ctx.tx.emit(AppEvent::Setup(SetupEvent::PlatformStarted {
        platform,
        packages: manager.select_packages().len(),
    }));

    let downloads = manager.download_packages().await?;
    let reports = manager.install_packages().await?;
    ctx.state.mark_installed(platform).await?;

    tracing::info!(
        platform = %platform,
        downloaded = downloads.downloaded,
        skipped = downloads.skipped,
        "platform packages installed"
    );
    ctx.tx
        .emit(AppEvent::Setup(SetupEvent::PlatformCompleted { platform }));

    Ok(PlatformReport {
        platform,
        downloaded: downloads.downloaded,
        packages: reports.into_iter().map(PackageOutcome::from).collect(),
    })
}

/// Write the C/C++ include configuration for `project_dir`
///
/// Combines the manifest includes reported by the firmware CLI, the
/// configured extra includes, the compiler's search paths and the firmware
/// repository directories.
///
/// # Errors
///
/// Returns a `ProcessError` if the firmware CLI or the compiler fails, or an
/// I/O error if the file cannot be written.
pub async fn generate_cpp_config(ctx: &OpsCtx, project_dir: &Path) -> Result<ConfigReport, Error> {
    let toolchain = &ctx.config.toolchain;
    let cli = ctx.firmware_cli(project_dir);

    let sources = IncludeSources {
        manifest: cli.includes().await?,
        extra: toolchain.extra_includes.clone(),
        compiler: compiler_search_paths(
            ctx.process.as_ref(),
            &toolchain.compiler,
            toolchain.login_shell,
        )
        .await?,
        repo_dir: Some(cli.repo_dir().await?),
    };

    let include_paths = sources.merge();
    let path = CppProperties::new(include_paths.clone(), toolchain.intellisense_mode.clone())
        .write(project_dir)
        .await?;

    tracing::info!(path = %path.display(), count = include_paths.len(), "IDE config written");
    ctx.tx.emit(AppEvent::Setup(SetupEvent::ConfigGenerated {
        path: path.clone(),
        include_paths: include_paths.len(),
    }));

    Ok(ConfigReport {
        path,
        include_paths,
    })
}
