//! mosdeps - toolchain packages and IDE include paths for Mongoose OS
//!
//! This is the main CLI application that drives all operations through the
//! ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use mosdeps_config::Config;
use mosdeps_events::EventReceiver;
use mosdeps_ops::{OperationResult, OpsContextBuilder, OpsCtx};
use mosdeps_types::Platform;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    // Precedence: defaults < file < environment < flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global);

    logging::init_tracing(
        cli.global.json,
        cli.global.debug,
        config.logs_dir().as_deref(),
    );
    info!("Starting mosdeps v{}", env!("CARGO_PKG_VERSION"));

    let (event_sender, event_receiver) = mosdeps_events::channel();

    let ctx = OpsContextBuilder::new()
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;

    let renderer = OutputRenderer::new(cli.global.json);
    let mut event_handler = EventHandler::new(cli.global.json, cli.global.debug);

    let result = execute_command_with_events(
        cli.command,
        cli.global.platform,
        ctx,
        event_receiver,
        &mut event_handler,
    )
    .await;
    event_handler.finish();

    renderer.render_result(&result?)?;
    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    platform: Option<Platform>,
    ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, platform, ctx));
    let mut channel_open = true;

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv(), if channel_open => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => channel_open = false,
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    platform: Option<Platform>,
    ctx: OpsCtx,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Setup { project } => {
            let target = mosdeps_ops::resolve_target(&ctx, platform, &project).await?;
            let manifest = mosdeps_ops::load_manifest(&ctx, &project).await?;
            let report = mosdeps_ops::setup(&ctx, &manifest, target).await?;
            Ok(OperationResult::Setup(report))
        }

        Commands::GenConfig { project } => {
            let report = mosdeps_ops::generate_cpp_config(&ctx, &project).await?;
            Ok(OperationResult::Config(report))
        }

        Commands::Status => Ok(OperationResult::Status(mosdeps_ops::status(&ctx).await)),

        Commands::Reset => {
            let cleared = mosdeps_ops::reset(&ctx, platform.unwrap_or(Platform::None)).await?;
            Ok(OperationResult::Reset(cleared))
        }

        Commands::Platform { project } => {
            let info = mosdeps_ops::detect_platform(&ctx, &project).await?;
            Ok(OperationResult::Platform(info))
        }
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(root) = &global.install_root {
        config.paths.install_root = Some(root.clone());
    }
    if let Some(manifest) = &global.manifest {
        config.paths.manifest = Some(manifest.clone());
    }
}
