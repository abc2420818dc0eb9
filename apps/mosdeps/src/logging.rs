//! Structured logging integration for events
//!
//! Every event the CLI receives is mirrored to `tracing` at the level the
//! event itself reports, with its serialized form attached as a field.

use chrono::Utc;
use mosdeps_events::AppEvent;
use std::path::Path;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Filter used with `--debug` unless `RUST_LOG` is set
const DEBUG_FILTER: &str = "info,mosdeps=debug,mosdeps_config=debug,mosdeps_events=debug,\
mosdeps_install=debug,mosdeps_net=debug,mosdeps_ops=debug,mosdeps_platform=debug,mosdeps_state=debug";

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    let domain = event.log_target();
    let fields = event.log_fields();
    match event.log_level() {
        Level::ERROR => error!(domain, event = %fields, "event"),
        Level::WARN => warn!(domain, event = %fields, "event"),
        Level::INFO => info!(domain, event = %fields, "event"),
        _ => debug!(domain, event = %fields, "event"),
    }
}

/// Initialize tracing/logging
///
/// With `debug` set, JSON logs go to a timestamped file under `log_dir`.
/// Otherwise, or when the file cannot be created, plain logs go to stderr.
pub fn init_tracing(json_mode: bool, debug: bool, log_dir: Option<&Path>) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug;

    if debug_enabled {
        if let Some(dir) = log_dir {
            match open_log_file(dir) {
                Ok((path, file)) => {
                    tracing_subscriber::fmt()
                        .json()
                        .with_writer(file)
                        .with_env_filter(env_filter(DEBUG_FILTER))
                        .init();
                    if !json_mode {
                        eprintln!("Debug logging enabled: {}", path.display());
                    }
                    return;
                }
                Err(e) => {
                    if !json_mode {
                        eprintln!("Warning: Failed to create log file: {e}");
                    }
                }
            }
        }
    }

    if json_mode && !debug_enabled {
        // Keep stdout clean for the JSON result
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
        return;
    }

    let default = if debug_enabled { DEBUG_FILTER } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(default))
        .init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn open_log_file(dir: &Path) -> std::io::Result<(std::path::PathBuf, std::fs::File)> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "mosdeps-{}.log",
        Utc::now().format("%Y%m%d-%H%M%S")
    ));
    let file = std::fs::File::create(&path)?;
    Ok((path, file))
}
