//! Command line interface definition

use clap::{Parser, Subcommand};
use mosdeps_types::Platform;
use std::path::PathBuf;

/// mosdeps - toolchain packages and IDE include paths for Mongoose OS
#[derive(Parser)]
#[command(name = "mosdeps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Toolchain packages and IDE include paths for Mongoose OS projects")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write JSON debug logs under the install root's logs directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory receiving packages and install markers
    #[arg(long, global = true, value_name = "DIR")]
    pub install_root: Option<PathBuf>,

    /// Manifest declaring the toolchain packages
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Target platform (esp8266, esp32 or any)
    #[arg(long, global = true, value_name = "PLATFORM")]
    pub platform: Option<Platform>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Install the toolchain packages the project's platform needs
    Setup {
        /// Firmware project directory
        #[arg(long, default_value = ".")]
        project: PathBuf,
    },

    /// Write .vscode/c_cpp_properties.json for the project
    #[command(name = "gen-config")]
    GenConfig {
        /// Firmware project directory
        #[arg(long, default_value = ".")]
        project: PathBuf,
    },

    /// Show which platforms are marked installed
    Status,

    /// Clear install markers so the next setup reinstalls
    ///
    /// Only the --platform marker is cleared when given, otherwise all.
    Reset,

    /// Print the platform the firmware CLI reports for the project
    Platform {
        /// Firmware project directory
        #[arg(long, default_value = ".")]
        project: PathBuf,
    },
}
