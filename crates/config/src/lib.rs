#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for mosdeps
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/mosdeps/config.toml)
//! - Environment variables
//! - CLI flags

pub mod constants;
pub mod core;
pub mod root;

pub use core::{GeneralConfig, NetworkConfig, PathConfig, ToolchainConfig};
pub use root::InstallRoot;

use mosdeps_errors::{ConfigError, Error};
use mosdeps_types::Platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join(constants::CONFIG_FILE))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;
        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(root) = std::env::var("MOSDEPS_INSTALL_ROOT") {
            self.paths.install_root = Some(PathBuf::from(root));
        }

        if let Ok(manifest) = std::env::var("MOSDEPS_MANIFEST") {
            self.paths.manifest = Some(PathBuf::from(manifest));
        }

        if let Ok(platform) = std::env::var("MOSDEPS_PLATFORM") {
            if platform.parse::<Platform>().is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "MOSDEPS_PLATFORM".to_string(),
                    value: platform,
                }
                .into());
            }
            self.general.platform = Some(platform);
        }

        if let Ok(redirects) = std::env::var("MOSDEPS_MAX_REDIRECTS") {
            self.network.max_redirects =
                redirects.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "MOSDEPS_MAX_REDIRECTS".to_string(),
                    value: redirects,
                })?;
        }

        if let Ok(cli) = std::env::var("MOSDEPS_FIRMWARE_CLI") {
            self.toolchain.cli = cli;
        }

        Ok(())
    }

    /// Platform pinned by configuration, if any
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the configured string names no
    /// known platform.
    pub fn platform(&self) -> Result<Option<Platform>, Error> {
        self.general
            .platform
            .as_deref()
            .map(|value| {
                value.parse::<Platform>().map_err(|_| {
                    ConfigError::InvalidValue {
                        field: "general.platform".to_string(),
                        value: value.to_string(),
                    }
                    .into()
                })
            })
            .transpose()
    }

    /// Resolve the install root, falling back to the user data directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when no root is configured and
    /// the platform has no data directory.
    pub fn install_root(&self) -> Result<InstallRoot, Error> {
        match &self.paths.install_root {
            Some(path) => InstallRoot::new(path.clone()),
            None => {
                let data = dirs::data_dir().ok_or_else(|| ConfigError::MissingField {
                    field: "install_root".to_string(),
                })?;
                InstallRoot::new(data.join(constants::DATA_DIR_NAME))
            }
        }
    }

    /// Directory the debug log file is written to
    #[must_use]
    pub fn logs_dir(&self) -> Option<PathBuf> {
        self.install_root()
            .ok()
            .map(|root| root.path().join(constants::LOGS_DIR))
    }
}
