//! Configuration sections and their defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    /// Target platform; asked from the firmware CLI when unset
    #[serde(default)]
    pub platform: Option<String>,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub install_root: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    /// Directory for temporary downloads (system temp dir when unset)
    pub temp_dir: Option<PathBuf>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// No connect timeout unless set
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_redirects: default_max_redirects(),
            connect_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Firmware toolchain and IDE integration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    #[serde(default = "default_cli")]
    pub cli: String,
    /// Run external tools through `bash -l` so GUI sessions get a full PATH
    #[serde(default = "default_login_shell")]
    pub login_shell: bool,
    #[serde(default = "default_compiler")]
    pub compiler: String,
    #[serde(default)]
    pub extra_includes: Vec<String>,
    #[serde(default = "default_intellisense_mode")]
    pub intellisense_mode: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            cli: default_cli(),
            login_shell: default_login_shell(),
            compiler: default_compiler(),
            extra_includes: Vec::new(),
            intellisense_mode: default_intellisense_mode(),
        }
    }
}

// Default value functions for serde
fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    format!("mosdeps/{}", env!("CARGO_PKG_VERSION"))
}

fn default_cli() -> String {
    "mos".to_string()
}

fn default_login_shell() -> bool {
    true
}

fn default_compiler() -> String {
    "gcc".to_string()
}

fn default_intellisense_mode() -> String {
    "clang-x64".to_string()
}
