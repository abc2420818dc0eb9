//! Fixed names used inside the install root and the project directory
//!
//! These are deliberately not configurable: other tools look for the
//! markers and the IDE config file at these locations.

/// Prefix of the per-platform install marker files (`install.<platform>`)
pub const MARKER_PREFIX: &str = "install.";

/// Prefix for temporary download files
pub const TEMP_FILE_PREFIX: &str = "package-";

/// Log directory, relative to the install root
pub const LOGS_DIR: &str = "logs";

/// IDE configuration file, relative to the project directory
pub const CPP_PROPERTIES_PATH: &str = ".vscode/c_cpp_properties.json";

/// Default config file name under the user config directory
pub const CONFIG_FILE: &str = "mosdeps/config.toml";

/// Default install root directory name under the user data directory
pub const DATA_DIR_NAME: &str = "mosdeps";

/// Manifest looked up in the project directory when none is configured
pub const MANIFEST_FILE: &str = "package.json";
