//! Target platform classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target architecture of a firmware project or a toolchain package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Esp8266,
    Esp32,
    /// No specific architecture; means "every platform" when selecting
    None,
}

/// Identifiers matched against free-form platform strings, in priority order
const IDENTIFIERS: [(&str, Platform); 2] =
    [("esp8266", Platform::Esp8266), ("esp32", Platform::Esp32)];

impl Platform {
    /// Classify a free-form platform string
    ///
    /// The first known identifier contained anywhere in `input` wins.
    /// Strings containing none of them map to [`Platform::None`].
    #[must_use]
    pub fn classify(input: &str) -> Self {
        IDENTIFIERS
            .iter()
            .find(|(id, _)| input.contains(*id))
            .map_or(Self::None, |(_, platform)| *platform)
    }

    /// All concrete platforms, in a fixed order
    #[must_use]
    pub fn concrete() -> &'static [Platform] {
        &[Platform::Esp8266, Platform::Esp32]
    }

    #[must_use]
    pub fn is_concrete(self) -> bool {
        self != Self::None
    }

    /// Stable identifier used in marker file names
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Esp8266 => "esp8266",
            Self::Esp32 => "esp32",
            Self::None => "none",
        }
    }

    /// Whether a package built for `self` is wanted by a `target` selection
    #[must_use]
    pub fn matches(self, target: Platform) -> bool {
        self.is_concrete() && (target == Self::None || self == target)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when user input names no known platform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform: {0} (expected esp8266, esp32 or any)")]
pub struct ParsePlatformError(pub String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    /// Strict parsing for user supplied values (CLI flags, config)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "esp8266" => Ok(Self::Esp8266),
            "esp32" => Ok(Self::Esp32),
            "any" | "all" | "none" => Ok(Self::None),
            other => Err(ParsePlatformError(other.to_string())),
        }
    }
}
