//! Project manifest listing toolchain packages

use crate::{PackageDescriptor, Platform};
use mosdeps_errors::{ConfigError, Error};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Manifest field holding the package list
pub const MANIFEST_FIELD: &str = "ideDeps";

/// Field name used by older manifests, accepted as a fallback
pub const MANIFEST_FIELD_LEGACY: &str = "extensionDependencies";

/// Flat list of package descriptors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    packages: Vec<PackageDescriptor>,
}

impl Manifest {
    #[must_use]
    pub fn new(packages: Vec<PackageDescriptor>) -> Self {
        Self { packages }
    }

    /// Extract the package list from a parsed manifest document
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if neither package field is present
    /// and `ConfigError::ParseError` if a descriptor is malformed.
    pub fn from_value(document: &Value) -> Result<Self, Error> {
        let list = document
            .get(MANIFEST_FIELD)
            .or_else(|| document.get(MANIFEST_FIELD_LEGACY))
            .ok_or_else(|| ConfigError::MissingField {
                field: MANIFEST_FIELD.to_string(),
            })?;

        let packages =
            Vec::<PackageDescriptor>::deserialize(list).map_err(|e| ConfigError::ParseError {
                message: format!("{MANIFEST_FIELD}: {e}"),
            })?;
        Ok(Self { packages })
    }

    /// Parse a manifest from JSON text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed JSON, otherwise the
    /// errors of [`Manifest::from_value`].
    pub fn from_json(contents: &str) -> Result<Self, Error> {
        let document: Value =
            serde_json::from_str(contents).map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })?;
        Self::from_value(&document)
    }

    /// Load a manifest file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file cannot be read, otherwise
    /// the errors of [`Manifest::from_json`].
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;
        Self::from_json(&contents)
    }

    #[must_use]
    pub fn packages(&self) -> &[PackageDescriptor] {
        &self.packages
    }

    /// Packages wanted for `target`
    ///
    /// A concrete target keeps packages resolving to that platform; the
    /// `None` target keeps every package with a concrete platform. Packages
    /// whose platform cannot be resolved are never selected.
    #[must_use]
    pub fn select(&self, target: Platform) -> Vec<&PackageDescriptor> {
        self.packages
            .iter()
            .filter(|pkg| pkg.resolved_platform().matches(target))
            .collect()
    }

    /// Packages whose platform string names no known architecture
    #[must_use]
    pub fn unresolved(&self) -> Vec<&PackageDescriptor> {
        self.packages
            .iter()
            .filter(|pkg| !pkg.resolved_platform().is_concrete())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosdeps_errors::ErrorKind;
    use serde_json::json;

    fn mixed_manifest() -> Manifest {
        Manifest::from_value(&json!({
            "name": "mongoose-os-ide",
            "ideDeps": [
                { "name": "a", "description": "", "url": "http://x/a.zip", "platform": "esp32" },
                { "name": "b", "description": "", "url": "http://x/b.zip", "platform": "esp8266" },
                { "name": "c", "description": "", "url": "http://x/c.zip", "platform": "esp32-idf" },
                { "name": "d", "description": "", "url": "http://x/d.zip", "platform": "cc3200" }
            ]
        }))
        .unwrap()
    }

    fn names(selected: &[&PackageDescriptor]) -> Vec<String> {
        selected.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_select_concrete_target() {
        let manifest = mixed_manifest();
        assert_eq!(names(&manifest.select(Platform::Esp32)), ["a", "c"]);
        assert_eq!(names(&manifest.select(Platform::Esp8266)), ["b"]);
    }

    #[test]
    fn test_select_any_skips_unresolved() {
        let manifest = mixed_manifest();
        assert_eq!(names(&manifest.select(Platform::None)), ["a", "b", "c"]);
        assert_eq!(names(&manifest.unresolved()), ["d"]);
    }

    #[test]
    fn test_optional_fields() {
        let manifest = Manifest::from_json(
            r#"{"ideDeps": [{"name": "sdk", "description": "headers",
                "url": "https://h/sdk.zip", "platform": "esp32",
                "installPath": ".esp32", "testFile": "include/sdk.h"}]}"#,
        )
        .unwrap();
        let pkg = &manifest.packages()[0];
        assert_eq!(pkg.install_path.as_deref(), Some(".esp32"));
        assert_eq!(pkg.test_file.as_deref(), Some("include/sdk.h"));
    }

    #[test]
    fn test_legacy_field_name() {
        let manifest = Manifest::from_value(&json!({
            "extensionDependencies": [
                { "name": "a", "url": "http://x/a.zip", "platform": "esp32" }
            ]
        }))
        .unwrap();
        assert_eq!(manifest.packages().len(), 1);
    }

    #[test]
    fn test_missing_field_is_configuration_error() {
        let err = Manifest::from_value(&json!({ "name": "x" })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains(MANIFEST_FIELD));
    }

    #[test]
    fn test_malformed_descriptor() {
        let err = Manifest::from_json(r#"{"ideDeps": [{"name": 3}]}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ParseError { .. })
        ));
    }
}
