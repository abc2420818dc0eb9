//! The install root and the paths derived from it

use crate::constants::MARKER_PREFIX;
use mosdeps_errors::{ConfigError, Error};
use mosdeps_types::{PackageDescriptor, Platform};
use std::path::{Path, PathBuf};

/// Base directory every package installation is resolved against
///
/// Built once from configuration and handed to each component that resolves
/// paths; there is no process-wide default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoot(PathBuf);

impl InstallRoot {
    /// Wrap a configured directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when the path is empty.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "install_root".to_string(),
            }
            .into());
        }
        Ok(Self(path))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory a package is extracted into
    #[must_use]
    pub fn package_dir(&self, pkg: &PackageDescriptor) -> PathBuf {
        match pkg.install_path.as_deref() {
            Some(sub) if !sub.is_empty() => self.0.join(sub),
            _ => self.0.clone(),
        }
    }

    /// Absolute path of the package's test file, if it declares one
    #[must_use]
    pub fn test_file(&self, pkg: &PackageDescriptor) -> Option<PathBuf> {
        pkg.test_file
            .as_deref()
            .map(|file| self.package_dir(pkg).join(file))
    }

    /// Marker file recording that `platform`'s packages are installed
    #[must_use]
    pub fn marker(&self, platform: Platform) -> PathBuf {
        self.0.join(format!("{MARKER_PREFIX}{}", platform.name()))
    }
}

impl AsRef<Path> for InstallRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(install_path: Option<&str>, test_file: Option<&str>) -> PackageDescriptor {
        PackageDescriptor {
            name: "sdk".into(),
            description: String::new(),
            url: "http://example.com/sdk.zip".into(),
            platform: "esp32".into(),
            install_path: install_path.map(Into::into),
            test_file: test_file.map(Into::into),
        }
    }

    #[test]
    fn test_empty_root_is_rejected() {
        assert!(InstallRoot::new("").is_err());
    }

    #[test]
    fn test_package_paths() {
        let root = InstallRoot::new("/opt/ext").unwrap();
        assert_eq!(root.package_dir(&pkg(None, None)), Path::new("/opt/ext"));
        assert_eq!(
            root.package_dir(&pkg(Some(".esp32"), None)),
            Path::new("/opt/ext/.esp32")
        );
        assert_eq!(
            root.test_file(&pkg(Some(".esp32"), Some("inc/a.h"))),
            Some(PathBuf::from("/opt/ext/.esp32/inc/a.h"))
        );
        assert_eq!(root.test_file(&pkg(None, None)), None);
    }

    #[test]
    fn test_marker_names() {
        let root = InstallRoot::new("/opt/ext").unwrap();
        assert_eq!(
            root.marker(Platform::Esp8266),
            Path::new("/opt/ext/install.esp8266")
        );
        assert_eq!(root.marker(Platform::Esp32), Path::new("/opt/ext/install.esp32"));
    }
}
