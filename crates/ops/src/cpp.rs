//! C/C++ IDE include configuration

use mosdeps_config::constants::CPP_PROPERTIES_PATH;
use mosdeps_errors::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Name of the single configuration in the generated file
pub const CONFIGURATION_NAME: &str = "Mongoose OS";

/// Placeholder the IDE expands to the project directory
pub const WORKSPACE_ROOT: &str = "${workspaceRoot}";

const PROPERTIES_VERSION: u32 = 2;

/// Contents of `c_cpp_properties.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppProperties {
    pub configurations: Vec<CppConfiguration>,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CppConfiguration {
    pub name: String,
    pub include_path: Vec<String>,
    pub intelli_sense_mode: String,
    pub browse: Browse,
    pub defines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Browse {
    pub path: Vec<String>,
    pub database_filename: String,
    pub limit_symbols_to_included_headers: bool,
}

/// Inputs to the include path list, in the order they are emitted
#[derive(Debug, Clone, Default)]
pub struct IncludeSources {
    /// Includes declared by the project manifest, possibly relative
    pub manifest: Vec<String>,
    /// Additional directories from the configuration
    pub extra: Vec<String>,
    /// Compiler search paths
    pub compiler: Vec<PathBuf>,
    /// Firmware repository clone
    pub repo_dir: Option<PathBuf>,
}

impl IncludeSources {
    /// Merged include path list with duplicates removed
    ///
    /// Relative manifest and extra entries are anchored at the workspace
    /// root. The repository's `fw/src`, the repository itself and the
    /// generated build headers follow the compiler paths.
    #[must_use]
    pub fn merge(&self) -> Vec<String> {
        let mut paths = Vec::new();

        for include in self.manifest.iter().chain(&self.extra) {
            paths.push(anchor(include));
        }
        for dir in &self.compiler {
            paths.push(dir.display().to_string());
        }
        if let Some(repo) = &self.repo_dir {
            paths.push(repo.join("fw/src").display().to_string());
            paths.push(repo.display().to_string());
        }
        paths.push(format!("{WORKSPACE_ROOT}/build/gen"));

        let mut seen = HashSet::new();
        paths.retain(|p| seen.insert(p.clone()));
        paths
    }
}

fn anchor(include: &str) -> String {
    if include.starts_with('/') || include.starts_with(WORKSPACE_ROOT) {
        include.to_string()
    } else {
        format!("{WORKSPACE_ROOT}/{include}")
    }
}

impl CppProperties {
    /// Properties with one configuration using `include_paths` for both
    /// lookup and browsing
    #[must_use]
    pub fn new(include_paths: Vec<String>, intelli_sense_mode: impl Into<String>) -> Self {
        Self {
            configurations: vec![CppConfiguration {
                name: CONFIGURATION_NAME.to_string(),
                include_path: include_paths.clone(),
                intelli_sense_mode: intelli_sense_mode.into(),
                browse: Browse {
                    path: include_paths,
                    database_filename: String::new(),
                    limit_symbols_to_included_headers: true,
                },
                defines: Vec::new(),
            }],
            version: PROPERTIES_VERSION,
        }
    }

    /// Serialize as JSON indented with four spaces
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| Error::internal(e.to_string()))
    }

    /// Write to the IDE config location inside `project_dir`
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or file cannot be written.
    pub async fn write(&self, project_dir: &Path) -> Result<PathBuf, Error> {
        let path = project_dir.join(CPP_PROPERTIES_PATH);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }
        tokio::fs::write(&path, self.to_json()?)
            .await
            .map_err(|e| Error::io_with_path(&e, &path))?;
        Ok(path)
    }
}
