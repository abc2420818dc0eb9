#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package installation for mosdeps
//!
//! Downloaded archives are ZIP files. They are extracted on a blocking
//! worker thread into the package's install directory, after which the
//! platform's install marker is touched.

mod extract;
mod installer;

pub use extract::ExtractStats;
pub use installer::{InstallReport, PackageInstaller};
