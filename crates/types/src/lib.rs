#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for mosdeps
//!
//! This crate provides the target platform classification, the package
//! descriptors declared by a project manifest, and the manifest itself.

pub mod manifest;
pub mod package;
pub mod platform;

// Re-export commonly used types
pub use manifest::{Manifest, MANIFEST_FIELD, MANIFEST_FIELD_LEGACY};
pub use package::PackageDescriptor;
pub use platform::{ParsePlatformError, Platform};
