#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for mosdeps
//!
//! This crate fetches package archives over plain HTTP(S) GET into
//! temporary files. Redirects are followed by hand so the hop count can be
//! bounded and reported.

mod client;
mod download;

pub use client::{NetClient, NetConfig};
pub use download::{DownloadedArtifact, PackageDownloader, ProgressMeter, ProgressSample};
