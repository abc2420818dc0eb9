#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Human-facing progress output for mosdeps
//!
//! Two small pieces, both generic over where the output ends up:
//! - [`Reporter`] formats indented, optionally prefixed lines for a [`TextSink`]
//! - [`StatusIndicator`] drives a transient single-line [`StatusSurface`]

mod reporter;
mod status;

pub use reporter::{Reporter, TextSink, TAB_SIZE};
pub use status::{StatusIndicator, StatusSurface};
