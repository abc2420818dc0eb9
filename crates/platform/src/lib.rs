#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Process execution for mosdeps
//!
//! External tools (the firmware CLI, the host compiler) are run through the
//! [`ProcessOperations`] trait so callers can substitute a fake in tests.
//! [`exec`] and [`login_exec`] add shell semantics on top: a command line is
//! handed to `sh -c`, or to `bash -l -c` when a login environment is needed
//! to get a complete `PATH`.

pub mod exec;
pub mod process;

pub use exec::{exec, login_command, login_exec, ExecOptions, ExecOutput};
pub use process::{CommandOutput, PlatformCommand, ProcessOperations, ShellProcessOperations};
