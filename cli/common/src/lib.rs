//! Shared utilities for the mHealth SDK command-line tools.
//!
//! Argument types, logging setup and output formatting used by `sp-demo`.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_bytes, redact};
pub use logging::init_logging;
