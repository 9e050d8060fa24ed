//! Mindmap CLI library.
//!
//! Argument parsing, configuration assembly, logging setup and report
//! formatting for the `mindmap` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, Result};
pub use output::Formatter;
