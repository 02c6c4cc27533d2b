//! Command implementations.

pub mod config;
pub mod lookup;

use crate::config::Config;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Paid-service token, if any
    pub api_key: Option<String>,

    /// Output format
    pub output_format: OutputFormat,

    /// Log verbosity (count of `-v`)
    pub verbose: u8,

    /// Disable colors
    pub no_color: bool,

    /// Loaded configuration file
    pub config: Config,
}
