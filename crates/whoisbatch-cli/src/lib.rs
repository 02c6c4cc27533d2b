//! # whoisbatch-cli
//!
//! Command-line front end for the whoisbatch pipeline.
//!
//! ## Features
//!
//! - **Bulk lookups**: targets from arguments or a file, one per line
//! - **Rate-limit aware**: HTTP 429 targets are parked and retried later
//! - **Live progress**: processed/total, deferred count and ETA on stderr
//! - **Multiple output formats**: Pretty tables, JSON, CSV, YAML

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
