//! Core types and errors shared by the whoisbatch crates.
//!
//! This crate provides the foundational types of a bulk lookup run:
//!
//! - **Types**: targets, per-target [`ResolutionResult`] records, the
//!   network-block cache entry and the anonymity classification tags
//! - **Errors**: transport and service failures as [`LookupError`]
//!
//! # Example
//!
//! ```rust
//! use whoisbatch_core::{Target, TargetKind};
//!
//! let target = Target::new(" 8.8.8.8 ");
//! assert_eq!(target.normalized(), "8.8.8.8");
//! assert!(matches!(target.kind(), TargetKind::Address(_)));
//! ```

#![doc(html_root_url = "https://docs.rs/whoisbatch-core/0.7.0")]

mod error;
pub mod links;
pub mod types;

pub use error::{LookupError, Result};
pub use types::*;
