//! HTTP client for the external services behind a whoisbatch run.
//!
//! [`LookupClient`] talks to four collaborators:
//!
//! - the free geolocation/ownership service ([`api::FreeApi`])
//! - the paid, higher-accuracy service ([`api::PaidApi`])
//! - an RDAP registry ([`api::RdapApi`])
//! - the Tor exit-address list ([`api::ExitNodeApi`])

#![doc(html_root_url = "https://docs.rs/whoisbatch-client/0.7.0")]

mod client;
mod config;
pub mod api;

pub use client::{LookupClient, LookupClientBuilder};
pub use config::*;
pub use whoisbatch_core::{LookupError, Result};
