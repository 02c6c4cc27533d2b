//! Service endpoint modules.

mod exit_nodes;
mod free;
mod paid;
mod rdap;

pub use exit_nodes::ExitNodeApi;
pub use free::FreeApi;
pub use paid::PaidApi;
pub use rdap::RdapApi;
