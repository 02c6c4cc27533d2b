//! whoisbatch - bulk IP/domain intelligence lookups
//!
//! Resolves ownership, country and anonymity type for lists of addresses
//! while staying under the lookup services' rate limits.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    whoisbatch_cli::run().await
}
