//! Tor exit-address list.

use crate::LookupClient;
use tracing::info;
use whoisbatch_core::{ExitNodeSet, Result};

/// Exit list endpoint
pub struct ExitNodeApi<'a> {
    client: &'a LookupClient,
}

impl<'a> ExitNodeApi<'a> {
    pub(crate) fn new(client: &'a LookupClient) -> Self {
        Self { client }
    }

    /// Download and parse the current exit-address document
    pub async fn fetch(&self) -> Result<ExitNodeSet> {
        let document = self
            .client
            .get_text(&self.client.endpoints().exit_list, "", &[], None)
            .await?;
        let set = ExitNodeSet::parse(&document);
        info!(exits = set.len(), "loaded exit-node list");
        Ok(set)
    }
}
