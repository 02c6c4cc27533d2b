//! Paid, higher-accuracy lookup service.

use crate::LookupClient;
use std::net::IpAddr;
use whoisbatch_core::{PaidLookupResponse, Result};

/// Paid service endpoints
pub struct PaidApi<'a> {
    client: &'a LookupClient,
    token: &'a str,
}

impl<'a> PaidApi<'a> {
    pub(crate) fn new(client: &'a LookupClient, token: &'a str) -> Self {
        Self { client, token }
    }

    /// Look up an address, including privacy flags when the plan has them
    pub async fn lookup(&self, ip: IpAddr) -> Result<PaidLookupResponse> {
        self.client
            .get_json(
                &self.client.endpoints().paid,
                &format!("/{ip}"),
                &[("token", self.token)],
                None,
            )
            .await
    }
}
