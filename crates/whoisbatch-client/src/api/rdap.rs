//! RDAP registry lookups.

use crate::LookupClient;
use std::net::IpAddr;
use whoisbatch_core::{RdapNetwork, Result};

/// RDAP endpoints
pub struct RdapApi<'a> {
    client: &'a LookupClient,
}

impl<'a> RdapApi<'a> {
    pub(crate) fn new(client: &'a LookupClient) -> Self {
        Self { client }
    }

    /// Fetch the registered network object for an address
    pub async fn network(&self, ip: IpAddr) -> Result<RdapNetwork> {
        self.client
            .get_json(
                &self.client.endpoints().rdap,
                &format!("/ip/{ip}"),
                &[],
                Some(self.client.rdap_timeout()),
            )
            .await
    }

    /// Registered network name, if the registry has a non-empty one
    pub async fn network_name(&self, ip: IpAddr) -> Result<Option<String>> {
        let network = self.network(ip).await?;
        Ok(network.name.filter(|n| !n.trim().is_empty()))
    }
}
