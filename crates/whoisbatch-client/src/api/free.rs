//! Free geolocation/ownership service.

use crate::LookupClient;
use std::net::IpAddr;
use whoisbatch_core::{FreeLookupResponse, LookupError, Result};

/// Fields requested from the service; keeps responses small
const FIELDS: &str = "status,message,country,countryCode,isp,org,query";

/// Free service endpoints
pub struct FreeApi<'a> {
    client: &'a LookupClient,
}

impl<'a> FreeApi<'a> {
    pub(crate) fn new(client: &'a LookupClient) -> Self {
        Self { client }
    }

    /// Look up ownership and country of an address.
    ///
    /// A `"fail"` status becomes [`LookupError::ServiceRejected`]; any other
    /// non-success status becomes [`LookupError::Malformed`].
    pub async fn lookup(&self, ip: IpAddr) -> Result<FreeLookupResponse> {
        let response: FreeLookupResponse = self
            .client
            .get_json(
                &self.client.endpoints().free,
                &format!("/json/{ip}"),
                &[("fields", FIELDS)],
                None,
            )
            .await?;

        if response.is_success() {
            Ok(response)
        } else if response.is_fail() {
            Err(LookupError::ServiceRejected(
                response.message.unwrap_or_else(|| "unknown failure".to_string()),
            ))
        } else {
            Err(LookupError::Malformed(format!(
                "unexpected status {:?}",
                response.status
            )))
        }
    }
}
