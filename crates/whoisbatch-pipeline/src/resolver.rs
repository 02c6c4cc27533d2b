//! Single-target resolution against the free or paid lookup service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use whoisbatch_client::LookupClient;
use whoisbatch_core::links::reference_links;
use whoisbatch_core::{
    BlockKey, CacheEntry, ExitNodeSet, LookupError, Outcome, ResolutionResult, SuccessSource,
    Target,
};

use crate::block::block_key_for;
use crate::cache::CacheSnapshot;
use crate::classify::{classify_by_flags, classify_by_name};

/// Organization shown for hostname targets
pub const DOMAIN_ORGANIZATION: &str = "Domain/Host";

/// One attempt's result plus the cache entry it produced, if any
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The attempt's result record
    pub result: ResolutionResult,
    /// Block data to merge into the live cache
    pub cache_update: Option<(BlockKey, CacheEntry)>,
}

impl Resolution {
    /// A resolution that leaves the cache untouched
    #[must_use]
    pub const fn without_cache(result: ResolutionResult) -> Self {
        Self {
            result,
            cache_update: None,
        }
    }
}

/// Resolves one target against a cache snapshot.
///
/// Implementations must not fail: every error is captured in the returned
/// result's outcome.
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Produce exactly one result for `target`
    async fn resolve(&self, target: &Target, snapshot: &CacheSnapshot) -> Resolution;

    /// Whether results are shared between addresses of one block
    fn uses_block_cache(&self) -> bool {
        true
    }
}

/// Timing and feature switches for [`Resolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Sleep before each live free-service call
    pub politeness_delay: Duration,
    /// Offset of the resume time reported on HTTP 429
    pub rate_limit_backoff: Duration,
    /// Append the RDAP network name to the organization
    pub use_rdap: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            politeness_delay: Duration::from_millis(2500),
            rate_limit_backoff: Duration::from_secs(120),
            use_rdap: false,
        }
    }
}

/// The production resolver backed by [`LookupClient`]
#[derive(Clone)]
pub struct Resolver {
    client: LookupClient,
    credential: Option<String>,
    exit_nodes: Arc<ExitNodeSet>,
    config: ResolverConfig,
}

impl Resolver {
    /// Free-service resolver with no known exit nodes
    #[must_use]
    pub fn new(client: LookupClient, config: ResolverConfig) -> Self {
        Self {
            client,
            credential: None,
            exit_nodes: Arc::new(ExitNodeSet::default()),
            config,
        }
    }

    /// Use the paid service; an empty credential keeps the free service
    #[must_use]
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential.filter(|c| !c.trim().is_empty());
        self
    }

    /// Exit-node set used for Tor classification
    #[must_use]
    pub fn with_exit_nodes(mut self, exit_nodes: Arc<ExitNodeSet>) -> Self {
        self.exit_nodes = exit_nodes;
        self
    }

    /// Returns true when the paid service is selected
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        self.credential.is_some()
    }

    async fn resolve_paid(&self, target: &Target, ip: IpAddr, token: &str) -> Resolution {
        match self.client.paid(token).lookup(ip).await {
            Ok(response) => {
                let organization = self.with_rdap_suffix(ip, response.organization()).await;
                let classification = response.privacy.as_ref().map_or_else(
                    || classify_by_name(Some(ip), &organization, &self.exit_nodes),
                    classify_by_flags,
                );

                let mut result = ResolutionResult::new(
                    target.raw(),
                    Outcome::Success {
                        source: SuccessSource::Paid,
                    },
                );
                result.organization = Some(organization);
                result.country_code = response.country;
                result.classification = classification;
                result.privacy = response.privacy;
                Resolution::without_cache(result)
            }
            Err(e) => Resolution::without_cache(self.error_result(target, &e)),
        }
    }

    async fn resolve_free(&self, target: &Target, ip: IpAddr, snapshot: &CacheSnapshot) -> Resolution {
        let block = block_key_for(ip);

        if let Some(entry) = block.as_ref().and_then(|key| snapshot.lookup(key, Utc::now())) {
            debug!(block = ?block, "served from block cache");
            let mut result = ResolutionResult::new(
                target.raw(),
                Outcome::Success {
                    source: SuccessSource::Cache,
                },
            );
            result.classification = classify_by_name(Some(ip), &entry.organization, &self.exit_nodes);
            result.organization = Some(entry.organization.clone());
            result.country_code.clone_from(&entry.country_code);
            result.country_name.clone_from(&entry.country_name);
            return Resolution::without_cache(result);
        }

        if !self.config.politeness_delay.is_zero() {
            tokio::time::sleep(self.config.politeness_delay).await;
        }

        match self.client.free().lookup(ip).await {
            Ok(response) => {
                let organization = self.with_rdap_suffix(ip, response.combined_name()).await;
                let source = if ip.is_ipv4() {
                    SuccessSource::LiveIpv4
                } else {
                    SuccessSource::LiveIpv6
                };

                let mut result = ResolutionResult::new(target.raw(), Outcome::Success { source });
                result.classification = classify_by_name(Some(ip), &organization, &self.exit_nodes);
                result.organization = Some(organization.clone());
                result.country_code = response.country_code;
                result.country_name = response.country;

                let cache_update = block.map(|key| {
                    let entry = CacheEntry {
                        organization,
                        country_code: result.country_code.clone(),
                        country_name: result.country_name.clone(),
                        stored_at: Utc::now(),
                    };
                    (key, entry)
                });
                Resolution {
                    result,
                    cache_update,
                }
            }
            Err(e) => Resolution::without_cache(self.error_result(target, &e)),
        }
    }

    /// `"<org> [RDAP: <name>]"` when enabled and the registry answers
    async fn with_rdap_suffix(&self, ip: IpAddr, organization: String) -> String {
        if !self.config.use_rdap {
            return organization;
        }
        match self.client.rdap().network_name(ip).await {
            Ok(Some(name)) => format!("{organization} [RDAP: {name}]"),
            Ok(None) => organization,
            Err(e) => {
                debug!(%ip, error = %e, "RDAP lookup failed, ignoring");
                organization
            }
        }
    }

    fn error_result(&self, target: &Target, err: &LookupError) -> ResolutionResult {
        if err.is_rate_limited() {
            let resume_at = self.resume_at(Utc::now());
            warn!(target = %target, %resume_at, "rate limited, deferring");
            ResolutionResult::rate_limited(target.raw(), resume_at)
        } else {
            debug!(target = %target, error = %err, "lookup failed");
            ResolutionResult::failed(target.raw(), err.failure_reason(), err.to_string())
        }
    }

    fn resume_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let backoff = chrono::Duration::from_std(self.config.rate_limit_backoff)
            .unwrap_or_else(|_| chrono::Duration::days(1));
        now + backoff
    }
}

#[async_trait]
impl Resolve for Resolver {
    #[instrument(skip_all, fields(target = %target, paid = self.is_paid()))]
    async fn resolve(&self, target: &Target, snapshot: &CacheSnapshot) -> Resolution {
        let Some(ip) = target.address() else {
            return Resolution::without_cache(domain_result(target));
        };

        let mut resolution = match self.credential.as_deref() {
            Some(token) => self.resolve_paid(target, ip, token).await,
            None => self.resolve_free(target, ip, snapshot).await,
        };
        resolution.result.links = reference_links(target.normalized());
        resolution
    }

    fn uses_block_cache(&self) -> bool {
        !self.is_paid()
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("paid", &self.is_paid())
            .field("exit_nodes", &self.exit_nodes.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Informational result for a hostname; no lookup is performed
#[must_use]
pub fn domain_result(target: &Target) -> ResolutionResult {
    let mut result = ResolutionResult::new(
        target.raw(),
        Outcome::Success {
            source: SuccessSource::Domain,
        },
    );
    result.organization = Some(DOMAIN_ORGANIZATION.to_string());
    result.with_links(reference_links(target.normalized()))
}

/// Links-only result used when lookups are switched off
#[must_use]
pub fn simple_result(target: &Target) -> ResolutionResult {
    ResolutionResult::new(
        target.raw(),
        Outcome::Success {
            source: SuccessSource::Simple,
        },
    )
    .with_links(reference_links(target.normalized()))
}
