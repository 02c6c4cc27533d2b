//! Main lookup client implementation.

use crate::api::{ExitNodeApi, FreeApi, PaidApi, RdapApi};
use crate::config::Endpoints;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use whoisbatch_core::{LookupError, Result};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// RDAP is best-effort, so it gets a much shorter budget
const DEFAULT_RDAP_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client shared by every worker of a run
#[derive(Clone)]
pub struct LookupClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    endpoints: Endpoints,
    timeout: Duration,
    rdap_timeout: Duration,
}

impl LookupClient {
    /// Create a client against the public services with default settings
    pub fn new() -> Result<Self> {
        LookupClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> LookupClientBuilder {
        LookupClientBuilder::new()
    }

    /// Free geolocation/ownership service
    #[must_use]
    pub fn free(&self) -> FreeApi<'_> {
        FreeApi::new(self)
    }

    /// Paid service, authenticated with `token`
    #[must_use]
    pub fn paid<'a>(&'a self, token: &'a str) -> PaidApi<'a> {
        PaidApi::new(self, token)
    }

    /// RDAP registry lookups
    #[must_use]
    pub fn rdap(&self) -> RdapApi<'_> {
        RdapApi::new(self)
    }

    /// Tor exit-address list
    #[must_use]
    pub fn exit_nodes(&self) -> ExitNodeApi<'_> {
        ExitNodeApi::new(self)
    }

    pub(crate) fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    pub(crate) fn rdap_timeout(&self) -> Duration {
        self.inner.rdap_timeout.min(self.inner.timeout)
    }

    /// Perform a GET request and decode a JSON body
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        base: &str,
        path: &str,
        params: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<T> {
        let body = self.get_text(base, path, params, timeout).await?;
        serde_json::from_str(&body).map_err(LookupError::Json)
    }

    /// Perform a GET request and return the body as text
    pub(crate) async fn get_text(
        &self,
        base: &str,
        path: &str,
        params: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<String> {
        let url = build_url(base, path, params)?;
        let timeout = timeout.unwrap_or(self.inner.timeout);
        debug!(url = %redact(&url), "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(&e, timeout))?;

        let status = response.status();
        if status.is_success() {
            response
                .text()
                .await
                .map_err(|e| transport_error(&e, timeout))
        } else {
            Err(self.handle_error(status.as_u16(), response).await)
        }
    }

    /// Convert an error response to a `LookupError`
    async fn handle_error(&self, status: u16, response: reqwest::Response) -> LookupError {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        // Most services put a readable reason under "error" or "message"
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(|e| e.as_str().map(String::from))
            })
            .unwrap_or(body);

        match status {
            401 | 403 => LookupError::Unauthorized,
            404 => LookupError::NotFound { resource: message },
            429 => {
                warn!(?retry_after, "rate limited by lookup service");
                LookupError::RateLimited { retry_after }
            }
            _ => LookupError::Api {
                code: status,
                message,
            },
        }
    }
}

/// Builder for configuring a [`LookupClient`]
pub struct LookupClientBuilder {
    endpoints: Endpoints,
    timeout: Duration,
    rdap_timeout: Duration,
    user_agent: String,
}

impl Default for LookupClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupClientBuilder {
    /// Create a builder pointing at the public services
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout: DEFAULT_TIMEOUT,
            rdap_timeout: DEFAULT_RDAP_TIMEOUT,
            user_agent: format!("whoisbatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Point every service at one base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl AsRef<str>) -> Self {
        self.endpoints = Endpoints::single_host(url.as_ref());
        self
    }

    /// Replace all endpoints
    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the RDAP request timeout (never longer than the request timeout)
    #[must_use]
    pub const fn rdap_timeout(mut self, timeout: Duration) -> Self {
        self.rdap_timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<LookupClient> {
        let http = HttpClient::builder()
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| LookupError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(LookupClient {
            inner: Arc::new(ClientInner {
                http,
                endpoints: self.endpoints,
                timeout: self.timeout,
                rdap_timeout: self.rdap_timeout,
            }),
        })
    }
}

/// Join a base URL and path and append query parameters
fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw).map_err(|e| LookupError::Config(format!("invalid URL {raw}: {e}")))?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

/// Map a reqwest failure onto the error taxonomy
fn transport_error(err: &reqwest::Error, timeout: Duration) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout(timeout.as_secs())
    } else if err.is_connect() {
        LookupError::Connection(err.to_string())
    } else if err.is_decode() {
        LookupError::Malformed(err.to_string())
    } else {
        LookupError::Http(err.to_string())
    }
}

/// Keep credentials out of the logs
fn redact(url: &Url) -> String {
    if url.query_pairs().any(|(k, _)| k == "token") {
        let mut clean = url.clone();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "token" { "***".to_string() } else { v.into_owned() };
                (k.into_owned(), v)
            })
            .collect();
        clean.query_pairs_mut().clear().extend_pairs(pairs);
        clean.to_string()
    } else {
        url.to_string()
    }
}
