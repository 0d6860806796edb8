//! HTTP transport and the status-envelope check shared by both endpoints.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{BoxError, CaiyunError};

/// Capability to issue a single GET request and return the full body.
///
/// The client never applies a timeout or cancellation policy of its own.
/// Implementations decide how long a request may take; callers can also
/// drop the returned future (e.g. through `tokio::time::timeout`).
#[async_trait]
pub trait HttpExecutor: Send + Sync + Debug {
    /// Fetch `url` and return the whole response body, whatever the HTTP
    /// status code. The service reports failures through the body.
    async fn get(&self, url: &str) -> Result<Bytes, BoxError>;
}

/// Timeouts for the default transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for TransportConfig {
    /// 30s to connect, 10s for the whole exchange.
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Default [`HttpExecutor`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    http: reqwest::Client,
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        let config = TransportConfig::default();
        let http = build_http(config).unwrap_or_else(|err| {
            warn!(error = %err, "falling back to a transport without timeouts");
            reqwest::Client::new()
        });
        Self { http }
    }
}

impl ReqwestExecutor {
    /// Transport with the [`TransportConfig::default`] timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transport with explicit timeouts.
    pub fn with_config(config: TransportConfig) -> Result<Self, CaiyunError> {
        let http = build_http(config).map_err(|e| CaiyunError::Transport(Box::new(e)))?;
        Ok(Self { http })
    }

    /// Reuse an already configured `reqwest::Client`.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn build_http(config: TransportConfig) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn get(&self, url: &str) -> Result<Bytes, BoxError> {
        // The URL carries the token; keep it out of error messages.
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = res.status();
        if !status.is_success() {
            debug!(%status, "non-success HTTP status, deferring to response envelope");
        }

        Ok(res.bytes().await.map_err(reqwest::Error::without_url)?)
    }
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    status: String,
}

/// Issue a GET through `http` and make sure the reply envelope says `ok`.
///
/// Only the `status` field is decoded here; the body is handed back untouched
/// for the caller to decode into the full reply type.
pub(crate) async fn execute_get(http: &dyn HttpExecutor, url: &str) -> Result<Bytes, CaiyunError> {
    debug!(url = %redact_token(url), "sending request");

    let body = http.get(url).await.map_err(CaiyunError::Transport)?;
    debug!(bytes = body.len(), "response received");

    let envelope: StatusEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(source) => return Err(CaiyunError::MalformedResponse { source, body }),
    };

    if envelope.status != "ok" {
        warn!(status = %envelope.status, "service returned a non-ok status");
        return Err(CaiyunError::RemoteStatus {
            status: envelope.status,
            body,
        });
    }

    Ok(body)
}

/// Replace the token segment of a target URL so it can be logged.
///
/// Targets look like `{base}/{version}/{token}/{coordinates}/{endpoint}`, so
/// the token is the third segment counting back from the endpoint file.
pub(crate) fn redact_token(url: &str) -> String {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };

    let mut segments: Vec<&str> = path.split('/').collect();
    let len = segments.len();
    if len >= 3 && segments[len - 1].ends_with(".json") {
        segments[len - 3] = "***";
    }

    let mut redacted = segments.join("/");
    if let Some(query) = query {
        redacted.push('?');
        redacted.push_str(query);
    }
    redacted
}
