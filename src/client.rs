//! Client side of the relay.
//!
//! Sends a [`RequestSpec`] to a running relay and always hands back a
//! [`ProxyResult`], so callers render one shape no matter where a failure
//! happened: upstream, inside the relay, or on the way to the relay.
//!
//! The relay must run in full response mode; a bare body-only reply is
//! reported as an error instead of being decoded.

use crate::proxy::{ProxyResult, RequestSpec};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    /// Creates a client for the relay at `base_url`, e.g. `http://localhost:3005`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn proxy_url(&self) -> String {
        format!("{}/proxy", self.base_url)
    }

    /// Relays `spec` and normalizes every outcome into a `ProxyResult`.
    ///
    /// Error replies from the relay (`{"error": ...}` with a 4xx/5xx) decode
    /// like any other reply. Unreachable relays and non-JSON replies yield a
    /// result with null status, headers and body plus a descriptive error.
    pub async fn send(&self, spec: &RequestSpec) -> ProxyResult {
        let response = match self.http.post(self.proxy_url()).json(spec).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(relay = %self.base_url, error = %e, "relay unreachable");
                return ProxyResult::failure(format!("Could not reach relay: {}", e));
            }
        };

        let status = response.status();
        let decoded = match response.json::<Value>().await {
            Ok(value) => decode_result(value),
            Err(e) => Err(e.to_string()),
        };

        decoded.unwrap_or_else(|reason| {
            tracing::warn!(relay = %self.base_url, %status, error = %reason, "unreadable relay response");
            ProxyResult::failure(format!(
                "Relay returned an unreadable response (HTTP {}): {}",
                status.as_u16(),
                reason
            ))
        })
    }
}

/// Accepts only objects shaped like a relay result, carrying at least a
/// `status` or an `error`.
fn decode_result(value: Value) -> Result<ProxyResult, String> {
    let is_result = value
        .as_object()
        .map_or(false, |object| object.contains_key("status") || object.contains_key("error"));
    if !is_result {
        return Err("not a relay result, expected full response mode".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}
