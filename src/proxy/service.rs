//! Upstream service abstraction layer.
//!
//! The relay never talks to the network directly; it hands a validated
//! request to an [`UpstreamService`]. The default implementation uses
//! reqwest, tests substitute recording stubs.

use super::types::{UpstreamRequest, UpstreamResponse};
use crate::config::Config;
use crate::error::RelayError;
use reqwest::{
    header::{HeaderMap, CONTENT_TYPE},
    Method,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Trait for services that perform the outbound HTTP call.
///
/// Implementations must return every completed response as `Ok`, whatever
/// its status code. Only failures to obtain a response are errors.
pub trait UpstreamService: Send + Sync {
    fn send(
        &self,
        request: UpstreamRequest,
    ) -> Pin<Box<dyn Future<Output = Result<UpstreamResponse, RelayError>> + Send + '_>>;
}

/// Default upstream service backed by a shared reqwest client.
#[derive(Clone)]
pub struct HttpUpstreamService {
    client: reqwest::Client,
}

impl HttpUpstreamService {
    /// Builds the HTTP client from the relay configuration.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Creates a new `HttpUpstreamService` wrapped in an `Arc`.
    pub fn arc(config: &Config) -> Result<Arc<Self>, reqwest::Error> {
        Self::from_config(config).map(Arc::new)
    }

    async fn execute(&self, request: UpstreamRequest) -> Result<UpstreamResponse, RelayError> {
        let UpstreamRequest {
            url,
            method,
            headers,
            body,
        } = request;

        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|_| RelayError::Transport(format!("Invalid method: {}", method)))?;

        let mut builder = self.client.request(method, &url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match body {
            Some(Value::String(text)) => builder = builder.body(text),
            Some(value) => {
                let has_content_type = headers
                    .keys()
                    .any(|name| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
                if !has_content_type {
                    builder = builder.header(CONTENT_TYPE, "application/json");
                }
                builder = builder.body(value.to_string());
            }
            None => {}
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await.map_err(classify)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

impl UpstreamService for HttpUpstreamService {
    fn send(
        &self,
        request: UpstreamRequest,
    ) -> Pin<Box<dyn Future<Output = Result<UpstreamResponse, RelayError>> + Send + '_>> {
        Box::pin(self.execute(request))
    }
}

/// Flattens response headers, joining repeated names with `", "`.
pub fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    collected
}

/// Maps a reqwest failure onto the relay's error taxonomy.
///
/// Errors raised while building the request (bad URL, scheme, header) and
/// redirect loops are reported with their message; anything that happened
/// after the request went out means no usable response arrived.
fn classify(err: reqwest::Error) -> RelayError {
    if err.is_builder() || err.is_redirect() {
        RelayError::Transport(error_chain(&err))
    } else {
        RelayError::NoResponse {
            cause: error_chain(&err),
        }
    }
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
