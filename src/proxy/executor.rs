//! Relay execution.
//!
//! Validates the request description, performs the upstream call through an
//! [`UpstreamService`], and turns the outcome into a single `ProxyResult`
//! carrying status, headers, body, timing and size.

use super::response_builder::{build_result, parse_body};
use super::service::UpstreamService;
use super::types::{ProxyResult, RequestSpec};
use crate::error::RelayError;
use std::time::Instant;

/// Range of upstream status codes relayed as results rather than errors.
const RELAYABLE_STATUS: std::ops::Range<u16> = 200..600;

/// Execute a relay request.
///
/// Validation failures return before the upstream service is touched.
pub async fn execute_request(
    service: &dyn UpstreamService,
    spec: RequestSpec,
) -> Result<ProxyResult, RelayError> {
    let request = spec.validate()?;

    let url = request.url.clone();
    let method = request.method.clone();
    let request_headers = request.headers.clone();
    let request_body = request.body.clone();

    let start = Instant::now();
    let response = match service.send(request).await {
        Ok(response) => response,
        Err(err) => {
            if let RelayError::NoResponse { cause } = &err {
                tracing::warn!(url = %url, method = %method, cause = %cause, "no response received");
            } else {
                tracing::warn!(url = %url, method = %method, error = %err, "relay failed");
            }
            return Err(err);
        }
    };

    if !RELAYABLE_STATUS.contains(&response.status) {
        tracing::warn!(url = %url, method = %method, status = response.status, "unrelayable upstream status");
        return Err(RelayError::UpstreamStatus {
            status: response.status,
            body: parse_body(&response.body),
        });
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let result = build_result(response, elapsed_ms);

    tracing::info!(
        url = %url,
        method = %method,
        headers = ?request_headers,
        body = ?request_body,
        elapsed_ms,
        status = result.status.unwrap_or_default(),
        size = result.size.as_deref().unwrap_or_default(),
        "request relayed"
    );

    Ok(result)
}
