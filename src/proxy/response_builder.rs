//! Response building utilities for relay results.
//!
//! Turns the raw upstream response into a `ProxyResult`: body decoding,
//! size accounting and final assembly.

use super::types::{ProxyResult, UpstreamResponse};
use serde_json::Value;
use std::collections::BTreeMap;

/// Decodes an upstream body: JSON when it parses, text otherwise.
pub fn parse_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Whether a body counts as present for size accounting.
///
/// `null`, `false`, zero and the empty string count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn serialized_len<T: serde::Serialize + ?Sized>(value: &T) -> usize {
    serde_json::to_string(value).map(|s| s.len()).unwrap_or(0)
}

/// Byte count of the serialized body plus the serialized headers.
pub fn response_size(body: &Value, headers: Option<&BTreeMap<String, String>>) -> usize {
    let mut size = 0;
    if is_truthy(body) {
        size += serialized_len(body);
    }
    if let Some(headers) = headers {
        size += serialized_len(headers);
    }
    size
}

/// Formats a byte count as kilobytes with two decimals, e.g. `"1.00 KB"`.
pub fn format_size(bytes: usize) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Assembles the result of a completed relay.
pub fn build_result(response: UpstreamResponse, elapsed_ms: u64) -> ProxyResult {
    let UpstreamResponse {
        status,
        headers,
        body,
    } = response;

    let body = parse_body(&body);
    let size = format_size(response_size(&body, Some(&headers)));

    ProxyResult::success(status, headers, body, elapsed_ms, size)
}
