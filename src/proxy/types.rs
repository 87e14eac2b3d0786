use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::error::RelayError;

/// Incoming relay request from the frontend.
///
/// Every field is optional at the wire level so that missing fields reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            method: Some(method.into()),
            headers: None,
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Checks the required fields and produces the request to send upstream.
    ///
    /// The URL is checked before the method. Nothing else is validated here;
    /// malformed URLs, methods and headers are left to the HTTP client.
    pub fn validate(self) -> Result<UpstreamRequest, RelayError> {
        let url = self
            .url
            .filter(|u| !u.is_empty())
            .ok_or(RelayError::MissingField("URL"))?;
        let method = self
            .method
            .filter(|m| !m.is_empty())
            .ok_or(RelayError::MissingField("Method"))?;

        Ok(UpstreamRequest {
            url,
            method,
            headers: self.headers.unwrap_or_default(),
            body: self.body.filter(|b| !b.is_null()),
        })
    }
}

/// A validated request, ready for an [`UpstreamService`](super::UpstreamService).
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub url: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

/// Raw response as received from the upstream server.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

/// Normalized relay outcome.
///
/// Successful relays fill `status`, `headers`, `body`, `time` and `size`.
/// Failures carry `error`, and leave the rest null when no upstream
/// response exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyResult {
    pub status: Option<u16>,
    pub headers: Option<BTreeMap<String, String>>,
    pub body: Option<Value>,
    /// Elapsed milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ProxyResult {
    pub fn success(
        status: u16,
        headers: BTreeMap<String, String>,
        body: Value,
        time: u64,
        size: String,
    ) -> Self {
        Self {
            status: Some(status),
            headers: Some(headers),
            body: Some(body),
            time: Some(time),
            size: Some(size),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(Value::String(message.into())),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_url_is_rejected_first() {
        let spec = RequestSpec::default();
        let err = spec.validate().unwrap_err();
        assert_eq!(err.to_string(), "URL is required");
    }

    #[test]
    fn test_empty_method_is_rejected() {
        let spec = RequestSpec::new("", "http://localhost/");
        let err = spec.validate().unwrap_err();
        assert_eq!(err.to_string(), "Method is required");
    }

    #[test]
    fn test_null_fields_deserialize_as_absent() {
        let spec: RequestSpec = serde_json::from_value(json!({
            "url": "http://localhost/items",
            "method": "POST",
            "headers": null,
            "body": null
        }))
        .unwrap();

        let request = spec.validate().unwrap();
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_body_is_kept_as_untyped_value() {
        let spec: RequestSpec = serde_json::from_value(json!({
            "url": "http://localhost/items",
            "method": "PUT",
            "headers": {"X-Trace": "abc"},
            "body": [1, "two", {"three": 3}]
        }))
        .unwrap();

        let request = spec.validate().unwrap();
        assert_eq!(request.body, Some(json!([1, "two", {"three": 3}])));
        assert_eq!(request.headers.get("X-Trace").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_failure_serializes_nulls() {
        let value = serde_json::to_value(ProxyResult::failure("relay down")).unwrap();
        assert_eq!(
            value,
            json!({"status": null, "headers": null, "body": null, "error": "relay down"})
        );
    }

    #[test]
    fn test_error_only_payload_deserializes() {
        let result: ProxyResult =
            serde_json::from_value(json!({"error": {"message": "bad"}})).unwrap();
        assert!(result.is_error());
        assert!(result.status.is_none());
        assert_eq!(result.error, Some(json!({"message": "bad"})));
    }
}
