use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::proxy::is_truthy;

#[derive(Error, Debug)]
pub enum RelayError {
    /// A required envelope field was absent or empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid request envelope: {0}")]
    InvalidEnvelope(String),

    /// The upstream answered with a status outside the relayable range.
    #[error("Request failed with status code {status}")]
    UpstreamStatus { status: u16, body: Value },

    #[error("no response received")]
    NoResponse { cause: String },

    #[error("{0}")]
    Transport(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingField(_) | RelayError::InvalidEnvelope(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            RelayError::NoResponse { .. } | RelayError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The value placed under `error` in the response body.
    pub fn payload(&self) -> Value {
        match self {
            RelayError::UpstreamStatus { body, .. } if is_truthy(body) => body.clone(),
            _ => Value::String(self.to_string()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.payload() }));
        (status, body).into_response()
    }
}
