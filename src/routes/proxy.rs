use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::AppState;
use crate::config::ResponseMode;
use crate::error::RelayError;
use crate::proxy::{execute_request, RequestSpec};

pub async fn proxy_request(
    State(state): State<AppState>,
    payload: Result<Json<RequestSpec>, JsonRejection>,
) -> Result<Response, RelayError> {
    let Json(spec) =
        payload.map_err(|rejection| RelayError::InvalidEnvelope(rejection.body_text()))?;

    tracing::debug!(
        method = ?spec.method,
        url = ?spec.url,
        "Proxying request"
    );

    let result = execute_request(state.upstream.as_ref(), spec).await?;

    let response = match state.response_mode {
        ResponseMode::Full => Json(result).into_response(),
        ResponseMode::BodyOnly => Json(result.body.unwrap_or(Value::Null)).into_response(),
    };
    Ok(response)
}
