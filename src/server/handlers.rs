//! HTTP handlers for chat and health

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::types::{ChatReply, ChatRequest, HealthResponse};
use super::AppState;
use crate::error::RelayError;

/// POST /api/chat
///
/// Rejects anything but a JSON object with a non-blank string `message`
/// before any upstream call is made.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ChatReply>> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Rejected chat body");
            return Err(ApiError::from_relay(RelayError::InvalidMessage, state.production));
        }
    };
    let request = ChatRequest::from_value(&body)
        .map_err(|e| ApiError::from_relay(e, state.production))?;

    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("chat", request_id = %request_id);

    let reply = state
        .relay
        .generate_reply(&request.message)
        .instrument(span)
        .await
        .map_err(|e| ApiError::from_relay(e, state.production))?;

    Ok(Json(ChatReply { reply }))
}

/// GET /health - reports whether the model list is reachable
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.relay.discovered_models().await {
        Ok(models) => (StatusCode::OK, Json(HealthResponse::healthy(models.to_vec()))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse::failed(e.to_string())),
        ),
    }
}
