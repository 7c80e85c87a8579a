//! Axum route handlers for the chat assistant.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;

use crate::assistant::orchestrator::ChatReply;
use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Reads the caller-supplied session id. Authentication happens upstream.
fn session_id(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}

/// POST /api/ai/chat
///
/// Runs one assistant turn for the session. Completion failures never turn
/// into error responses; the reply text carries them.
pub async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let session_id = session_id(&headers)?;
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }

    let reply = state.sessions.chat(&session_id, &request.message).await;
    Ok(Json(reply))
}

/// DELETE /api/ai/chat/history
///
/// Forgets the session's conversation. Unknown sessions are a no-op.
pub async fn handle_clear_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let session_id = session_id(&headers)?;
    state.sessions.clear_history(&session_id).await;
    Ok(StatusCode::NO_CONTENT)
}
