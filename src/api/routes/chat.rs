//! Chat Routes
//!
//! - GET /api/v1/chat - Transcript of the caller's session
//! - DELETE /api/v1/chat - Start over
//! - POST /api/v1/chat/messages - Send a message, wait for the whole reply
//!
//! Streaming replies go over the WebSocket at `/api/v1/chat/ws`.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::auth::RequireAuth;
use crate::api::dto::ChatRequest;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::models::ChatMessage;

/// GET /api/v1/chat
pub async fn get_transcript(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
) -> Json<Vec<ChatMessage>> {
    Json(state.chats.transcript(&session.user).await)
}

/// DELETE /api/v1/chat
pub async fn reset(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
) -> StatusCode {
    state.chats.reset(&session.user.id).await;
    StatusCode::NO_CONTENT
}

/// POST /api/v1/chat/messages
///
/// Service failures come back as an apology from the coach, not as an error.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatMessage>> {
    let chat = state.chats.session(&session.user).await;
    let reply = chat.lock().await.send(&state.ai, &req.message).await?;
    Ok(Json(reply))
}
