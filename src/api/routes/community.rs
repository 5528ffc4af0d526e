//! Community Routes
//!
//! - GET /api/v1/community/posts - Feed, newest first
//! - POST /api/v1/community/posts - Publish a post
//! - POST /api/v1/community/posts/generate - Let the AI publish a post
//! - POST /api/v1/community/posts/:id/like
//! - POST /api/v1/community/posts/:id/comments
//! - GET /api/v1/community/challenges - Weekly challenges
//! - POST /api/v1/community/challenges/generate - Let the AI propose a challenge
//!
//! Reading is open to everyone; anything that writes needs a session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::auth::RequireAuth;
use crate::api::dto::PostRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::models::{CommunityChallenge, CommunityPost};

/// GET /api/v1/community/posts
pub async fn list_posts(State(state): State<Arc<AppState>>) -> Json<Vec<CommunityPost>> {
    Json(state.community.posts().await)
}

/// POST /api/v1/community/posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Json(req): Json<PostRequest>,
) -> ApiResult<(StatusCode, Json<CommunityPost>)> {
    let post = state.community.create_post(&session.user, &req.content).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /api/v1/community/posts/generate
pub async fn generate_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(_session): RequireAuth,
) -> ApiResult<(StatusCode, Json<CommunityPost>)> {
    let post = state.community.generate_ai_post(&state.ai).await.ok_or_else(|| {
        ApiError::Generation("Could not generate the post. Please try again.".to_string())
    })?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /api/v1/community/posts/:id/like
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(_session): RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<CommunityPost>> {
    Ok(Json(state.community.like(&id).await?))
}

/// POST /api/v1/community/posts/:id/comments
pub async fn comment_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(_session): RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<CommunityPost>> {
    Ok(Json(state.community.comment(&id).await?))
}

/// GET /api/v1/community/challenges
pub async fn list_challenges(State(state): State<Arc<AppState>>) -> Json<Vec<CommunityChallenge>> {
    Json(state.community.challenges().await)
}

/// POST /api/v1/community/challenges/generate
pub async fn generate_challenge(
    State(state): State<Arc<AppState>>,
    RequireAuth(_session): RequireAuth,
) -> ApiResult<(StatusCode, Json<CommunityChallenge>)> {
    let challenge = state
        .community
        .generate_ai_challenge(&state.ai)
        .await
        .ok_or_else(|| {
            ApiError::Generation("Could not generate the challenge. Please try again.".to_string())
        })?;
    Ok((StatusCode::CREATED, Json(challenge)))
}
