//! Auth Routes
//!
//! - POST /api/v1/auth/register - Create an account and sign in
//! - POST /api/v1/auth/login - Sign in (or update the profile of the same email)
//! - POST /api/v1/auth/logout - End the session
//! - GET /api/v1/auth/me - Current user
//! - PUT /api/v1/auth/plan - Change subscription tier
//! - POST /api/v1/auth/password - Simulated password change

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::auth::{OptionalAuth, RequireAuth};
use crate::api::dto::{AuthResponse, PlanChangeRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::models::User;
use crate::session::{LoginRequest, PasswordChange, RegisterRequest};

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (token, user) = state.auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/v1/auth/login
///
/// With a bearer token for the same email this updates that session's profile.
pub async fn login(
    State(state): State<Arc<AppState>>,
    OptionalAuth(session): OptionalAuth,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let token = session.as_ref().map(|s| s.token.as_str());
    let (token, user) = state.auth.login(token, req).await?;
    Ok(Json(AuthResponse { token, user }))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
) -> StatusCode {
    state.auth.logout(&session.token).await;
    state.chats.reset(&session.user.id).await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/me
pub async fn me(RequireAuth(session): RequireAuth) -> Json<User> {
    Json(session.user)
}

/// PUT /api/v1/auth/plan
pub async fn change_plan(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Json(req): Json<PlanChangeRequest>,
) -> ApiResult<Json<User>> {
    let user = state.auth.update_plan(&session.token, req.plan).await?;
    Ok(Json(user))
}

/// POST /api/v1/auth/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Json(change): Json<PasswordChange>,
) -> ApiResult<StatusCode> {
    state.auth.change_password(&session.token, &change).await?;
    Ok(StatusCode::NO_CONTENT)
}
