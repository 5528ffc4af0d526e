//! Overview & Profile Routes
//!
//! - GET /api/v1/dashboard/overview - Quote plus next workout and meal
//! - GET /api/v1/dashboard/profile - Profile form with defaults filled in
//! - PUT /api/v1/dashboard/profile - Save the profile form

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::auth::{OptionalAuth, RequireAuth};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::dashboard::{build_overview, profile, Overview, ProfileForm};
use crate::models::User;

/// GET /api/v1/dashboard/overview
///
/// Anonymous callers get the quote and teaser suggestions.
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
    OptionalAuth(session): OptionalAuth,
) -> Json<Overview> {
    let overview = match session {
        Some(session) => {
            let user_id = &session.user.id;
            let workouts = state.workouts(user_id);
            let nutrition = state.nutrition(user_id);
            build_overview(&state.ai, Some(&session.user), workouts.current(), nutrition.current()).await
        }
        None => build_overview(&state.ai, None, None, None).await,
    };
    Json(overview)
}

/// GET /api/v1/dashboard/profile
pub async fn get_profile(RequireAuth(session): RequireAuth) -> Json<ProfileForm> {
    Json(ProfileForm::from_user(&session.user))
}

/// PUT /api/v1/dashboard/profile
pub async fn save_profile(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Json(form): Json<ProfileForm>,
) -> ApiResult<Json<User>> {
    let user = profile::save(&state.auth, &session.token, form).await?;
    Ok(Json(user))
}
