//! Navigation Routes
//!
//! - GET /api/v1/navigation/resolve?path= - Page, redirect or not-found for a path

use axum::{extract::Query, Json};

use crate::api::auth::OptionalAuth;
use crate::api::dto::ResolveQuery;
use crate::navigation::{resolve, Resolution};

/// GET /api/v1/navigation/resolve
///
/// Dashboard paths redirect to the login page unless a valid token is sent.
pub async fn resolve_path(
    OptionalAuth(session): OptionalAuth,
    Query(query): Query<ResolveQuery>,
) -> Json<Resolution> {
    Json(resolve(&query.path, session.is_some()))
}
