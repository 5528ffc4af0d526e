//! Bearer-token extractors
//!
//! The token comes from `Authorization: Bearer <token>`, or from a `token`
//! query parameter for WebSocket upgrades, where browsers cannot set headers.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::models::User;

/// A signed-in caller
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Extractor that rejects the request with 401 unless the token maps to a session
///
/// ```rust,ignore
/// async fn handler(RequireAuth(session): RequireAuth) -> String {
///     format!("Hello, {}!", session.user.name)
/// }
/// ```
pub struct RequireAuth(pub Session);

/// Extractor that never rejects; `None` for anonymous callers
pub struct OptionalAuth(pub Option<Session>);

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = request_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;
        let user = state
            .auth
            .current(&token)
            .await
            .ok_or_else(|| ApiError::Unauthorized("Unknown or expired session".to_string()))?;

        Ok(Self(Session { token, user }))
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalAuth {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let session = match request_token(parts) {
            Some(token) => state
                .auth
                .current(&token)
                .await
                .map(|user| Session { token, user }),
            None => None,
        };
        Ok(Self(session))
    }
}

fn request_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token);

    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.token)
            .filter(|t| !t.is_empty())
    })
}

/// Token from a `Bearer <token>` header value
pub fn extract_bearer_token(header: &str) -> Option<String> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc").as_deref(), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer   spaced   ").as_deref(), Some("spaced"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_token_from_query() {
        let (parts, _) = Request::builder()
            .uri("/api/v1/chat/ws?foo=1&token=t-123")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(request_token(&parts).as_deref(), Some("t-123"));
    }

    #[test]
    fn test_query_token_is_percent_decoded() {
        let (parts, _) = Request::builder()
            .uri("/api/v1/chat/ws?token=a%2Bb%3Dc")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(request_token(&parts).as_deref(), Some("a+b=c"));

        let (parts, _) = Request::builder()
            .uri("/api/v1/chat/ws?token=")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(request_token(&parts), None);
    }

    #[test]
    fn test_header_wins_over_query() {
        let (parts, _) = Request::builder()
            .uri("/x?token=query")
            .header(AUTHORIZATION, "Bearer header")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(request_token(&parts).as_deref(), Some("header"));
    }
}
