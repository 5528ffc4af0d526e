//! FitLife REST API
//!
//! HTTP API layer for FitLife, built with Axum. Signed-in routes take
//! `Authorization: Bearer <token>` with the token returned by register/login.
//!
//! # Endpoints
//!
//! ## Public
//! - `GET /api/v1/catalog` - App name, pricing, FAQ, testimonials, menus
//! - `GET /api/v1/catalog/plans` - Pricing plans
//! - `GET /api/v1/catalog/exercises` - Exercise library
//! - `GET /api/v1/catalog/options` - Form choices and profile defaults
//! - `GET /api/v1/navigation/resolve?path=` - Resolve a page path
//!
//! ## Auth
//! - `POST /api/v1/auth/register`, `POST /api/v1/auth/login`
//! - `POST /api/v1/auth/logout`, `GET /api/v1/auth/me`
//! - `PUT /api/v1/auth/plan`, `POST /api/v1/auth/password`
//!
//! ## Dashboard
//! - `GET /api/v1/dashboard/overview` (open to anonymous callers)
//! - `/api/v1/dashboard/workouts`, `/api/v1/dashboard/nutrition` - plan panels
//! - `/api/v1/dashboard/nutrition/food-log` - daily food log
//! - `/api/v1/dashboard/progress` - metrics, body scans, CSV export
//! - `GET|PUT /api/v1/dashboard/profile`
//!
//! ## Chat
//! - `GET /api/v1/chat`, `DELETE /api/v1/chat`, `POST /api/v1/chat/messages`
//! - `GET /api/v1/chat/ws` - Streaming replies over WebSocket
//!
//! ## Community
//! - `/api/v1/community/posts`, `/api/v1/community/challenges`
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use fitlife::ai::AiService;
//! use fitlife::api::{serve, AppState};
//! use fitlife::config::Config;
//! use fitlife::store::{LocalStore, MemoryBackend};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let store = LocalStore::new(Arc::new(MemoryBackend::new()));
//!     let ai = AiService::from_config(&config.ai);
//!
//!     serve(AppState::new(store, ai, config)).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::websocket::chat_ws_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/overview", get(routes::dashboard::get_overview))
        .route(
            "/profile",
            get(routes::dashboard::get_profile).put(routes::dashboard::save_profile),
        )
        // Workouts
        .route("/workouts", get(routes::workouts::get_workouts))
        .route("/workouts/generate", post(routes::workouts::generate))
        .route("/workouts/current", delete(routes::workouts::clear_current))
        .route(
            "/workouts/history/:id/select",
            post(routes::workouts::select_from_history),
        )
        .route("/workouts/history/:id", delete(routes::workouts::delete_from_history))
        // Nutrition
        .route("/nutrition", get(routes::nutrition::get_nutrition))
        .route("/nutrition/generate", post(routes::nutrition::generate))
        .route("/nutrition/current", delete(routes::nutrition::clear_current))
        .route(
            "/nutrition/history/:id/select",
            post(routes::nutrition::select_from_history),
        )
        .route("/nutrition/history/:id", delete(routes::nutrition::delete_from_history))
        .route(
            "/nutrition/food-log",
            get(routes::nutrition::get_food_log).post(routes::nutrition::log_food),
        )
        .route("/nutrition/food-log/:id", delete(routes::nutrition::remove_food))
        // Progress
        .route("/progress", get(routes::progress::get_progress))
        .route("/progress/metrics/:name/points", post(routes::progress::log_metric))
        .route("/progress/body-scans", post(routes::progress::add_body_scan))
        .route("/progress/body-scans/:date", delete(routes::progress::delete_body_scan))
        .route("/progress/export", get(routes::progress::export_csv));

    let api_routes = Router::new()
        // Catalog and navigation
        .route("/catalog", get(routes::catalog::get_catalog))
        .route("/catalog/plans", get(routes::catalog::list_pricing_plans))
        .route("/catalog/exercises", get(routes::catalog::list_exercises))
        .route("/catalog/options", get(routes::catalog::get_options))
        .route("/navigation/resolve", get(routes::navigation::resolve_path))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/plan", put(routes::auth::change_plan))
        .route("/auth/password", post(routes::auth::change_password))
        .nest("/dashboard", dashboard_routes)
        // Chat
        .route(
            "/chat",
            get(routes::chat::get_transcript).delete(routes::chat::reset),
        )
        .route("/chat/messages", post(routes::chat::send_message))
        .route("/chat/ws", get(chat_ws_handler))
        // Community
        .route(
            "/community/posts",
            get(routes::community::list_posts).post(routes::community::create_post),
        )
        .route("/community/posts/generate", post(routes::community::generate_post))
        .route("/community/posts/:id/like", post(routes::community::like_post))
        .route("/community/posts/:id/comments", post(routes::community::comment_post))
        .route("/community/challenges", get(routes::community::list_challenges))
        .route(
            "/community/challenges/generate",
            post(routes::community::generate_challenge),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.api.cors_origins);
    let timeout = Duration::from_secs(state.config.api.request_timeout_secs);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive unless origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("FitLife API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("FitLife API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiService;
    use crate::config::{AuthConfig, Config};
    use crate::store::{LocalStore, MemoryBackend};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let config = Config {
            auth: AuthConfig::instant(),
            ..Default::default()
        };
        let store = LocalStore::new(Arc::new(MemoryBackend::new()));
        build_router(AppState::new(store, AiService::offline(), config))
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({"email": "ana@example.com", "name": "Ana Souza"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = create_test_app();
        for uri in ["/health/live", "/health/ready", "/health"] {
            let response = app.clone().oneshot(request("GET", uri, None, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }

        let response = app.oneshot(request("GET", "/health", None, None)).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["ai"], "offline");
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn test_catalog_is_public() {
        let app = create_test_app();
        let response = app.oneshot(request("GET", "/api/v1/catalog", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["pricingPlans"].as_array().unwrap().len(), 3);
        assert_eq!(body["appName"], "FitLife");
    }

    #[tokio::test]
    async fn test_dashboard_requires_token() {
        let app = create_test_app();
        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/dashboard/workouts", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");

        let response = app
            .oneshot(request("GET", "/api/v1/dashboard/workouts", Some("bogus"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let app = create_test_app();
        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({"email": "not-an-email", "name": "Ana"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_with_profile_fields() {
        let app = create_test_app();
        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": "bia@example.com",
                    "name": "Bia",
                    "fitnessLevel": "Intermediate",
                    "availableEquipment": ["Dumbbells"],
                    "timePerSession": 45
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let user = &json_body(response).await["user"];
        assert_eq!(user["fitnessLevel"], "Intermediate");
        assert_eq!(user["availableEquipment"], json!(["Dumbbells"]));
        assert_eq!(user["timePerSession"], 45);
        assert_eq!(user["goals"], json!(["Improve conditioning"]));
    }

    #[tokio::test]
    async fn test_navigation_gate() {
        let app = create_test_app();
        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/navigation/resolve?path=/dashboard/progress", None, None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body, json!({"kind": "redirect", "target": "/login"}));

        let token = register(&app).await;
        let response = app
            .oneshot(request("GET", "/api/v1/navigation/resolve?path=/login", Some(&token), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body, json!({"kind": "redirect", "target": "/dashboard/overview"}));
    }

    #[tokio::test]
    async fn test_workout_flow() {
        let app = create_test_app();
        let token = register(&app).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/dashboard/workouts", Some(&token), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["view"], "generate");
        assert_eq!(body["form"]["daysPerWeek"], 3);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/dashboard/workouts/generate",
                Some(&token),
                Some(json!({"daysPerWeek": 4})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let plan = json_body(response).await;
        let id = plan["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("workout-"));

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/dashboard/workouts", Some(&token), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["view"], "current");
        assert_eq!(body["saved"].as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/v1/dashboard/workouts/history/{}", id),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["view"], "generate");
        assert!(body["current"].is_null());

        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/dashboard/workouts/history/missing/select",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_workout_form() {
        let app = create_test_app();
        let token = register(&app).await;
        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/dashboard/workouts/generate",
                Some(&token),
                Some(json!({"daysPerWeek": 9})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_food_log() {
        let app = create_test_app();
        let token = register(&app).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/dashboard/nutrition/food-log",
                Some(&token),
                Some(json!({"name": "Oats", "calories": -5})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(request(
                    "POST",
                    "/api/v1/dashboard/nutrition/food-log",
                    Some(&token),
                    Some(json!({"name": "Feast", "calories": 4_000_000_000u64})),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/dashboard/nutrition/food-log",
                Some(&token),
                Some(json!({"name": "Oats", "calories": 350})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request("GET", "/api/v1/dashboard/nutrition?action=log_meal", Some(&token), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["view"], "log");
        assert_eq!(body["today"]["totalCalories"], 350);
    }

    #[tokio::test]
    async fn test_progress_export() {
        let app = create_test_app();
        let token = register(&app).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/dashboard/progress/metrics/Body%20Weight/points",
                Some(&token),
                Some(json!({"date": "2024-02-01", "value": 70.5})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request("GET", "/api/v1/dashboard/progress/export", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.contains("Body Weight,kg,2024-02-01,70.5"));
    }

    #[tokio::test]
    async fn test_chat_offline_reply() {
        let app = create_test_app();
        let token = register(&app).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/chat/messages",
                Some(&token),
                Some(json!({"message": "Hi"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["sender"], "ai");

        let response = app
            .oneshot(request("GET", "/api/v1/chat", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_community_post() {
        let app = create_test_app();
        let token = register(&app).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/community/posts",
                Some(&token),
                Some(json!({"content": "First run done!"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request("GET", "/api/v1/community/posts", None, None))
            .await
            .unwrap();
        let posts = json_body(response).await;
        assert_eq!(posts[0]["author"], "Ana Souza");
        assert_eq!(posts.as_array().unwrap().len(), 4);
    }
}
