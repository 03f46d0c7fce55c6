//! Axum router configuration for all endpoints

use axum::{
  middleware,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{credentials, keywords, logs, status};
use crate::server::middleware::request_context_middleware;
use crate::server::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .route("/api", get(status::api_info))
    // Reddit client credentials and its audit trail
    .route("/reddit_credentials", post(credentials::update_credentials))
    .route("/praw_logs", get(logs::get_praw_logs))
    // Keyword resolution and registration
    .route("/keyword_data", get(keywords::get_keyword_data).post(keywords::register_keyword))
    .layer(middleware::from_fn(request_context_middleware))
    .with_state(state)
}
