//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;

use super::handlers::{send_contact, AppState};
use super::middleware::{create_cors_layer, rate_limit, security_headers};

/// Create the main API router.
///
/// Layer order, outermost first: tracing, security headers, CORS, rate
/// limiting. CORS preflights are answered before they count against a
/// client, and every response carries the security headers.
pub fn create_router(app_state: Arc<AppState>, web_config: &WebConfig) -> Router {
    Router::new()
        .route("/send", post(send_contact))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(web_config.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers))
                .layer(create_cors_layer(&web_config.cors_origins))
                .layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    rate_limit,
                )),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
