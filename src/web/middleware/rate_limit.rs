//! Rate limiting middleware.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{net::SocketAddr, sync::Arc};

use crate::rate_limit::RateLimitResult;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Bucket for requests whose address is unknown.
const UNKNOWN_CLIENT: &str = "unknown";

/// Extract the client address from a request.
///
/// Forwarding headers are only honoured when `trust_proxy` is set; otherwise
/// any client could pick its own bucket.
pub fn client_address(req: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        // Take the first IP in the chain
        if let Some(ip) = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_string();
        }

        if let Some(real_ip) = req
            .headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
        {
            return real_ip.trim().to_string();
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    UNKNOWN_CLIENT.to_string()
}

/// Rate limiting middleware.
///
/// Counts every admitted request against its client. Once the client's
/// window is used up, answers 429 without running the rest of the stack.
pub async fn rate_limit(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let client = client_address(&req, state.trust_proxy);

    match state.rate_limiter.check_and_record(&client) {
        RateLimitResult::Allowed { remaining } => {
            tracing::debug!(client = %client, remaining, "Request admitted");
            next.run(req).await
        }
        RateLimitResult::Denied { retry_after } => {
            tracing::warn!(client = %client, ?retry_after, "Rate limit exceeded");
            ApiError::rate_limited(state.rate_limiter.config().window, retry_after).into_response()
        }
    }
}
