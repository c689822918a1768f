//! Security headers middleware.

use axum::{
    body::Body,
    http::{header::HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Content security policy for every response.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self' 'unsafe-inline'; \
     style-src 'self' 'unsafe-inline'; \
     object-src 'self'; \
     img-src 'self' data:; \
     upgrade-insecure-requests";

/// Security headers middleware.
///
/// Adds the following headers to all responses:
/// - X-Frame-Options: DENY
/// - X-DNS-Prefetch-Control: off
/// - Content-Security-Policy: see [`CONTENT_SECURITY_POLICY`]
/// - X-Content-Type-Options: nosniff
/// - Referrer-Policy: no-referrer
/// - X-XSS-Protection: 0
///
/// Note: Strict-Transport-Security should be set at the reverse proxy level
/// as it requires HTTPS.
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    // Prevent clickjacking
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    headers.insert("X-DNS-Prefetch-Control", HeaderValue::from_static("off"));

    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );

    // Prevent MIME type sniffing
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));

    // Deprecated filter; CSP replaces it
    headers.insert("X-XSS-Protection", HeaderValue::from_static("0"));

    if !headers.contains_key("Cache-Control") {
        headers.insert(
            "Cache-Control",
            HeaderValue::from_static("no-store, max-age=0"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Router,
    };
    use tower::util::ServiceExt;

    async fn dummy_handler() -> &'static str {
        "OK"
    }

    async fn failing_handler() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn app() -> Router {
        use axum::middleware;

        Router::new()
            .route("/", get(dummy_handler))
            .route("/fail", post(failing_handler))
            .layer(middleware::from_fn(security_headers))
    }

    #[tokio::test]
    async fn test_security_headers_added() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
        assert_eq!(headers.get("X-DNS-Prefetch-Control").unwrap(), "off");
        assert_eq!(
            headers.get("Content-Security-Policy").unwrap(),
            CONTENT_SECURITY_POLICY
        );
        assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
        assert_eq!(headers.get("Referrer-Policy").unwrap(), "no-referrer");
        assert_eq!(headers.get("Cache-Control").unwrap(), "no-store, max-age=0");
    }

    #[tokio::test]
    async fn test_security_headers_on_errors() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/fail")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");
    }

    #[test]
    fn test_policy_directives() {
        for directive in [
            "default-src 'self'",
            "script-src 'self' 'unsafe-inline'",
            "style-src 'self' 'unsafe-inline'",
            "object-src 'self'",
            "img-src 'self' data:",
            "upgrade-insecure-requests",
        ] {
            assert!(CONTENT_SECURITY_POLICY.contains(directive), "{directive}");
        }
    }
}
