//! Ingress middleware: CORS, security headers and rate limiting.

pub mod cors;
pub mod rate_limit;
pub mod security;

pub use cors::create_cors_layer;
pub use rate_limit::{client_address, rate_limit};
pub use security::security_headers;
