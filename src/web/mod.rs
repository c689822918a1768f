//! Web API module.
//!
//! A single `POST /send` endpoint behind CORS, security header and rate
//! limiting middleware.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
