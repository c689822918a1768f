//! Contact Relay - contact form backend
//!
//! Accepts contact form submissions over HTTP, validates them and relays
//! each one to a single mailbox over SMTP.

pub mod config;
pub mod contact;
pub mod error;
pub mod logging;
pub mod mail;
pub mod rate_limit;
pub mod web;

pub use config::Config;
pub use contact::{Agreement, Budget, ContactForm, Submission};
pub use error::{RelayError, Result};
pub use mail::{MailRelay, MailTransport, SmtpMailTransport};
pub use rate_limit::{ClientRateLimiter, RateLimitConfig, RateLimitResult};
pub use web::{create_router, WebServer};
