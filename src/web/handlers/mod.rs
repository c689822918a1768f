//! API handlers.

pub mod contact;

pub use contact::*;

use crate::mail::MailRelay;
use crate::rate_limit::ClientRateLimiter;

/// Process-wide state shared by every request.
pub struct AppState {
    /// Relay that delivers validated submissions.
    pub relay: MailRelay,
    /// Per-client request counters.
    pub rate_limiter: ClientRateLimiter,
    /// Whether forwarding headers identify the client.
    pub trust_proxy: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(relay: MailRelay, rate_limiter: ClientRateLimiter) -> Self {
        Self {
            relay,
            rate_limiter,
            trust_proxy: false,
        }
    }

    /// Take the client address from forwarding headers.
    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }
}
