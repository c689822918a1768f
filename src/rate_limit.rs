//! Per-client request rate limiting.
//!
//! Each client address gets a fixed window. The first admitted request opens
//! the window; once `max_requests` requests have been admitted, further
//! requests are denied until the window expires and the counter resets.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Configuration for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests admitted in one window.
    pub max_requests: u32,
    /// Length of the window.
    pub window: Duration,
}

impl RateLimitConfig {
    /// Create a new rate limit configuration.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

impl Default for RateLimitConfig {
    /// 20 requests per 15 minutes.
    fn default() -> Self {
        Self::new(20, 15 * 60)
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is admitted.
    Allowed {
        /// Requests left in the current window.
        remaining: u32,
    },
    /// Request is denied.
    Denied {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

impl RateLimitResult {
    /// Check if the request is admitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Counter for one client.
#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    count: u32,
    resets_at: Instant,
}

/// Fixed-window rate limiter keyed by client address.
///
/// # Example
///
/// ```
/// use contact_relay::rate_limit::{ClientRateLimiter, RateLimitConfig};
///
/// let limiter = ClientRateLimiter::new(RateLimitConfig::new(2, 60));
///
/// assert!(limiter.check_and_record("10.0.0.1").is_allowed());
/// assert!(limiter.check_and_record("10.0.0.1").is_allowed());
/// assert!(!limiter.check_and_record("10.0.0.1").is_allowed());
/// assert!(limiter.check_and_record("10.0.0.2").is_allowed());
/// ```
#[derive(Debug)]
pub struct ClientRateLimiter {
    config: RateLimitConfig,
    clients: Mutex<HashMap<String, WindowCounter>>,
}

impl ClientRateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// The configuration this limiter enforces.
    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    fn clients(&self) -> MutexGuard<'_, HashMap<String, WindowCounter>> {
        // Counters stay consistent even if a holder panicked mid-update.
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check and record a request from `client`.
    ///
    /// Returns `Allowed` and counts the request, or `Denied` without counting it.
    pub fn check_and_record(&self, client: &str) -> RateLimitResult {
        self.check_and_record_at(client, Instant::now())
    }

    fn check_and_record_at(&self, client: &str, now: Instant) -> RateLimitResult {
        let mut clients = self.clients();
        let counter = clients
            .entry(client.to_string())
            .or_insert_with(|| WindowCounter {
                count: 0,
                resets_at: now + self.config.window,
            });

        if now >= counter.resets_at {
            counter.count = 0;
            counter.resets_at = now + self.config.window;
        }

        if counter.count >= self.config.max_requests {
            return RateLimitResult::Denied {
                retry_after: counter.resets_at.saturating_duration_since(now),
            };
        }

        counter.count += 1;
        RateLimitResult::Allowed {
            remaining: self.config.max_requests - counter.count,
        }
    }

    /// Drop counters whose window has elapsed.
    pub fn cleanup(&self) {
        self.cleanup_at(Instant::now());
    }

    fn cleanup_at(&self, now: Instant) {
        self.clients().retain(|_, counter| counter.resets_at > now);
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients().len()
    }
}

impl Default for ClientRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
