//! Web server for the contact relay.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{Config, WebConfig};
use crate::mail::{MailRelay, MailTransport};
use crate::rate_limit::{ClientRateLimiter, RateLimitConfig};
use crate::{RelayError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// Interval between sweeps of expired rate-limit counters.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Web configuration.
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server delivering through `transport`.
    pub fn new(config: &Config, transport: Arc<dyn MailTransport>) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse::<SocketAddr>()
            .map_err(|e| {
                RelayError::Config(format!(
                    "invalid server address {}:{}: {e}",
                    config.server.host, config.server.port
                ))
            })?;

        let relay = MailRelay::new(transport, config.mail.username.clone())
            .with_timeout(Duration::from_secs(config.mail.timeout_secs));
        let rate_limiter = ClientRateLimiter::new(RateLimitConfig::new(
            config.web.rate_limit_max,
            config.web.rate_limit_window_secs,
        ));
        let app_state =
            AppState::new(relay, rate_limiter).with_trust_proxy(config.web.trust_proxy);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            web_config: config.web.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start a background task that drops expired rate-limit counters.
    fn start_cleanup_task(app_state: Arc<AppState>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;
                app_state.rate_limiter.cleanup();
                tracing::debug!(
                    tracked_clients = app_state.rate_limiter.tracked_clients(),
                    "Rate limit counters swept"
                );
            }
        });
    }

    async fn bind(self) -> std::io::Result<(TcpListener, Router)> {
        let router = create_router(self.app_state.clone(), &self.web_config);

        let listener = TcpListener::bind(self.addr).await?;
        Self::start_cleanup_task(self.app_state);

        tracing::info!("Web server listening on http://{}", listener.local_addr()?);
        Ok((listener, router))
    }

    /// Run the web server until Ctrl+C.
    pub async fn run(self) -> std::io::Result<()> {
        let (listener, router) = self.bind().await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
