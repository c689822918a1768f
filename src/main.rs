use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use contact_relay::{Config, SmtpMailTransport, WebServer};

/// Default configuration file, used when no path is given.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // Variables from .env take part in overrides; a missing file is fine
    dotenvy::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration; only a missing file falls back to defaults
    let mut config = match Config::load_optional(&config_path) {
        Ok(Some(config)) => config,
        Ok(None) => {
            eprintln!("{config_path} not found. Using default configuration.");
            Config::default()
        }
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = contact_relay::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        contact_relay::logging::init_console_only(&config.logging.level);
    }

    info!("Contact Relay starting");

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let transport = match SmtpMailTransport::from_config(&config.mail) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Failed to create mail transport: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        host = %transport.host(),
        mailbox = %config.mail.username,
        "Relaying submissions"
    );

    let server = match WebServer::new(&config, Arc::new(transport)) {
        Ok(server) => server,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Contact Relay stopped");
    ExitCode::SUCCESS
}
