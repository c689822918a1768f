//! Configuration module for the contact relay.

use axum::http::HeaderValue;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use validator::ValidateEmail;

use crate::{RelayError, Result};

/// Environment variable holding the mailbox address.
pub const ENV_EMAIL_USER: &str = "EMAIL_USER";

/// Environment variable holding the mailbox credential.
pub const ENV_EMAIL_PASS: &str = "EMAIL_PASS";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Ingress policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    #[serde(default)]
    pub trust_proxy: bool,
    /// Maximum admitted requests per client within one window.
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,
    /// Rate limit window length in seconds.
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_rate_limit_max() -> u32 {
    20
}

fn default_rate_limit_window() -> u64 {
    900 // 15 minutes
}

fn default_max_body_bytes() -> usize {
    100 * 1024
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            trust_proxy: false,
            rate_limit_max: default_rate_limit_max(),
            rate_limit_window_secs: default_rate_limit_window(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS (usually port 465).
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS (usually port 587).
    StartTls,
    /// No encryption. Only for local test servers.
    None,
}

/// Outbound mail configuration.
#[derive(Clone, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host.
    #[serde(default = "default_mail_host")]
    pub host: String,
    /// SMTP port. Uses the default for the security mode when unset.
    #[serde(default)]
    pub port: Option<u16>,
    /// Connection security.
    #[serde(default)]
    pub security: SmtpSecurity,
    /// Mailbox address: sender, recipient and SMTP login.
    #[serde(default)]
    pub username: String,
    /// Mailbox credential.
    #[serde(default)]
    pub password: String,
    /// Upper bound on a single send in seconds (0 = unbounded).
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

fn default_mail_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_mail_timeout() -> u64 {
    30
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: default_mail_host(),
            port: None,
            security: SmtpSecurity::default(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_mail_timeout(),
        }
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file written alongside stdout.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ingress policy configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Outbound mail configuration.
    #[serde(default)]
    pub mail: MailConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file that may be absent.
    ///
    /// Returns `Ok(None)` only when the file does not exist. An unreadable
    /// or malformed file is an error, never a silent fallback to defaults.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(RelayError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RelayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `EMAIL_USER`: mailbox address
    /// - `EMAIL_PASS`: mailbox credential
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user) = lookup(ENV_EMAIL_USER).filter(|v| !v.is_empty()) {
            self.mail.username = user;
        }
        if let Some(pass) = lookup(ENV_EMAIL_PASS).filter(|v| !v.is_empty()) {
            self.mail.password = pass;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the mailbox address is not set, or the credential is not set for a
    ///   secured connection
    /// - the mailbox address is not an email address
    /// - the rate limit allows nothing or has an empty window
    /// - a CORS origin is not a valid header value
    pub fn validate(&self) -> Result<()> {
        if self.mail.username.is_empty() {
            return Err(RelayError::Config(format!(
                "mail.username is not set. Set it in config.toml or via {ENV_EMAIL_USER}."
            )));
        }
        // Plain connections are sent without credentials
        if self.mail.security != SmtpSecurity::None && self.mail.password.is_empty() {
            return Err(RelayError::Config(format!(
                "mail.password is not set. Set it in config.toml or via {ENV_EMAIL_PASS}."
            )));
        }
        if !self.mail.username.validate_email() {
            return Err(RelayError::Config(format!(
                "mail.username must be an email address, got {:?}",
                self.mail.username
            )));
        }
        if self.web.rate_limit_max == 0 || self.web.rate_limit_window_secs == 0 {
            return Err(RelayError::Config(
                "web.rate_limit_max and web.rate_limit_window_secs must be positive".to_string(),
            ));
        }
        if let Some(origin) = self
            .web
            .cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(RelayError::Config(format!(
                "web.cors_origins contains an invalid origin: {origin:?}"
            )));
        }
        Ok(())
    }
}
