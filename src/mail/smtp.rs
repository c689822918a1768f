//! SMTP transport built on lettre.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::response::Response;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::transport::{DeliveryReceipt, MailTransport, OutgoingMail, TransportError};
use crate::config::{MailConfig, SmtpSecurity};
use crate::{RelayError, Result};

/// Delivers mail through an authenticated SMTP relay.
///
/// The connection pool is shared by all requests; build it once at startup.
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailTransport {
    /// Create a transport from the mail configuration.
    ///
    /// With [`SmtpSecurity::None`] no credentials are sent, since the
    /// connection is unencrypted.
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let mut builder = match config.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| RelayError::Transport(e.to_string()))?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| RelayError::Transport(e.to_string()))?
            }
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
            }
        };

        if config.security != SmtpSecurity::None {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }
        if let Some(port) = config.port {
            builder = builder.port(port);
        }

        Ok(Self {
            transport: builder.build(),
            host: config.host.clone(),
        })
    }

    /// The relay host this transport connects to.
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Build a plain-text lettre message.
fn build_message(mail: &OutgoingMail) -> std::result::Result<Message, TransportError> {
    let from: Mailbox = mail
        .from
        .parse()
        .map_err(|e| TransportError::InvalidMessage(format!("sender {:?}: {e}", mail.from)))?;
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|e| TransportError::InvalidMessage(format!("recipient {:?}: {e}", mail.to)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| TransportError::InvalidMessage(e.to_string()))
}

/// Render an SMTP reply as "<code> <text>".
fn receipt(response: &Response) -> DeliveryReceipt {
    let text: Vec<&str> = response.message().collect();
    DeliveryReceipt(format!("{} {}", response.code(), text.join(" ")))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: OutgoingMail) -> std::result::Result<DeliveryReceipt, TransportError> {
        let message = build_message(&mail)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| TransportError::Delivery(e.to_string()))?;

        Ok(receipt(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            from: "inbox@example.com".to_string(),
            to: "inbox@example.com".to_string(),
            subject: "New Contact Form Submission".to_string(),
            body: "First Name: Ada".to_string(),
        }
    }

    #[test]
    fn test_build_message() {
        let message = build_message(&mail()).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("From: inbox@example.com"));
        assert!(formatted.contains("To: inbox@example.com"));
        assert!(formatted.contains("Subject: New Contact Form Submission"));
        assert!(formatted.contains("Content-Type: text/plain"));
        assert!(formatted.contains("First Name: Ada"));
    }

    #[test]
    fn test_build_message_invalid_sender() {
        let mut mail = mail();
        mail.from = "not an address".to_string();

        let err = build_message(&mail).unwrap_err();
        assert!(matches!(err, TransportError::InvalidMessage(_)));
    }

    #[test]
    fn test_receipt_joins_reply_lines() {
        use lettre::transport::smtp::response::{Category, Code, Detail, Severity};

        let code = Code::new(Severity::PositiveCompletion, Category::MailSystem, Detail::Zero);
        let response = Response::new(code, vec!["2.0.0 OK:".to_string(), "queued".to_string()]);

        assert_eq!(receipt(&response).0, "250 2.0.0 OK: queued");
    }

    #[tokio::test]
    async fn test_from_config_tls() {
        let config = MailConfig {
            username: "inbox@example.com".to_string(),
            password: "secret".to_string(),
            ..MailConfig::default()
        };

        let transport = SmtpMailTransport::from_config(&config).unwrap();
        assert_eq!(transport.host(), "smtp.gmail.com");
    }

    #[tokio::test]
    async fn test_send_to_unreachable_server_fails() {
        let config = MailConfig {
            host: "127.0.0.1".to_string(),
            port: Some(1),
            security: SmtpSecurity::None,
            ..MailConfig::default()
        };

        let transport = SmtpMailTransport::from_config(&config).unwrap();
        let err = transport.send(mail()).await.unwrap_err();
        assert!(matches!(err, TransportError::Delivery(_)));
    }
}
