//! Mail transport abstraction.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A plain-text message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// The transport's acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt(pub String);

impl fmt::Display for DeliveryReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a message could not be delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The message could not be built (bad address, header).
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The transport rejected the message or could not be reached.
    #[error("{0}")]
    Delivery(String),

    /// The transport did not answer in time.
    #[error("mail transport timed out after {0:?}")]
    Timeout(Duration),
}

/// Something that can deliver an [`OutgoingMail`].
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver the message, suspending until the transport answers.
    async fn send(&self, mail: OutgoingMail) -> Result<DeliveryReceipt, TransportError>;
}
