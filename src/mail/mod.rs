//! Outbound mail.
//!
//! [`MailRelay`] turns a [`crate::contact::Submission`] into a plain-text
//! message and hands it to a [`MailTransport`]. [`SmtpMailTransport`] is the
//! production transport.

pub mod relay;
pub mod smtp;
pub mod transport;

pub use relay::{compose, MailRelay, SUBJECT};
pub use smtp::SmtpMailTransport;
pub use transport::{DeliveryReceipt, MailTransport, OutgoingMail, TransportError};
