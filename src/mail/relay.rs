//! Relays validated submissions to the configured mailbox.

use std::sync::Arc;
use std::time::Duration;

use super::transport::{DeliveryReceipt, MailTransport, OutgoingMail, TransportError};
use crate::contact::Submission;

/// Subject line of every relayed submission.
pub const SUBJECT: &str = "New Contact Form Submission";

/// Format a submission as the plain-text mail body.
fn format_body(submission: &Submission) -> String {
    format!(
        "First Name: {}\n\
         Last Name: {}\n\
         Email: {}\n\
         Budget: {}\n\
         Message: {}\n\
         Services: {}\n\
         Agreement to Newsletter: {}\n\
         Agreement to Privacy Policy: {}\n",
        submission.first_name(),
        submission.last_name(),
        submission.email(),
        submission.budget(),
        submission.message(),
        submission.selected_options().join(", "),
        submission.newsletter(),
        submission.privacy_policy(),
    )
}

/// Build the message for `submission`, sent from and to `mailbox`.
pub fn compose(submission: &Submission, mailbox: &str) -> OutgoingMail {
    OutgoingMail {
        from: mailbox.to_string(),
        to: mailbox.to_string(),
        subject: SUBJECT.to_string(),
        body: format_body(submission),
    }
}

/// Sends submissions through a [`MailTransport`].
#[derive(Clone)]
pub struct MailRelay {
    transport: Arc<dyn MailTransport>,
    mailbox: String,
    timeout: Option<Duration>,
}

impl MailRelay {
    /// Create a relay delivering to `mailbox`, with no send timeout.
    pub fn new(transport: Arc<dyn MailTransport>, mailbox: impl Into<String>) -> Self {
        Self {
            transport,
            mailbox: mailbox.into(),
            timeout: None,
        }
    }

    /// Bound each send by `timeout`. A zero duration removes the bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// The mailbox that sends and receives submissions.
    pub fn mailbox(&self) -> &str {
        &self.mailbox
    }

    /// Deliver one submission. Failures are returned as-is; nothing is retried.
    pub async fn deliver(&self, submission: &Submission) -> Result<DeliveryReceipt, TransportError> {
        let mail = compose(submission, &self.mailbox);
        let send = self.transport.send(mail);

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, send)
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => send.await,
        }
    }
}
