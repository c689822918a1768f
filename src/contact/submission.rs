//! Validated contact form submission.

use serde_json::Value;
use std::fmt;

/// A contact form submission that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub(super) first_name: String,
    pub(super) last_name: String,
    pub(super) email: String,
    pub(super) budget: Budget,
    pub(super) message: String,
    pub(super) selected_options: Vec<String>,
    pub(super) agreement1: Agreement,
    pub(super) agreement2: Agreement,
}

impl Submission {
    /// Submitter's first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Submitter's last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Submitter's email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Project budget.
    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Free-text message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Selected services, in submission order.
    pub fn selected_options(&self) -> &[String] {
        &self.selected_options
    }

    /// Newsletter consent.
    pub fn newsletter(&self) -> &Agreement {
        &self.agreement1
    }

    /// Privacy policy consent.
    pub fn privacy_policy(&self) -> &Agreement {
        &self.agreement2
    }
}

/// A numeric budget.
///
/// Displays as the text the submitter sent, so "0500" stays "0500".
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub(super) amount: f64,
    pub(super) text: String,
}

impl Budget {
    /// Parsed amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An unvalidated consent flag, relayed as sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Agreement(Option<Value>);

impl Agreement {
    /// Wrap the raw flag.
    pub fn new(value: Option<Value>) -> Self {
        Self(value)
    }

    /// The raw flag, if one was sent.
    pub fn value(&self) -> Option<&Value> {
        self.0.as_ref()
    }
}

impl fmt::Display for Agreement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("not provided"),
            Some(Value::String(s)) => f.write_str(s),
            Some(value) => write!(f, "{value}"),
        }
    }
}

/// Render a JSON value as plain text: strings verbatim, `null` empty,
/// anything else as compact JSON.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
