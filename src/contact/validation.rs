//! Field rules for contact form submissions.
//!
//! Each rule inspects one raw field and either yields its typed value or a
//! [`ValidationError`]. Rules are independent; [`Submission::try_from`] runs
//! all of them and collects every failure into [`ValidationErrors`].

use serde_json::Value;
use std::borrow::Cow;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

use super::form::ContactForm;
use super::submission::{render_value, Agreement, Budget, Submission};

/// Validated fields, in the order errors are reported.
pub const FIELDS: [&str; 6] = [
    "firstName",
    "lastName",
    "email",
    "budget",
    "message",
    "selectedOptions",
];

/// Position of a field in [`FIELDS`]; unknown fields sort last.
pub fn field_rank(field: &str) -> usize {
    FIELDS
        .iter()
        .position(|f| *f == field)
        .unwrap_or(FIELDS.len())
}

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn required(label: &str) -> ValidationError {
    error("required", format!("{label} is required"))
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("not_empty_trimmed", "Must not be empty"));
    }
    Ok(())
}

/// Validate that a string contains no digit characters.
pub fn no_digits(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_ascii_digit()) {
        return Err(error("no_digits", "Must not contain numbers"));
    }
    Ok(())
}

/// Check whether `value` is a decimal number: `[+-]?([0-9]*\.)?[0-9]+`.
pub fn is_numeric_text(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => ("", unsigned),
    };
    !fraction.is_empty()
        && fraction.chars().all(|c| c.is_ascii_digit())
        && whole.chars().all(|c| c.is_ascii_digit())
}

fn text<'a>(value: Option<&'a Value>, label: &str) -> Result<&'a str, ValidationError> {
    match value {
        None => Err(required(label)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(error("string", format!("{label} must be a string"))),
    }
}

fn non_empty_text<'a>(value: Option<&'a Value>, label: &str) -> Result<&'a str, ValidationError> {
    let s = text(value, label)?;
    not_empty_trimmed(s).map_err(|_| required(label))?;
    Ok(s)
}

/// First or last name: a non-empty string without digits.
pub fn person_name(value: Option<&Value>, label: &str) -> Result<String, ValidationError> {
    let s = non_empty_text(value, label)?;
    no_digits(s).map_err(|_| error("no_digits", format!("{label} must not contain numbers")))?;
    Ok(s.to_string())
}

/// Check that the domain of an address ends in a top-level domain: at least
/// two letters, or an `xn--` punycode label. Rejects `localhost` and IP
/// literals.
pub fn has_tld(address: &str) -> bool {
    let Some((_, domain)) = address.rsplit_once('@') else {
        return false;
    };
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let punycode = tld.len() > 4
        && tld.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("xn--"))
        && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    punycode || (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
}

/// Email address: a string matching the email grammar, with a top-level domain.
pub fn email_address(value: Option<&Value>) -> Result<String, ValidationError> {
    let s = text(value, "Email")?;
    if !s.validate_email() || !has_tld(s) {
        return Err(error("email", "Invalid email address"));
    }
    Ok(s.to_string())
}

/// Budget: a finite JSON number or a numeric string.
pub fn budget(value: Option<&Value>) -> Result<Budget, ValidationError> {
    let not_a_number = || error("numeric", "Budget must be a number");
    match value {
        None => Err(required("Budget")),
        Some(Value::Number(n)) => {
            let amount = n.as_f64().filter(|a| a.is_finite()).ok_or_else(not_a_number)?;
            Ok(Budget {
                amount,
                text: n.to_string(),
            })
        }
        Some(Value::String(s)) if is_numeric_text(s) => {
            let amount = s.parse::<f64>().map_err(|_| not_a_number())?;
            Ok(Budget {
                amount,
                text: s.clone(),
            })
        }
        Some(_) => Err(not_a_number()),
    }
}

/// Message: a non-empty string.
pub fn message_text(value: Option<&Value>) -> Result<String, ValidationError> {
    non_empty_text(value, "Message").map(str::to_string)
}

/// Selected options: an array. Elements are not checked.
pub fn selected_options(value: Option<&Value>) -> Result<Vec<String>, ValidationError> {
    match value {
        None => Err(error("required", "Selected options are required")),
        Some(Value::Array(items)) => Ok(items.iter().map(render_value).collect()),
        Some(_) => Err(error("array", "Selected options must be an array")),
    }
}

fn collect<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<T, ValidationError>,
) -> Option<T> {
    result.map_err(|e| errors.add(field, e)).ok()
}

impl TryFrom<ContactForm> for Submission {
    type Error = ValidationErrors;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let first_name = collect(
            &mut errors,
            "firstName",
            person_name(form.first_name.as_ref(), "First name"),
        );
        let last_name = collect(
            &mut errors,
            "lastName",
            person_name(form.last_name.as_ref(), "Last name"),
        );
        let email = collect(&mut errors, "email", email_address(form.email.as_ref()));
        let budget = collect(&mut errors, "budget", budget(form.budget.as_ref()));
        let message = collect(&mut errors, "message", message_text(form.message.as_ref()));
        let selected_options = collect(
            &mut errors,
            "selectedOptions",
            selected_options(form.selected_options.as_ref()),
        );

        match (first_name, last_name, email, budget, message, selected_options) {
            (
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(budget),
                Some(message),
                Some(selected_options),
            ) => Ok(Submission {
                first_name,
                last_name,
                email,
                budget,
                message,
                selected_options,
                agreement1: Agreement::new(form.agreement1),
                agreement2: Agreement::new(form.agreement2),
            }),
            _ => Err(errors),
        }
    }
}
