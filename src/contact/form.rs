//! Raw contact form body.

use serde::de::{self, Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Contact form request body before validation.
///
/// Every field is kept as an arbitrary JSON value so that type mismatches
/// become field errors instead of a whole-body parse failure. Only a JSON
/// object is accepted as a body.
///
/// A `null` in a validated field counts as missing. The agreement flags keep
/// `null` as sent.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    /// Submitter's first name.
    pub first_name: Option<Value>,
    /// Submitter's last name.
    pub last_name: Option<Value>,
    /// Submitter's email address.
    pub email: Option<Value>,
    /// Project budget.
    pub budget: Option<Value>,
    /// Free-text message.
    pub message: Option<Value>,
    /// Services the submitter is interested in.
    pub selected_options: Option<Value>,
    /// Newsletter consent.
    pub agreement1: Option<Value>,
    /// Privacy policy consent.
    pub agreement2: Option<Value>,
}

impl ContactForm {
    /// Build a form from the members of a JSON object. Unknown members are ignored.
    pub fn from_object(mut fields: Map<String, Value>) -> Self {
        let mut field = |name: &str| fields.remove(name).filter(|v| !v.is_null());
        let first_name = field("firstName");
        let last_name = field("lastName");
        let email = field("email");
        let budget = field("budget");
        let message = field("message");
        let selected_options = field("selectedOptions");

        Self {
            first_name,
            last_name,
            email,
            budget,
            message,
            selected_options,
            agreement1: fields.remove("agreement1"),
            agreement2: fields.remove("agreement2"),
        }
    }
}

/// Name of a JSON value's type, for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<'de> Deserialize<'de> for ContactForm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(fields) => Ok(Self::from_object(fields)),
            other => Err(de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case() {
        let form: ContactForm = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "selectedOptions": ["Web"],
            "agreement1": true
        }))
        .unwrap();

        assert_eq!(form.first_name, Some(json!("Ada")));
        assert_eq!(form.last_name, Some(json!("Lovelace")));
        assert_eq!(form.selected_options, Some(json!(["Web"])));
        assert_eq!(form.agreement1, Some(json!(true)));
        assert!(form.email.is_none());
        assert!(form.agreement2.is_none());
    }

    #[test]
    fn test_deserialize_keeps_mismatched_types() {
        let form: ContactForm = serde_json::from_value(json!({
            "firstName": 42,
            "selectedOptions": "Web"
        }))
        .unwrap();

        assert_eq!(form.first_name, Some(json!(42)));
        assert_eq!(form.selected_options, Some(json!("Web")));
    }

    #[test]
    fn test_deserialize_rejects_non_object() {
        assert!(serde_json::from_value::<ContactForm>(json!([1, 2, 3])).is_err());
        assert!(serde_json::from_value::<ContactForm>(json!("hello")).is_err());
        assert!(serde_json::from_value::<ContactForm>(json!(null)).is_err());
        assert!(serde_json::from_str::<ContactForm>(r#"["Ada", "Lovelace"]"#).is_err());
    }

    #[test]
    fn test_deserialize_null_fields() {
        let form: ContactForm = serde_json::from_value(json!({
            "firstName": null,
            "agreement1": null
        }))
        .unwrap();

        assert!(form.first_name.is_none());
        assert_eq!(form.agreement1, Some(Value::Null));
        assert!(form.agreement2.is_none());
    }
}
