//! Response DTOs for the Web API.

use serde::Serialize;

/// Body of a successful send.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    /// Confirmation including the transport's receipt.
    pub message: String,
}

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the request body.
    pub field: String,
    /// Why the field was rejected.
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Body of a validation failure.
#[derive(Debug, Serialize)]
pub struct ValidationErrorBody {
    /// Every failing field, in form order.
    pub errors: Vec<FieldError>,
}

/// Body of any other failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Failure description.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_response_serializes() {
        let body = SendResponse {
            message: "Email sent: 250 OK".to_string(),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "message": "Email sent: 250 OK" })
        );
    }
}
