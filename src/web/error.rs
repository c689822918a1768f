//! API error handling.
//!
//! Every rejected or failed request ends in exactly one [`ApiError`], whose
//! category decides the status code and the body shape.

use axum::{
    extract::rejection::JsonRejection,
    http::{header::RETRY_AFTER, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;

use crate::contact::field_rank;
use crate::mail::TransportError;
use crate::web::dto::{ErrorBody, FieldError, ValidationErrorBody};

/// API error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// One or more fields failed validation (400).
    ValidationError,
    /// The request body is too large (413).
    PayloadTooLarge,
    /// The client exceeded its request budget (429).
    RateLimitExceeded,
    /// The mail transport failed (500).
    TransportFailure,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::TransportFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    errors: Vec<FieldError>,
    retry_after: Option<Duration>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
            retry_after: None,
        }
    }

    /// The error category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Field-level errors (validation errors only).
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Create a validation error from field-level errors.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            ..Self::new(ErrorCode::ValidationError, "Validation failed")
        }
    }

    /// Create a validation error from `validator::ValidationErrors`,
    /// ordered by form field.
    pub fn from_validation_errors(validation_errors: validator::ValidationErrors) -> Self {
        let mut errors: Vec<FieldError> = Vec::new();

        for (field, field_errors) in validation_errors.field_errors() {
            for e in field_errors.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                errors.push(FieldError::new(field.to_string(), message));
            }
        }
        errors.sort_by_key(|e| field_rank(&e.field));

        Self::validation(errors)
    }

    /// Create an error from a body that could not be read as JSON.
    pub fn from_json_rejection(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::payload_too_large(rejection.body_text());
        }
        Self::validation(vec![FieldError::new(
            "body",
            format!("Invalid JSON: {}", rejection.body_text()),
        )])
    }

    /// Create a payload too large error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// Create a rate limit error for a limiter with the given window.
    pub fn rate_limited(window: Duration, retry_after: Duration) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..Self::new(ErrorCode::RateLimitExceeded, rate_limit_message(window))
        }
    }

    /// Create a transport failure carrying the transport's description.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransportFailure, message)
    }
}

/// "Too many requests ... after 15 minutes" for a 15-minute window.
fn rate_limit_message(window: Duration) -> String {
    let minutes = window.as_secs().div_ceil(60).max(1);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Too many requests from this IP, please try again after {minutes} {unit}")
}

/// Whole seconds, rounded up.
fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        match self.code {
            ErrorCode::ValidationError => (
                status,
                Json(ValidationErrorBody {
                    errors: self.errors,
                }),
            )
                .into_response(),
            ErrorCode::RateLimitExceeded => {
                let retry_after = ceil_secs(self.retry_after.unwrap_or_default()).to_string();
                (status, [(RETRY_AFTER, retry_after)], self.message).into_response()
            }
            ErrorCode::PayloadTooLarge | ErrorCode::TransportFailure => (
                status,
                Json(ErrorBody {
                    error: self.message,
                }),
            )
                .into_response(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use validator::{ValidationError, ValidationErrors};

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_code_status() {
        assert_eq!(
            ErrorCode::ValidationError.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ErrorCode::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::TransportFailure.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_validation_errors_ordered_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "selectedOptions",
            ValidationError::new("array").with_message("Selected options must be an array".into()),
        );
        errors.add("email", ValidationError::new("email"));
        errors.add(
            "firstName",
            ValidationError::new("no_digits").with_message("First name must not contain numbers".into()),
        );

        let err = ApiError::from_validation_errors(errors);

        assert_eq!(err.code(), ErrorCode::ValidationError);
        let fields: Vec<&str> = err.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["firstName", "email", "selectedOptions"]);
        assert_eq!(err.errors()[1].message, "Invalid value for email");
    }

    #[test]
    fn test_rate_limit_message() {
        assert_eq!(
            rate_limit_message(Duration::from_secs(900)),
            "Too many requests from this IP, please try again after 15 minutes"
        );
        assert_eq!(
            rate_limit_message(Duration::from_secs(30)),
            "Too many requests from this IP, please try again after 1 minute"
        );
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::from_secs(5)), 5);
        assert_eq!(ceil_secs(Duration::from_millis(5001)), 6);
        assert_eq!(ceil_secs(Duration::ZERO), 0);
    }

    #[tokio::test]
    async fn test_validation_response_shape() {
        let err = ApiError::validation(vec![FieldError::new("budget", "Budget must be a number")]);
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "errors": [{ "field": "budget", "message": "Budget must be a number" }] })
        );
    }

    #[tokio::test]
    async fn test_transport_response_shape() {
        let err: ApiError = TransportError::Delivery("SMTP timeout".to_string()).into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "SMTP timeout" }));
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let err = ApiError::rate_limited(Duration::from_secs(900), Duration::from_millis(120_500));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "121");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            &bytes[..],
            b"Too many requests from this IP, please try again after 15 minutes"
        );
    }
}
