//! Validating JSON extractor.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::ValidationErrors;

use crate::contact::{ContactForm, Submission};
use crate::web::error::ApiError;

/// A typed value that can only be produced from a body that passes validation.
pub trait FromValidatedBody: Sized {
    /// Shape of the raw JSON body.
    type Body: DeserializeOwned;

    /// Check every rule on `body`, collecting all failures.
    fn from_body(body: Self::Body) -> Result<Self, ValidationErrors>;
}

impl FromValidatedBody for Submission {
    type Body = ContactForm;

    fn from_body(body: ContactForm) -> Result<Self, ValidationErrors> {
        Submission::try_from(body)
    }
}

/// A JSON extractor that validates the request body.
///
/// The body is first read as `T::Body`, then turned into `T`. Unreadable
/// bodies and failing fields both become a 400 with field-level errors, so
/// the handler only ever sees a valid `T`.
///
/// # Example
///
/// ```ignore
/// async fn send(ValidatedJson(submission): ValidatedJson<Submission>) -> ... {
///     // submission is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: FromValidatedBody,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T::Body>::from_request(req, state)
            .await
            .map_err(ApiError::from_json_rejection)?;

        T::from_body(body)
            .map(ValidatedJson)
            .map_err(ApiError::from_validation_errors)
    }
}
