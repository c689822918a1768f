//! Contact form handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::contact::Submission;
use crate::web::dto::{SendResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /send - Relay a contact form submission to the mailbox.
pub async fn send_contact(
    State(state): State<Arc<AppState>>,
    ValidatedJson(submission): ValidatedJson<Submission>,
) -> Result<Json<SendResponse>, ApiError> {
    let receipt = state.relay.deliver(&submission).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to send contact form email");
        ApiError::from(e)
    })?;

    tracing::info!(receipt = %receipt, "Contact form email sent");

    Ok(Json(SendResponse {
        message: format!("Email sent: {receipt}"),
    }))
}
