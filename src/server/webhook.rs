//! Webhook endpoint handler.
//!
//! Accepts issue-update deliveries from the tracker and applies branch
//! protection synchronously before answering.
//!
//! # Response
//!
//! - 200 OK, plain text: no status transition, or no rule for the new status
//! - 200 OK, JSON `EventReport`: protection applied; per-repository failures
//!   are reported in the body, not as an HTTP error
//! - 400 Bad Request: empty body, invalid JSON, or missing issue fields
//! - 500 Internal Server Error: fault before any repository was attempted

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::context::AppContext;
use crate::domain::event::{Interpretation, interpret_bytes};
use crate::error::{AppError, InterpretError};
use crate::workflow::webhook::{ChangeOutcome, process_change};

pub const NO_ACTION_MESSAGE: &str = "no action required";

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error(transparent)]
    Payload(#[from] InterpretError),
    #[error(transparent)]
    Internal(#[from] AppError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match &self {
            WebhookError::Payload(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            WebhookError::Internal(err) => {
                error!(error = %err, "webhook processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "error processing webhook",
                )
                    .into_response()
            }
        }
    }
}

pub async fn webhook_handler(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<Response, WebhookError> {
    debug!(payload = %String::from_utf8_lossy(&body), "received webhook payload");

    let change = match interpret_bytes(&body) {
        Ok(Interpretation::Change(change)) => change,
        Ok(Interpretation::NoStatusChange { issue_key }) => {
            info!(issue_key = %issue_key, "no status change in event");
            return Ok((StatusCode::OK, NO_ACTION_MESSAGE).into_response());
        }
        Err(err) => {
            warn!(error = %err, "rejected webhook payload");
            return Err(err.into());
        }
    };

    info!(
        issue_key = %change.issue_key,
        status = %change.new_status,
        branch = %change.branch,
        "status change received"
    );

    match process_change(&ctx, change).await? {
        ChangeOutcome::NoMatchingRule { issue_key, status } => {
            info!(issue_key = %issue_key, status = %status, "no rule for status");
            Ok((StatusCode::OK, NO_ACTION_MESSAGE).into_response())
        }
        ChangeOutcome::Applied(report) => {
            let failures = report.failures();
            if failures > 0 {
                warn!(
                    issue_key = %report.issue_key,
                    failures,
                    total = report.outcomes.len(),
                    "branch protection failed for some repositories"
                );
            }
            Ok((StatusCode::OK, Json(report)).into_response())
        }
    }
}
