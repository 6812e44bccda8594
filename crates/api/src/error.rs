//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": <code>, "message": <text>}`
//! with the status the domain error maps to. Server-side failures are
//! logged and their detail withheld from the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kasa_core::ledger::LedgerError;
use kasa_core::reconciliation::ReconciliationError;
use kasa_db::RepositoryError;
use kasa_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// An error ready to be rendered as a JSON response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// A 400 for a malformed request.
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let code = err.error_code();
        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %err, code, "Request failed");
            return Self::new(status, "INTERNAL_ERROR", "An error occurred");
        }

        let app = AppError::from(err);
        warn!(error = %app, code, "Request rejected");
        Self::new(status, code, app.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        RepositoryError::from(err).into()
    }
}

impl From<ReconciliationError> for ApiError {
    fn from(err: ReconciliationError) -> Self {
        RepositoryError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}
