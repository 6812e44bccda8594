//! Operator identification for ledger routes.
//!
//! Every terminal identifies the operator at the drawer through the
//! `X-Operator-Id` header. The middleware checks that the operator exists
//! and is active before the request reaches a handler.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use kasa_db::{DirectoryRepository, RepositoryError};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Header carrying the operator id.
pub const OPERATOR_HEADER: &str = "x-operator-id";

/// Middleware that resolves the operator behind the request.
///
/// On success the operator id is stored in the request extensions where
/// [`CurrentOperator`] picks it up.
pub async fn operator_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(OPERATOR_HEADER)
        .and_then(|h| h.to_str().ok());

    let Some(raw) = header else {
        return ApiError::new(
            StatusCode::UNAUTHORIZED,
            "MISSING_OPERATOR",
            "X-Operator-Id header is required",
        )
        .into_response();
    };

    let Ok(operator_id) = Uuid::parse_str(raw.trim()) else {
        return ApiError::bad_request("INVALID_OPERATOR", "X-Operator-Id must be a UUID")
            .into_response();
    };

    let directory = DirectoryRepository::new((*state.db).clone());
    match directory.get_operator(operator_id).await {
        Ok(operator) if operator.active => {
            request.extensions_mut().insert(CurrentOperator(operator.id));
            next.run(request).await
        }
        Ok(_) => ApiError::new(
            StatusCode::FORBIDDEN,
            "OPERATOR_INACTIVE",
            "Operator is not active",
        )
        .into_response(),
        Err(RepositoryError::NotFound { .. }) => ApiError::new(
            StatusCode::UNAUTHORIZED,
            "UNKNOWN_OPERATOR",
            "Operator not found",
        )
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Extractor for the operator resolved by [`operator_middleware`].
///
/// ```ignore
/// async fn handler(operator: CurrentOperator) -> impl IntoResponse {
///     let operator_id = operator.id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentOperator(pub Uuid);

impl CurrentOperator {
    /// Returns the operator id.
    #[must_use]
    pub const fn id(self) -> Uuid {
        self.0
    }
}

impl<S> FromRequestParts<S> for CurrentOperator
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .copied()
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::UNAUTHORIZED,
                    "MISSING_OPERATOR",
                    "Operator identification required",
                )
            })
    }
}
