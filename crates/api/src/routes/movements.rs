//! Movement ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use kasa_core::ledger::{
    DateRange, Direction, MovementCategory, MovementFilter, PostMovementInput, SourceRef,
};
use kasa_shared::types::PageRequest;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::clamp_page;
use crate::{AppState, error::ApiError, middleware::CurrentOperator};

/// Creates the movement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movements", post(post_movement).get(query_movements))
        .route("/movements/{movement_id}", get(get_movement))
        .route("/movements/{movement_id}/reverse", post(reverse_movement))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for posting a movement.
#[derive(Debug, Deserialize)]
pub struct PostMovementRequest {
    /// `inflow` or `outflow`.
    pub direction: Direction,
    /// Category tag, e.g. `SALE`.
    pub category: MovementCategory,
    /// Positive amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Explicit session; defaults to the operator's open session.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// Originating record, used to detect duplicate postings.
    #[serde(default)]
    pub source: Option<SourceRef>,
    /// Payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Voucher number.
    #[serde(default)]
    pub voucher: Option<String>,
}

/// Query parameters for listing movements.
#[derive(Debug, Deserialize)]
pub struct ListMovementsQuery {
    /// Filter by session.
    pub session_id: Option<Uuid>,
    /// Filter by operator.
    pub operator_id: Option<Uuid>,
    /// Window start (RFC 3339, inclusive).
    pub from: Option<DateTime<Utc>>,
    /// Window end (RFC 3339, exclusive).
    pub to: Option<DateTime<Utc>>,
    /// Filter by category tag.
    pub category: Option<MovementCategory>,
    /// Filter by direction.
    pub direction: Option<Direction>,
    /// Filter by voucher.
    pub voucher: Option<String>,
    /// Only movements attached to no session.
    #[serde(default)]
    pub unassigned: bool,
}

/// Request body for reversing a movement.
#[derive(Debug, Default, Deserialize)]
pub struct ReverseMovementRequest {
    /// Why the movement is annulled.
    #[serde(default)]
    pub reason: Option<String>,
}

impl ListMovementsQuery {
    fn into_filter(self) -> Result<MovementFilter, ApiError> {
        let date_range = match (self.from, self.to) {
            (Some(from), Some(to)) => Some(DateRange::new(from, to)?),
            (None, None) => None,
            _ => {
                return Err(ApiError::bad_request(
                    "INVALID_DATE_RANGE",
                    "Both from and to are required to filter by date",
                ));
            }
        };

        Ok(MovementFilter {
            session_id: self.session_id,
            operator_id: self.operator_id,
            date_range,
            category: self.category,
            direction: self.direction,
            voucher: self.voucher,
            unassigned_only: self.unassigned,
        })
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/movements` - Post a movement for the calling operator.
async fn post_movement(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Json(payload): Json<PostMovementRequest>,
) -> impl IntoResponse {
    let input = PostMovementInput {
        direction: payload.direction,
        category: payload.category,
        amount: payload.amount,
        description: payload.description,
        operator_id: operator.id(),
        session_id: payload.session_id,
        source: payload.source,
        payment_method: payload.payment_method,
        voucher: payload.voucher,
    };

    match state.movements().post(input).await {
        Ok(movement) => {
            info!(
                movement_id = %movement.id,
                operator_id = %movement.operator_id,
                session_id = ?movement.session_id,
                category = %movement.category,
                amount = %movement.amount,
                "Movement posted via API"
            );
            (StatusCode::CREATED, Json(movement)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/movements` - Query movements, newest first.
async fn query_movements(
    State(state): State<AppState>,
    Query(query): Query<ListMovementsQuery>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => return e.into_response(),
    };

    match state.movements().query(filter, clamp_page(page)).await {
        Ok(movements) => (StatusCode::OK, Json(movements)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/movements/{movement_id}` - A single movement.
async fn get_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.movements().get(movement_id).await {
        Ok(movement) => (StatusCode::OK, Json(movement)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST `/movements/{movement_id}/reverse` - Annul a movement.
async fn reverse_movement(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(movement_id): Path<Uuid>,
    Json(payload): Json<ReverseMovementRequest>,
) -> impl IntoResponse {
    match state
        .movements()
        .reverse(movement_id, operator.id(), payload.reason.as_deref())
        .await
    {
        Ok(annulment) => {
            info!(
                movement_id = %movement_id,
                annulment_id = %annulment.id,
                operator_id = %operator.id(),
                "Movement reversed via API"
            );
            (StatusCode::CREATED, Json(annulment)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
