//! Cash session routes: open, close and history.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use kasa_core::reconciliation::{CashCount, DenominationTable};
use kasa_core::session::{CloseSessionInput, OpenSessionInput};
use kasa_db::entities::sea_orm_active_enums::SessionStatus;
use kasa_db::repositories::SessionFilter;
use kasa_shared::types::PageRequest;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::clamp_page;
use crate::{AppState, error::ApiError, middleware::CurrentOperator};

/// Creates the session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(open_session).get(list_sessions))
        .route("/sessions/active", get(get_active_session))
        .route("/sessions/active/close", post(close_session))
        .route("/sessions/{session_id}", get(get_session))
        .route("/sessions/{session_id}/summary", get(get_session_summary))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for opening a session.
#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    /// Opening float.
    pub opening_amount: Decimal,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for closing the active session.
#[derive(Debug, Deserialize)]
pub struct CloseSessionRequest {
    /// Cash the operator declares.
    pub declared_amount: Decimal,
    /// Optional closing notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Denomination table the count was taken against.
    #[serde(default)]
    pub denomination_table: DenominationTable,
    /// Units counted per face value, e.g. `{"100": 1, "0.5": 4}`.
    #[serde(default)]
    pub counts: Option<BTreeMap<String, i64>>,
}

/// Query parameters for session history.
#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    /// Filter by operator.
    pub operator_id: Option<Uuid>,
    /// Filter by status (`open` or `closed`).
    pub status: Option<SessionStatus>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/sessions` - Open a session for the calling operator.
async fn open_session(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Json(payload): Json<OpenSessionRequest>,
) -> impl IntoResponse {
    let input = OpenSessionInput {
        operator_id: operator.id(),
        opening_amount: payload.opening_amount,
        notes: payload.notes,
    };

    match state.sessions().open(input).await {
        Ok(session) => {
            info!(
                session_id = %session.id,
                operator_id = %session.operator_id,
                opening_amount = %session.opening_amount,
                "Session opened via API"
            );
            (StatusCode::CREATED, Json(session)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/sessions/active` - The calling operator's open session, if any.
async fn get_active_session(
    State(state): State<AppState>,
    operator: CurrentOperator,
) -> impl IntoResponse {
    match state.sessions().get_active(operator.id()).await {
        Ok(session) => (StatusCode::OK, Json(json!({ "session": session }))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST `/sessions/active/close` - Reconcile and close the operator's session.
async fn close_session(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Json(payload): Json<CloseSessionRequest>,
) -> impl IntoResponse {
    let count = match payload.counts {
        Some(counts) => match CashCount::from_face_values(payload.denomination_table, counts) {
            Ok(count) => Some(count),
            Err(e) => return ApiError::from(e).into_response(),
        },
        None => None,
    };

    let input = CloseSessionInput {
        operator_id: operator.id(),
        declared_amount: payload.declared_amount,
        notes: payload.notes,
        count,
    };

    match state.sessions().close(input).await {
        Ok(closed) => {
            info!(
                session_id = %closed.session.id,
                operator_id = %operator.id(),
                expected = %closed.outcome.expected(),
                variance = %closed.outcome.variance(),
                "Session closed via API"
            );
            (StatusCode::OK, Json(closed)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/sessions` - Session history, newest first.
async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let filter = SessionFilter {
        operator_id: query.operator_id,
        status: query.status,
    };

    match state.sessions().list(filter, clamp_page(page)).await {
        Ok(sessions) => (StatusCode::OK, Json(sessions)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/sessions/{session_id}` - A session with its arqueo.
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.sessions().get(session_id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/sessions/{session_id}/summary` - Running totals of a session.
async fn get_session_summary(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.sessions().summary(session_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
