//! Payroll payment routes. Each payment owns one outflow movement.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use kasa_core::disbursement::{PayrollDetails, PayrollUpdate};
use kasa_shared::types::PageRequest;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::clamp_page;
use crate::{AppState, error::ApiError, middleware::CurrentOperator};

/// Creates the payroll routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payroll", post(create_payment).get(list_payments))
        .route(
            "/payroll/{payment_id}",
            get(get_payment).patch(update_payment).delete(delete_payment),
        )
}

/// Query parameters for listing payroll payments.
#[derive(Debug, Deserialize)]
pub struct ListPayrollQuery {
    /// Filter by employee.
    pub employee_id: Option<Uuid>,
}

/// POST `/payroll` - Pay an employee from the drawer.
async fn create_payment(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Json(payload): Json<PayrollDetails>,
) -> impl IntoResponse {
    match state.payroll().create(payload, operator.id()).await {
        Ok(record) => {
            info!(
                payment_id = %record.payment.id,
                employee_id = %record.payment.employee_id,
                movement_id = %record.movement.id,
                amount = %record.payment.amount,
                "Payroll payment recorded via API"
            );
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/payroll`
async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPayrollQuery>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    match state.payroll().list(query.employee_id, clamp_page(page)).await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/payroll/{payment_id}`
async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payroll().get(payment_id).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// PATCH `/payroll/{payment_id}`
async fn update_payment(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<PayrollUpdate>,
) -> impl IntoResponse {
    match state.payroll().update(payment_id, payload).await {
        Ok(record) => {
            info!(
                payment_id = %payment_id,
                operator_id = %operator.id(),
                amount = %record.payment.amount,
                "Payroll payment corrected via API"
            );
            (StatusCode::OK, Json(record)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// DELETE `/payroll/{payment_id}`
async fn delete_payment(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payroll().delete(payment_id).await {
        Ok(()) => {
            info!(payment_id = %payment_id, operator_id = %operator.id(), "Payroll payment deleted via API");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
