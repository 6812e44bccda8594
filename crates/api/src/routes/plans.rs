//! Payment plan routes: debts collected in installments.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use kasa_core::receivables::{CreatePlanInput, InstallmentInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::CurrentOperator};

/// Creates the payment plan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", post(create_plan))
        .route("/plans/pending", get(list_pending_plans))
        .route("/plans/{plan_id}", get(get_plan))
        .route(
            "/plans/{plan_id}/installments",
            get(list_installments).post(register_installment),
        )
}

/// Query parameters for pending plans.
#[derive(Debug, Deserialize)]
pub struct PendingPlansQuery {
    /// Filter by debtor.
    pub debtor_id: Option<Uuid>,
}

/// Request body for registering an installment.
#[derive(Debug, Deserialize)]
pub struct RegisterInstallmentRequest {
    /// Amount collected.
    pub amount: Decimal,
    /// Payment method.
    pub payment_method: String,
    /// Receipt number, unique within the plan.
    #[serde(default)]
    pub reference: Option<String>,
}

/// POST `/plans` - Create a payment plan.
async fn create_plan(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Json(payload): Json<CreatePlanInput>,
) -> impl IntoResponse {
    match state.receivables().create_plan(payload).await {
        Ok(detail) => {
            info!(
                plan_id = %detail.plan.id,
                debtor_id = %detail.plan.debtor_id,
                operator_id = %operator.id(),
                total_amount = %detail.plan.total_amount,
                "Payment plan created via API"
            );
            (StatusCode::CREATED, Json(detail)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/plans/pending` - Plans with an outstanding balance, earliest due first.
async fn list_pending_plans(
    State(state): State<AppState>,
    Query(query): Query<PendingPlansQuery>,
) -> impl IntoResponse {
    match state.receivables().list_pending(query.debtor_id).await {
        Ok(plans) => (StatusCode::OK, Json(json!({ "plans": plans }))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/plans/{plan_id}`
async fn get_plan(State(state): State<AppState>, Path(plan_id): Path<Uuid>) -> impl IntoResponse {
    match state.receivables().get_plan(plan_id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/plans/{plan_id}/installments`
async fn list_installments(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.receivables().list_installments(plan_id).await {
        Ok(installments) => {
            (StatusCode::OK, Json(json!({ "installments": installments }))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST `/plans/{plan_id}/installments` - Collect an installment into the drawer.
async fn register_installment(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(plan_id): Path<Uuid>,
    Json(payload): Json<RegisterInstallmentRequest>,
) -> impl IntoResponse {
    let input = InstallmentInput {
        amount: payload.amount,
        payment_method: payload.payment_method,
        reference: payload.reference,
        operator_id: operator.id(),
    };

    match state.receivables().register_installment(plan_id, input).await {
        Ok(registered) => {
            info!(
                plan_id = %plan_id,
                installment_id = %registered.installment.id,
                movement_id = %registered.movement.id,
                pending_amount = %registered.plan.plan.pending_amount,
                "Installment registered via API"
            );
            (StatusCode::CREATED, Json(registered)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
