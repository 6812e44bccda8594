//! Expense routes. Each expense owns one outflow movement.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use kasa_core::disbursement::{ExpenseDetails, ExpenseUpdate};
use kasa_db::repositories::ExpenseFilter;
use kasa_shared::types::PageRequest;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::clamp_page;
use crate::{AppState, error::ApiError, middleware::CurrentOperator};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense).get(list_expenses))
        .route(
            "/expenses/{expense_id}",
            get(get_expense).patch(update_expense).delete(delete_expense),
        )
}

/// Query parameters for listing expenses.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Earliest expense date (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Latest expense date (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// POST `/expenses` - Record an expense and its outflow.
async fn create_expense(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Json(payload): Json<ExpenseDetails>,
) -> impl IntoResponse {
    match state.expenses().create(payload, operator.id()).await {
        Ok(record) => {
            info!(
                expense_id = %record.expense.id,
                movement_id = %record.movement.id,
                operator_id = %operator.id(),
                amount = %record.expense.amount,
                "Expense recorded via API"
            );
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/expenses` - List expenses, most recent first.
async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ListExpensesQuery>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let filter = ExpenseFilter {
        category_id: query.category_id,
        from: query.from,
        to: query.to,
    };

    match state.expenses().list(filter, clamp_page(page)).await {
        Ok(expenses) => (StatusCode::OK, Json(expenses)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/expenses/{expense_id}`
async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.expenses().get(expense_id).await {
        Ok(expense) => (StatusCode::OK, Json(expense)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// PATCH `/expenses/{expense_id}` - Correct an expense and its movement.
async fn update_expense(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> impl IntoResponse {
    match state.expenses().update(expense_id, payload).await {
        Ok(record) => {
            info!(
                expense_id = %expense_id,
                operator_id = %operator.id(),
                amount = %record.expense.amount,
                "Expense corrected via API"
            );
            (StatusCode::OK, Json(record)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// DELETE `/expenses/{expense_id}` - Remove an expense and its movement.
async fn delete_expense(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.expenses().delete(expense_id).await {
        Ok(()) => {
            info!(expense_id = %expense_id, operator_id = %operator.id(), "Expense deleted via API");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
