//! API route definitions.

use axum::{Router, middleware};
use kasa_shared::types::PageRequest;

use crate::{AppState, middleware::operator_middleware};

pub mod expenses;
pub mod health;
pub mod movements;
pub mod payroll;
pub mod plans;
pub mod sessions;

/// Creates the API router with all routes.
///
/// Everything except the health check runs behind the operator middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let ledger_routes = Router::new()
        .merge(sessions::routes())
        .merge(movements::routes())
        .merge(expenses::routes())
        .merge(payroll::routes())
        .merge(plans::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            operator_middleware,
        ));

    Router::new().merge(health::routes()).merge(ledger_routes)
}

/// Re-applies the page bounds to a page taken from the query string.
fn clamp_page(page: PageRequest) -> PageRequest {
    PageRequest::new(page.page, page.per_page)
}
