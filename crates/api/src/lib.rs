//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes for sessions, movements, expenses, payroll and plans
//! - Operator identification middleware
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use kasa_db::{
    CashSessionRepository, ExpenseRepository, MovementRepository, PayrollRepository,
    ReceivableRepository,
};
use kasa_shared::{AppConfig, LedgerConfig, ReconciliationMode};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Policy applied when a cash count disagrees with the declared amount.
    pub reconciliation_mode: ReconciliationMode,
    /// Posting rules for the movement ledger.
    pub ledger: Arc<LedgerConfig>,
}

impl AppState {
    /// Builds the state from a connection and the loaded configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            reconciliation_mode: config.reconciliation.mode,
            ledger: Arc::new(config.ledger.clone()),
        }
    }

    pub(crate) fn sessions(&self) -> CashSessionRepository {
        CashSessionRepository::new((*self.db).clone(), self.reconciliation_mode)
    }

    pub(crate) fn movements(&self) -> MovementRepository {
        MovementRepository::new((*self.db).clone(), &self.ledger)
    }

    pub(crate) fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new((*self.db).clone(), &self.ledger)
    }

    pub(crate) fn payroll(&self) -> PayrollRepository {
        PayrollRepository::new((*self.db).clone(), &self.ledger)
    }

    pub(crate) fn receivables(&self) -> ReceivableRepository {
        ReceivableRepository::new((*self.db).clone(), &self.ledger)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
