//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories for the cash ledger (every transaction lives here)
//! - Database migrations

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use error::RepositoryError;
pub use repositories::{
    CashSessionRepository, DirectoryRepository, ExpenseRepository, MovementRepository,
    PayrollRepository, ReceivableRepository,
};

use std::time::Duration;

use kasa_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the configured pool sizes.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
