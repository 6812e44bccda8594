//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. The SQL sticks to types
//! and constraints both PostgreSQL and SQLite accept.

pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

mod m20260301_000001_reference_data;
mod m20260301_000002_cash_ledger;
mod m20260301_000003_receivables;
mod m20260301_000004_disbursements;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_reference_data::Migration),
            Box::new(m20260301_000002_cash_ledger::Migration),
            Box::new(m20260301_000003_receivables::Migration),
            Box::new(m20260301_000004_disbursements::Migration),
        ]
    }
}

/// Adapts shared DDL to the connected backend.
///
/// SQLite has no fixed-point column type and its NUMERIC affinity turns whole
/// amounts into integers, so money columns are declared REAL there.
fn ddl(manager: &SchemaManager, sql: &str) -> String {
    match manager.get_database_backend() {
        DbBackend::Sqlite => sql.replace("NUMERIC(14, 2)", "REAL"),
        _ => sql.to_owned(),
    }
}
