//! Reference data migration.
//!
//! Creates the read-only lookup tables the ledger consults by id:
//! operators, debtors, employees and expense categories.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(REFERENCE_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS expense_categories;
DROP TABLE IF EXISTS employees;
DROP TABLE IF EXISTS debtors;
DROP TABLE IF EXISTS operators;
",
        )
        .await?;
        Ok(())
    }
}

const REFERENCE_SQL: &str = r"
-- Cashiers who open and close drawers
CREATE TABLE operators (
    id UUID PRIMARY KEY,
    name VARCHAR(120) NOT NULL,
    active BOOLEAN NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

-- People or organizations owing money under a payment plan
CREATE TABLE debtors (
    id UUID PRIMARY KEY,
    name VARCHAR(160) NOT NULL,
    document VARCHAR(40),
    created_at TIMESTAMPTZ NOT NULL
);

-- Staff paid through the payroll disbursement ledger
CREATE TABLE employees (
    id UUID PRIMARY KEY,
    name VARCHAR(160) NOT NULL,
    active BOOLEAN NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE expense_categories (
    id UUID PRIMARY KEY,
    name VARCHAR(80) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE UNIQUE INDEX uq_expense_categories_name ON expense_categories(name);
CREATE INDEX idx_debtors_name ON debtors(name);
";
