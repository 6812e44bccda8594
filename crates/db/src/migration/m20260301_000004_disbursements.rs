//! Disbursements migration: expenses and payroll payments.

use sea_orm_migration::prelude::*;

use super::ddl;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(&ddl(manager, DISBURSEMENTS_SQL)).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS payroll_payments;
DROP TABLE IF EXISTS expenses;
",
        )
        .await?;
        Ok(())
    }
}

const DISBURSEMENTS_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    category_id UUID NOT NULL REFERENCES expense_categories(id),
    amount NUMERIC(14, 2) NOT NULL,
    description VARCHAR(500) NOT NULL,
    expense_date DATE NOT NULL,
    payment_method VARCHAR(32),
    voucher VARCHAR(64),
    operator_id UUID NOT NULL REFERENCES operators(id),
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_expenses_amount CHECK (amount > 0)
);

CREATE INDEX idx_expenses_category ON expenses(category_id, expense_date DESC);
CREATE INDEX idx_expenses_date ON expenses(expense_date DESC);

CREATE TABLE payroll_payments (
    id UUID PRIMARY KEY,
    employee_id UUID NOT NULL REFERENCES employees(id),
    amount NUMERIC(14, 2) NOT NULL,
    concept VARCHAR(200) NOT NULL,
    period_start DATE NOT NULL,
    period_end DATE NOT NULL,
    payment_method VARCHAR(32),
    voucher VARCHAR(64),
    operator_id UUID NOT NULL REFERENCES operators(id),
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_payroll_payments_amount CHECK (amount > 0),
    CONSTRAINT chk_payroll_payments_period CHECK (period_end >= period_start)
);

CREATE INDEX idx_payroll_payments_employee ON payroll_payments(employee_id, period_start DESC);
";
