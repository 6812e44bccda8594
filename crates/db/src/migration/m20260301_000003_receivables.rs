//! Receivables migration: payment plans and installment payments.

use sea_orm_migration::prelude::*;

use super::ddl;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(&ddl(manager, RECEIVABLES_SQL)).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS installment_payments;
DROP TABLE IF EXISTS payment_plans;
",
        )
        .await?;
        Ok(())
    }
}

const RECEIVABLES_SQL: &str = r"
CREATE TABLE payment_plans (
    id UUID PRIMARY KEY,
    debtor_id UUID NOT NULL REFERENCES debtors(id),
    total_amount NUMERIC(14, 2) NOT NULL,
    paid_amount NUMERIC(14, 2) NOT NULL,
    pending_amount NUMERIC(14, 2) NOT NULL,
    issue_date DATE NOT NULL,
    due_date DATE NOT NULL,
    status VARCHAR(16) NOT NULL,
    notes TEXT,
    origin_kind VARCHAR(32),
    origin_id UUID,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_payment_plans_status CHECK (status IN ('pending', 'partial', 'paid')),
    CONSTRAINT chk_payment_plans_total CHECK (total_amount > 0),
    CONSTRAINT chk_payment_plans_paid CHECK (paid_amount >= 0 AND pending_amount >= 0),
    CONSTRAINT chk_payment_plans_dates CHECK (due_date >= issue_date)
);

CREATE INDEX idx_payment_plans_debtor_open ON payment_plans(debtor_id, due_date) WHERE status <> 'paid';

-- No ON DELETE CASCADE: a plan with payments can never be deleted
CREATE TABLE installment_payments (
    id UUID PRIMARY KEY,
    plan_id UUID NOT NULL REFERENCES payment_plans(id),
    amount NUMERIC(14, 2) NOT NULL,
    payment_method VARCHAR(32) NOT NULL,
    reference VARCHAR(64),
    operator_id UUID NOT NULL REFERENCES operators(id),
    paid_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_installment_payments_amount CHECK (amount > 0)
);

-- A voucher is accepted once per plan
CREATE UNIQUE INDEX uq_installment_payments_reference ON installment_payments(plan_id, reference) WHERE reference IS NOT NULL;
CREATE INDEX idx_installment_payments_plan ON installment_payments(plan_id, paid_at);
";
