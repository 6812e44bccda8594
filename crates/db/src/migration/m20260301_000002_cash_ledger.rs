//! Cash ledger migration.
//!
//! Creates cash sessions, the movement ledger and cash counts.
//!
//! Two partial unique indexes carry the ledger's concurrency guarantees:
//! - at most one open session per operator
//! - at most one movement per `(source_kind, source_id)` pair

use sea_orm_migration::prelude::*;

use super::ddl;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(&ddl(manager, CASH_SESSIONS_SQL)).await?;
        db.execute_unprepared(&ddl(manager, MOVEMENTS_SQL)).await?;
        db.execute_unprepared(&ddl(manager, CASH_COUNTS_SQL)).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS cash_counts;
DROP TABLE IF EXISTS movements;
DROP TABLE IF EXISTS cash_sessions;
",
        )
        .await?;
        Ok(())
    }
}

const CASH_SESSIONS_SQL: &str = r"
CREATE TABLE cash_sessions (
    id UUID PRIMARY KEY,
    operator_id UUID NOT NULL REFERENCES operators(id),
    opening_amount NUMERIC(14, 2) NOT NULL,
    opened_at TIMESTAMPTZ NOT NULL,
    closed_at TIMESTAMPTZ,
    expected_amount NUMERIC(14, 2),
    declared_amount NUMERIC(14, 2),
    variance NUMERIC(14, 2),
    notes TEXT,
    closing_notes TEXT,
    status VARCHAR(16) NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_cash_sessions_status CHECK (status IN ('open', 'closed')),
    CONSTRAINT chk_cash_sessions_opening CHECK (opening_amount >= 0),
    CONSTRAINT chk_cash_sessions_declared CHECK (declared_amount IS NULL OR declared_amount >= 0),
    CONSTRAINT chk_cash_sessions_closed CHECK (
        (status = 'open' AND closed_at IS NULL)
        OR (status = 'closed' AND closed_at IS NOT NULL AND expected_amount IS NOT NULL)
    )
);

-- Exclusivity: one open drawer per operator
CREATE UNIQUE INDEX uq_cash_sessions_open_operator ON cash_sessions(operator_id) WHERE status = 'open';

-- Session history per operator
CREATE INDEX idx_cash_sessions_operator ON cash_sessions(operator_id, opened_at DESC);
";

const MOVEMENTS_SQL: &str = r"
CREATE TABLE movements (
    id UUID PRIMARY KEY,
    direction VARCHAR(8) NOT NULL,
    category VARCHAR(64) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    description VARCHAR(500) NOT NULL,
    occurred_at TIMESTAMPTZ NOT NULL,
    operator_id UUID NOT NULL REFERENCES operators(id),
    session_id UUID REFERENCES cash_sessions(id),
    source_kind VARCHAR(32),
    source_id UUID,
    payment_method VARCHAR(32),
    voucher VARCHAR(64),
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_movements_direction CHECK (direction IN ('inflow', 'outflow')),
    CONSTRAINT chk_movements_amount CHECK (amount > 0),
    CONSTRAINT chk_movements_source CHECK ((source_kind IS NULL) = (source_id IS NULL))
);

-- Idempotency: a business event posts at most one movement
CREATE UNIQUE INDEX uq_movements_source ON movements(source_kind, source_id) WHERE source_id IS NOT NULL;

-- Balance folding at close
CREATE INDEX idx_movements_session ON movements(session_id);

-- Query ordering
CREATE INDEX idx_movements_occurred ON movements(occurred_at DESC, id DESC);
CREATE INDEX idx_movements_operator ON movements(operator_id, occurred_at DESC);
CREATE INDEX idx_movements_voucher ON movements(voucher) WHERE voucher IS NOT NULL;
";

const CASH_COUNTS_SQL: &str = r"
-- Arqueo: physical count taken when a session closes
CREATE TABLE cash_counts (
    id UUID PRIMARY KEY,
    session_id UUID NOT NULL REFERENCES cash_sessions(id),
    denomination_table VARCHAR(8) NOT NULL,
    bills_200 INTEGER NOT NULL,
    bills_100 INTEGER NOT NULL,
    bills_50 INTEGER NOT NULL,
    bills_20 INTEGER NOT NULL,
    bills_10 INTEGER NOT NULL,
    coins_5 INTEGER NOT NULL,
    coins_2 INTEGER NOT NULL,
    coins_1 INTEGER NOT NULL,
    coins_0_50 INTEGER NOT NULL,
    coins_0_20 INTEGER NOT NULL,
    coins_0_10 INTEGER NOT NULL,
    total NUMERIC(14, 2) NOT NULL,
    declared_amount NUMERIC(14, 2) NOT NULL,
    count_difference NUMERIC(14, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_cash_counts_non_negative CHECK (
        bills_200 >= 0 AND bills_100 >= 0 AND bills_50 >= 0 AND bills_20 >= 0 AND bills_10 >= 0
        AND coins_5 >= 0 AND coins_2 >= 0 AND coins_1 >= 0
        AND coins_0_50 >= 0 AND coins_0_20 >= 0 AND coins_0_10 >= 0
    )
);

CREATE UNIQUE INDEX uq_cash_counts_session ON cash_counts(session_id);
";
