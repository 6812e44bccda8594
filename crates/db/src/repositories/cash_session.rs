//! Cash session repository: open, close, history and summaries.
//!
//! Opening is serialized by the partial unique index on open sessions;
//! closing locks the session row and folds its movements in the same
//! transaction that writes the reconciliation.

use chrono::Utc;
use kasa_core::ledger::{CategoryTotal, LedgerService, SessionBalance, summarize_by_category};
use kasa_core::reconciliation::{CashCount, Denomination, ReconciliationError};
use kasa_core::session::{
    CloseOutcome, CloseSessionInput, OpenSessionInput, SessionError, SessionService,
    SessionSnapshot,
};
use kasa_shared::ReconciliationMode;
use kasa_shared::types::{CashCountId, CashSessionId, PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::posting::{balance_line, insert_movement};
use crate::entities::{
    cash_counts, cash_sessions, movements, operators, sea_orm_active_enums::SessionStatus,
};
use crate::error::RepositoryError;

/// A session together with its cash count, if one was taken.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    /// The session row.
    pub session: cash_sessions::Model,
    /// Arqueo recorded at close.
    pub count: Option<cash_counts::Model>,
}

/// Result of closing a session.
#[derive(Debug, Clone, Serialize)]
pub struct ClosedSession {
    /// The closed session row.
    pub session: cash_sessions::Model,
    /// Arqueo recorded at close.
    pub count: Option<cash_counts::Model>,
    /// Balance and reconciliation report.
    pub outcome: CloseOutcome,
}

/// Running totals of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Session id.
    pub session_id: Uuid,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// Balance folded from the session's movements.
    pub balance: SessionBalance,
    /// Expected cash: live for open sessions, as stored for closed ones.
    pub expected: Decimal,
    /// Totals per category and direction.
    pub by_category: Vec<CategoryTotal>,
}

/// Filters for session history.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Only this operator's sessions.
    pub operator_id: Option<Uuid>,
    /// Only sessions in this state.
    pub status: Option<SessionStatus>,
}

/// Cash session repository.
#[derive(Debug, Clone)]
pub struct CashSessionRepository {
    db: DatabaseConnection,
    mode: ReconciliationMode,
}

impl CashSessionRepository {
    /// Creates a new cash session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, mode: ReconciliationMode) -> Self {
        Self { db, mode }
    }

    /// Opens a session for the operator and posts its opening float.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen` when the partial unique index on open sessions
    /// rejects the insert, whether the other session is old or a concurrent
    /// open that won the race.
    pub async fn open(
        &self,
        input: OpenSessionInput,
    ) -> Result<cash_sessions::Model, RepositoryError> {
        SessionService::validate_opening(&input)?;
        let operator_id = input.operator_id;

        let txn = self.db.begin().await?;
        match Self::insert_open_session(&txn, input).await {
            Ok(session) => {
                txn.commit().await?;
                info!(
                    session_id = %session.id,
                    operator_id = %operator_id,
                    opening_amount = %session.opening_amount,
                    "Cash session opened"
                );
                Ok(session)
            }
            Err(err) if err.is_duplicate_key() => {
                Err(SessionError::AlreadyOpen { operator_id }.into())
            }
            Err(err) => Err(err),
        }
    }

    async fn insert_open_session(
        txn: &DatabaseTransaction,
        input: OpenSessionInput,
    ) -> Result<cash_sessions::Model, RepositoryError> {
        operators::Entity::find_by_id(input.operator_id)
            .one(txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("operator", input.operator_id))?;

        // uq_cash_sessions_open_operator is the only guard: a second open row
        // fails the insert, racing or not.
        let now = Utc::now();
        let session = cash_sessions::ActiveModel {
            id: Set(CashSessionId::new().into_inner()),
            operator_id: Set(input.operator_id),
            opening_amount: Set(input.opening_amount),
            opened_at: Set(now),
            closed_at: Set(None),
            expected_amount: Set(None),
            declared_amount: Set(None),
            variance: Set(None),
            notes: Set(input.notes.filter(|n| !n.trim().is_empty())),
            closing_notes: Set(None),
            status: Set(SessionStatus::Open),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        if let Some(opening) =
            SessionService::opening_movement(session.id, session.operator_id, session.opening_amount)
        {
            let draft = LedgerService::prepare(&opening)?;
            insert_movement(txn, draft, false).await?;
        }

        Ok(session)
    }

    /// Returns the operator's open session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_active(
        &self,
        operator_id: Uuid,
    ) -> Result<Option<cash_sessions::Model>, RepositoryError> {
        Ok(cash_sessions::Entity::find()
            .filter(cash_sessions::Column::OperatorId.eq(operator_id))
            .filter(cash_sessions::Column::Status.eq(SessionStatus::Open))
            .one(&self.db)
            .await?)
    }

    /// Closes the operator's open session.
    ///
    /// Expected cash is folded from exactly the movements attached to the
    /// session while its row is locked. In strict mode a cash count that
    /// disagrees with the declared amount aborts the close; otherwise the
    /// difference is stored with the arqueo.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenSession`, a validation error, or `CountMismatch` in
    /// strict mode.
    pub async fn close(&self, input: CloseSessionInput) -> Result<ClosedSession, RepositoryError> {
        let txn = self.db.begin().await?;

        let session = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::OperatorId.eq(input.operator_id))
            .filter(cash_sessions::Column::Status.eq(SessionStatus::Open))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(SessionError::NoOpenSession {
                operator_id: input.operator_id,
            })?;

        let lines = movements::Entity::find()
            .filter(movements::Column::SessionId.eq(session.id))
            .all(&txn)
            .await?
            .iter()
            .map(balance_line)
            .collect::<Result<Vec<_>, _>>()?;

        let snapshot = SessionSnapshot {
            id: session.id,
            operator_id: session.operator_id,
            opening_amount: session.opening_amount,
            status: session.status.into(),
        };
        let outcome = SessionService::close(&snapshot, &lines, &input, self.mode)?;

        let now = Utc::now();
        let session_id = session.id;
        let mut active: cash_sessions::ActiveModel = session.into();
        active.status = Set(SessionStatus::Closed);
        active.closed_at = Set(Some(now));
        active.expected_amount = Set(Some(outcome.expected()));
        active.declared_amount = Set(Some(input.declared_amount));
        active.variance = Set(Some(outcome.variance()));
        active.closing_notes = Set(input.notes.clone().filter(|n| !n.trim().is_empty()));
        active.updated_at = Set(now);
        let session = active.update(&txn).await?;

        let count = match &input.count {
            Some(count) => Some(Self::insert_count(&txn, session_id, count, &outcome).await?),
            None => None,
        };

        txn.commit().await?;

        if outcome.reconciliation.has_count_mismatch() {
            warn!(
                session_id = %session_id,
                declared = %input.declared_amount,
                counted = ?outcome.reconciliation.counted,
                difference = ?outcome.reconciliation.count_difference,
                "Cash count disagrees with declared amount, recorded on close"
            );
        }
        info!(
            session_id = %session_id,
            operator_id = %input.operator_id,
            expected = %outcome.expected(),
            variance = %outcome.variance(),
            "Cash session closed"
        );

        Ok(ClosedSession {
            session,
            count,
            outcome,
        })
    }

    async fn insert_count(
        txn: &DatabaseTransaction,
        session_id: Uuid,
        count: &CashCount,
        outcome: &CloseOutcome,
    ) -> Result<cash_counts::Model, RepositoryError> {
        let pieces = |denomination: Denomination| -> Result<i32, ReconciliationError> {
            let n = count.count(denomination);
            i32::try_from(n).map_err(|_| ReconciliationError::InvalidCount {
                denomination: denomination.label().to_string(),
                count: i64::from(n),
            })
        };
        let total = outcome.reconciliation.counted.unwrap_or_else(|| count.total());
        let declared = outcome.reconciliation.declared;

        let row = cash_counts::ActiveModel {
            id: Set(CashCountId::new().into_inner()),
            session_id: Set(session_id),
            denomination_table: Set(count.table().version().to_string()),
            bills_200: Set(pieces(Denomination::Bill200)?),
            bills_100: Set(pieces(Denomination::Bill100)?),
            bills_50: Set(pieces(Denomination::Bill50)?),
            bills_20: Set(pieces(Denomination::Bill20)?),
            bills_10: Set(pieces(Denomination::Bill10)?),
            coins_5: Set(pieces(Denomination::Coin5)?),
            coins_2: Set(pieces(Denomination::Coin2)?),
            coins_1: Set(pieces(Denomination::Coin1)?),
            coins_0_50: Set(pieces(Denomination::Coin050)?),
            coins_0_20: Set(pieces(Denomination::Coin020)?),
            coins_0_10: Set(pieces(Denomination::Coin010)?),
            total: Set(total),
            declared_amount: Set(declared),
            count_difference: Set(outcome
                .reconciliation
                .count_difference
                .unwrap_or(total - declared)),
            created_at: Set(Utc::now()),
        };

        Ok(row.insert(txn).await?)
    }

    /// Gets a session with its arqueo.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    pub async fn get(&self, session_id: Uuid) -> Result<SessionDetail, RepositoryError> {
        let session = cash_sessions::Entity::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("cash session", session_id))?;
        let count = cash_counts::Entity::find()
            .filter(cash_counts::Column::SessionId.eq(session_id))
            .one(&self.db)
            .await?;
        Ok(SessionDetail { session, count })
    }

    /// Lists sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: SessionFilter,
        page: PageRequest,
    ) -> Result<PageResponse<cash_sessions::Model>, RepositoryError> {
        let mut query = cash_sessions::Entity::find();
        if let Some(operator_id) = filter.operator_id {
            query = query.filter(cash_sessions::Column::OperatorId.eq(operator_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(cash_sessions::Column::Status.eq(status));
        }

        let total = query.clone().count(&self.db).await?;
        let sessions = query
            .order_by_desc(cash_sessions::Column::OpenedAt)
            .order_by_desc(cash_sessions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(sessions, page.page, page.per_page, total))
    }

    /// Summarizes a session's movements.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    pub async fn summary(&self, session_id: Uuid) -> Result<SessionSummary, RepositoryError> {
        let session = cash_sessions::Entity::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("cash session", session_id))?;

        let lines = movements::Entity::find()
            .filter(movements::Column::SessionId.eq(session_id))
            .all(&self.db)
            .await?
            .iter()
            .map(balance_line)
            .collect::<Result<Vec<_>, _>>()?;

        let balance = SessionBalance::compute(session.opening_amount, &lines);
        let expected = match session.status {
            SessionStatus::Open => balance.expected(),
            SessionStatus::Closed => session
                .expected_amount
                .unwrap_or_else(|| balance.expected()),
        };

        Ok(SessionSummary {
            session_id,
            status: session.status,
            balance,
            expected,
            by_category: summarize_by_category(&lines),
        })
    }
}
