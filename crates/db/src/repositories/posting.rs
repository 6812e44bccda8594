//! Movement posting shared by every repository that writes to the ledger.
//!
//! All helpers take the caller's open transaction: a movement is always
//! written in the same unit of work as the record that owns it.

use chrono::Utc;
use kasa_core::disbursement::DisbursementError;
use kasa_core::ledger::{BalanceLine, MovementCategory, MovementDraft, SourceKind};
use kasa_core::session::{SessionError, SessionService};
use kasa_shared::types::{MovementId, round_money};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{
    cash_sessions, movements,
    sea_orm_active_enums::{MovementDirection, SessionStatus},
};
use crate::error::RepositoryError;

/// Inserts a validated movement, attaching it to a session first.
///
/// An explicit session must exist, be open and belong to the posting
/// operator. Without one, the operator's
/// open session is resolved under a shared lock so a concurrent close either
/// sees this movement or runs before it.
pub(crate) async fn insert_movement(
    txn: &DatabaseTransaction,
    draft: MovementDraft,
    allow_unassigned: bool,
) -> Result<movements::Model, RepositoryError> {
    let session_id = resolve_session(txn, &draft, allow_unassigned).await?;
    let now = Utc::now();
    let (source_kind, source_id) = match draft.source {
        Some(source) => (Some(source.kind.as_str().to_string()), Some(source.id)),
        None => (None, None),
    };

    let movement = movements::ActiveModel {
        id: Set(MovementId::new().into_inner()),
        direction: Set(MovementDirection::from(draft.direction)),
        category: Set(draft.category.as_tag()),
        amount: Set(draft.amount),
        description: Set(draft.description),
        occurred_at: Set(now),
        operator_id: Set(draft.operator_id),
        session_id: Set(session_id),
        source_kind: Set(source_kind),
        source_id: Set(source_id),
        payment_method: Set(draft.payment_method),
        voucher: Set(draft.voucher),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(movement.insert(txn).await?)
}

async fn resolve_session(
    txn: &DatabaseTransaction,
    draft: &MovementDraft,
    allow_unassigned: bool,
) -> Result<Option<Uuid>, RepositoryError> {
    if let Some(session_id) = draft.session_id {
        let session = cash_sessions::Entity::find_by_id(session_id)
            .lock_shared()
            .one(txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("cash session", session_id))?;
        SessionService::ensure_open(session.id, session.status.into())?;
        if session.operator_id != draft.operator_id {
            return Err(SessionError::ForeignSession {
                session_id: session.id,
                operator_id: draft.operator_id,
            }
            .into());
        }
        return Ok(Some(session.id));
    }

    let open = cash_sessions::Entity::find()
        .filter(cash_sessions::Column::OperatorId.eq(draft.operator_id))
        .filter(cash_sessions::Column::Status.eq(SessionStatus::Open))
        .lock_shared()
        .one(txn)
        .await?;

    match open {
        Some(session) => {
            debug!(
                operator_id = %draft.operator_id,
                session_id = %session.id,
                "Attached movement to open session"
            );
            Ok(Some(session.id))
        }
        None if allow_unassigned => {
            debug!(operator_id = %draft.operator_id, "No open session, movement left unassigned");
            Ok(None)
        }
        None => Err(RepositoryError::UnassignedNotAllowed {
            operator_id: draft.operator_id,
        }),
    }
}

/// Finds the movement owned by a record and locks it for a correction.
///
/// Fails with `RecordInClosedSession` when the movement was already folded
/// into a closed session's balance, and with `RecordReversed` when an
/// annulment points at it: rewriting or dropping the original would leave
/// the annulment unbalanced.
pub(crate) async fn owned_movement_for_correction(
    txn: &DatabaseTransaction,
    kind: &SourceKind,
    record_id: Uuid,
) -> Result<movements::Model, RepositoryError> {
    let movement = movements::Entity::find()
        .filter(movements::Column::SourceKind.eq(kind.as_str()))
        .filter(movements::Column::SourceId.eq(record_id))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| {
            RepositoryError::Corrupt(format!("{kind} record {record_id} has no linked movement"))
        })?;

    let annulment = movements::Entity::find()
        .filter(movements::Column::SourceKind.eq(SourceKind::Movement.as_str()))
        .filter(movements::Column::SourceId.eq(movement.id))
        .one(txn)
        .await?;
    if annulment.is_some() {
        return Err(DisbursementError::RecordReversed {
            record_id,
            movement_id: movement.id,
        }
        .into());
    }

    if let Some(session_id) = movement.session_id {
        let session = cash_sessions::Entity::find_by_id(session_id)
            .lock_shared()
            .one(txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("cash session", session_id))?;
        if session.status == SessionStatus::Closed {
            return Err(DisbursementError::RecordInClosedSession {
                record_id,
                session_id,
            }
            .into());
        }
    }

    Ok(movement)
}

/// Rewrites an owned movement from the record's corrected draft.
///
/// Direction, category, session and source never change.
pub(crate) async fn sync_movement(
    txn: &DatabaseTransaction,
    movement: movements::Model,
    draft: MovementDraft,
) -> Result<movements::Model, RepositoryError> {
    let mut active: movements::ActiveModel = movement.into();
    active.amount = Set(draft.amount);
    active.description = Set(draft.description);
    active.payment_method = Set(draft.payment_method);
    active.voucher = Set(draft.voucher);
    active.updated_at = Set(Utc::now());
    Ok(active.update(txn).await?)
}

/// Maps a stored movement to the line the balance fold consumes.
pub(crate) fn balance_line(movement: &movements::Model) -> Result<BalanceLine, RepositoryError> {
    let category = MovementCategory::parse(&movement.category).map_err(|_| {
        RepositoryError::Corrupt(format!(
            "movement {} has category {:?}",
            movement.id, movement.category
        ))
    })?;
    Ok(BalanceLine {
        direction: movement.direction.into(),
        category,
        amount: round_money(movement.amount),
    })
}
