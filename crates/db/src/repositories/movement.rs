//! Movement repository: posting, querying and reversing ledger movements.

use kasa_core::ledger::{
    LedgerService, MovementCategory, MovementFilter, PostMovementInput, ReversalService,
    ReversibleMovement, SourceKind,
};
use kasa_shared::LedgerConfig;
use kasa_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::posting::insert_movement;
use crate::entities::{movements, sea_orm_active_enums::MovementDirection};
use crate::error::RepositoryError;

/// Movement repository.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
    allow_unassigned: bool,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, ledger: &LedgerConfig) -> Self {
        Self {
            db,
            allow_unassigned: ledger.allow_unassigned_movements,
        }
    }

    /// Posts a movement on behalf of another module.
    ///
    /// Without an explicit session the operator's open session is attached;
    /// with none open the movement is left unassigned when allowed.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `SessionClosed` for an explicit closed
    /// session, `UnassignedNotAllowed`, or a duplicate-key integrity error
    /// when the source was already posted.
    pub async fn post(&self, input: PostMovementInput) -> Result<movements::Model, RepositoryError> {
        let draft = LedgerService::prepare_external(&input)?;

        let txn = self.db.begin().await?;
        let movement = insert_movement(&txn, draft, self.allow_unassigned).await?;
        txn.commit().await?;

        info!(
            movement_id = %movement.id,
            operator_id = %movement.operator_id,
            session_id = ?movement.session_id,
            direction = ?movement.direction,
            amount = %movement.amount,
            "Movement posted"
        );
        Ok(movement)
    }

    /// Gets a movement by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the movement does not exist.
    pub async fn get(&self, movement_id: Uuid) -> Result<movements::Model, RepositoryError> {
        movements::Entity::find_by_id(movement_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("movement", movement_id))
    }

    /// Queries movements, newest first.
    ///
    /// Ties on the timestamp are broken by id so offset pagination is
    /// restartable.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn query(
        &self,
        filter: MovementFilter,
        page: PageRequest,
    ) -> Result<PageResponse<movements::Model>, RepositoryError> {
        let mut query = movements::Entity::find();

        if let Some(session_id) = filter.session_id {
            query = query.filter(movements::Column::SessionId.eq(session_id));
        }
        if filter.unassigned_only {
            query = query.filter(movements::Column::SessionId.is_null());
        }
        if let Some(operator_id) = filter.operator_id {
            query = query.filter(movements::Column::OperatorId.eq(operator_id));
        }
        if let Some(range) = filter.date_range {
            query = query
                .filter(movements::Column::OccurredAt.gte(range.from))
                .filter(movements::Column::OccurredAt.lt(range.to));
        }
        if let Some(category) = filter.category {
            query = query.filter(movements::Column::Category.eq(category.as_tag()));
        }
        if let Some(direction) = filter.direction {
            query = query.filter(movements::Column::Direction.eq(MovementDirection::from(direction)));
        }
        if let Some(voucher) = filter.voucher {
            query = query.filter(movements::Column::Voucher.eq(voucher));
        }

        let total = query.clone().count(&self.db).await?;
        let movements = query
            .order_by_desc(movements::Column::OccurredAt)
            .order_by_desc(movements::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(movements, page.page, page.per_page, total))
    }

    /// Posts the annulment of a movement.
    ///
    /// The annulment lands in the reversing operator's open session, or
    /// unassigned, never in the original's session once it is closed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyReversed`, or `CannotReverseAnnulment` /
    /// `CannotReverseSessionOpening`.
    pub async fn reverse(
        &self,
        movement_id: Uuid,
        operator_id: Uuid,
        reason: Option<&str>,
    ) -> Result<movements::Model, RepositoryError> {
        let txn = self.db.begin().await?;

        let original = movements::Entity::find_by_id(movement_id)
            .lock_shared()
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("movement", movement_id))?;

        let category = MovementCategory::parse(&original.category).map_err(|_| {
            RepositoryError::Corrupt(format!(
                "movement {} has category {:?}",
                original.id, original.category
            ))
        })?;
        let reversible = ReversibleMovement {
            id: original.id,
            direction: original.direction.into(),
            category,
            amount: original.amount,
            payment_method: original.payment_method.clone(),
            voucher: original.voucher.clone(),
        };
        let annulment = ReversalService::annulment_for(&reversible, operator_id, reason)?;
        let draft = LedgerService::prepare(&annulment)?;

        let existing = movements::Entity::find()
            .filter(movements::Column::SourceKind.eq(SourceKind::Movement.as_str()))
            .filter(movements::Column::SourceId.eq(movement_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(RepositoryError::AlreadyReversed(movement_id));
        }

        let annulment = match insert_movement(&txn, draft, self.allow_unassigned).await {
            Ok(movement) => movement,
            Err(err) if err.is_duplicate_key() => {
                return Err(RepositoryError::AlreadyReversed(movement_id));
            }
            Err(err) => return Err(err),
        };
        txn.commit().await?;

        info!(
            movement_id = %annulment.id,
            reversed_id = %movement_id,
            operator_id = %operator_id,
            amount = %annulment.amount,
            "Movement reversed"
        );
        Ok(annulment)
    }
}
