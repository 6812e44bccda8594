//! Expense repository.
//!
//! An expense owns exactly one EXPENSE outflow. Creating, correcting or
//! deleting the expense writes the movement in the same transaction.

use chrono::{NaiveDate, Utc};
use kasa_core::disbursement::{ExpenseDetails, ExpenseUpdate, LedgerLinked, linked_movement};
use kasa_shared::LedgerConfig;
use kasa_shared::types::{ExpenseId, PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::posting::{insert_movement, owned_movement_for_correction, sync_movement};
use crate::entities::{expense_categories, expenses, movements};
use crate::error::RepositoryError;

/// An expense with its linked movement.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseRecord {
    /// The expense row.
    pub expense: expenses::Model,
    /// Its EXPENSE outflow.
    pub movement: movements::Model,
}

/// Filters for expense listings.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Only this category.
    pub category_id: Option<Uuid>,
    /// Expense date on or after.
    pub from: Option<NaiveDate>,
    /// Expense date on or before.
    pub to: Option<NaiveDate>,
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
    allow_unassigned: bool,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, ledger: &LedgerConfig) -> Self {
        Self {
            db,
            allow_unassigned: ledger.allow_unassigned_movements,
        }
    }

    /// Records an expense and posts its outflow.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `NotFound` for an unknown category, or
    /// any posting error.
    pub async fn create(
        &self,
        details: ExpenseDetails,
        operator_id: Uuid,
    ) -> Result<ExpenseRecord, RepositoryError> {
        let expense_id = ExpenseId::new().into_inner();
        let draft = linked_movement(&details, expense_id, operator_id)?;

        let txn = self.db.begin().await?;
        ensure_category(&txn, details.category_id).await?;

        let now = Utc::now();
        let expense = expenses::ActiveModel {
            id: Set(expense_id),
            category_id: Set(details.category_id),
            amount: Set(draft.amount),
            description: Set(draft.description.clone()),
            expense_date: Set(details.expense_date),
            payment_method: Set(draft.payment_method.clone()),
            voucher: Set(draft.voucher.clone()),
            operator_id: Set(operator_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let movement = insert_movement(&txn, draft, self.allow_unassigned).await?;
        txn.commit().await?;

        info!(
            expense_id = %expense.id,
            movement_id = %movement.id,
            operator_id = %operator_id,
            amount = %expense.amount,
            "Expense recorded"
        );
        Ok(ExpenseRecord { expense, movement })
    }

    /// Gets an expense by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the expense does not exist.
    pub async fn get(&self, expense_id: Uuid) -> Result<expenses::Model, RepositoryError> {
        find_expense(&self.db, expense_id).await
    }

    /// Lists expenses, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: ExpenseFilter,
        page: PageRequest,
    ) -> Result<PageResponse<expenses::Model>, RepositoryError> {
        let mut query = expenses::Entity::find();
        if let Some(category_id) = filter.category_id {
            query = query.filter(expenses::Column::CategoryId.eq(category_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(expenses::Column::ExpenseDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(expenses::Column::ExpenseDate.lte(to));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(rows, page.page, page.per_page, total))
    }

    /// Corrects an expense and its movement together.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a validation error, or `RecordInClosedSession`
    /// when the movement already belongs to a closed session.
    pub async fn update(
        &self,
        expense_id: Uuid,
        update: ExpenseUpdate,
    ) -> Result<ExpenseRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let expense = expenses::Entity::find_by_id(expense_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("expense", expense_id))?;
        let corrected = update.apply_to(&details_of(&expense));
        if corrected.category_id != expense.category_id {
            ensure_category(&txn, corrected.category_id).await?;
        }
        let draft = linked_movement(&corrected, expense_id, expense.operator_id)?;
        let movement =
            owned_movement_for_correction(&txn, &ExpenseDetails::source_kind(), expense_id).await?;

        let mut active: expenses::ActiveModel = expense.into();
        active.category_id = Set(corrected.category_id);
        active.amount = Set(draft.amount);
        active.description = Set(draft.description.clone());
        active.expense_date = Set(corrected.expense_date);
        active.payment_method = Set(draft.payment_method.clone());
        active.voucher = Set(draft.voucher.clone());
        active.updated_at = Set(Utc::now());
        let expense = active.update(&txn).await?;

        let movement = sync_movement(&txn, movement, draft).await?;
        txn.commit().await?;

        info!(
            expense_id = %expense_id,
            movement_id = %movement.id,
            amount = %expense.amount,
            "Expense updated"
        );
        Ok(ExpenseRecord { expense, movement })
    }

    /// Deletes an expense and its movement.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `RecordInClosedSession`.
    pub async fn delete(&self, expense_id: Uuid) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let expense = expenses::Entity::find_by_id(expense_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("expense", expense_id))?;
        let movement =
            owned_movement_for_correction(&txn, &ExpenseDetails::source_kind(), expense_id).await?;
        let movement_id = movement.id;

        movement.delete(&txn).await?;
        expense.delete(&txn).await?;
        txn.commit().await?;

        info!(expense_id = %expense_id, movement_id = %movement_id, "Expense deleted");
        Ok(())
    }
}

fn details_of(expense: &expenses::Model) -> ExpenseDetails {
    ExpenseDetails {
        category_id: expense.category_id,
        amount: expense.amount,
        description: expense.description.clone(),
        expense_date: expense.expense_date,
        payment_method: expense.payment_method.clone(),
        voucher: expense.voucher.clone(),
    }
}

async fn find_expense<C: ConnectionTrait>(
    conn: &C,
    expense_id: Uuid,
) -> Result<expenses::Model, RepositoryError> {
    expenses::Entity::find_by_id(expense_id)
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("expense", expense_id))
}

async fn ensure_category<C: ConnectionTrait>(
    conn: &C,
    category_id: Uuid,
) -> Result<(), RepositoryError> {
    expense_categories::Entity::find_by_id(category_id)
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("expense category", category_id))?;
    Ok(())
}
