//! Payroll repository.
//!
//! Same ownership model as expenses: each payroll payment owns one PAYROLL
//! outflow written in the same transaction.

use chrono::Utc;
use kasa_core::disbursement::{LedgerLinked, PayrollDetails, PayrollUpdate, linked_movement};
use kasa_shared::LedgerConfig;
use kasa_shared::types::{PageRequest, PageResponse, PayrollPaymentId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::posting::{insert_movement, owned_movement_for_correction, sync_movement};
use crate::entities::{employees, movements, payroll_payments};
use crate::error::RepositoryError;

/// A payroll payment with its linked movement.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollRecord {
    /// The payroll row.
    pub payment: payroll_payments::Model,
    /// Its PAYROLL outflow.
    pub movement: movements::Model,
}

/// Payroll repository.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    db: DatabaseConnection,
    allow_unassigned: bool,
}

impl PayrollRepository {
    /// Creates a new payroll repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, ledger: &LedgerConfig) -> Self {
        Self {
            db,
            allow_unassigned: ledger.allow_unassigned_movements,
        }
    }

    /// Records a payroll payment and posts its outflow.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `NotFound` for an unknown employee, or
    /// any posting error.
    pub async fn create(
        &self,
        details: PayrollDetails,
        operator_id: Uuid,
    ) -> Result<PayrollRecord, RepositoryError> {
        let payment_id = PayrollPaymentId::new().into_inner();
        let draft = linked_movement(&details, payment_id, operator_id)?;

        let txn = self.db.begin().await?;
        employees::Entity::find_by_id(details.employee_id)
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("employee", details.employee_id))?;

        let now = Utc::now();
        let payment = payroll_payments::ActiveModel {
            id: Set(payment_id),
            employee_id: Set(details.employee_id),
            amount: Set(details.amount),
            concept: Set(details.concept.trim().to_string()),
            period_start: Set(details.period_start),
            period_end: Set(details.period_end),
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
            payroll_id = %payment.id,
            employee_id = %payment.employee_id,
            movement_id = %movement.id,
            amount = %payment.amount,
            "Payroll payment recorded"
        );
        Ok(PayrollRecord { payment, movement })
    }

    /// Gets a payroll payment by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the payment does not exist.
    pub async fn get(&self, payment_id: Uuid) -> Result<payroll_payments::Model, RepositoryError> {
        payroll_payments::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("payroll payment", payment_id))
    }

    /// Lists payroll payments, latest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        employee_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<PageResponse<payroll_payments::Model>, RepositoryError> {
        let mut query = payroll_payments::Entity::find();
        if let Some(employee_id) = employee_id {
            query = query.filter(payroll_payments::Column::EmployeeId.eq(employee_id));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(payroll_payments::Column::PeriodStart)
            .order_by_desc(payroll_payments::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(rows, page.page, page.per_page, total))
    }

    /// Corrects a payroll payment and its movement together.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a validation error, or `RecordInClosedSession`.
    pub async fn update(
        &self,
        payment_id: Uuid,
        update: PayrollUpdate,
    ) -> Result<PayrollRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let payment = payroll_payments::Entity::find_by_id(payment_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("payroll payment", payment_id))?;
        let corrected = update.apply_to(&details_of(&payment));
        let draft = linked_movement(&corrected, payment_id, payment.operator_id)?;
        let movement =
            owned_movement_for_correction(&txn, &PayrollDetails::source_kind(), payment_id)
                .await?;

        let mut active: payroll_payments::ActiveModel = payment.into();
        active.amount = Set(corrected.amount);
        active.concept = Set(corrected.concept.trim().to_string());
        active.period_start = Set(corrected.period_start);
        active.period_end = Set(corrected.period_end);
        active.payment_method = Set(draft.payment_method.clone());
        active.voucher = Set(draft.voucher.clone());
        active.updated_at = Set(Utc::now());
        let payment = active.update(&txn).await?;

        let movement = sync_movement(&txn, movement, draft).await?;
        txn.commit().await?;

        info!(
            payroll_id = %payment_id,
            movement_id = %movement.id,
            amount = %payment.amount,
            "Payroll payment updated"
        );
        Ok(PayrollRecord { payment, movement })
    }

    /// Deletes a payroll payment and its movement.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `RecordInClosedSession`.
    pub async fn delete(&self, payment_id: Uuid) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let payment = payroll_payments::Entity::find_by_id(payment_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("payroll payment", payment_id))?;
        let movement =
            owned_movement_for_correction(&txn, &PayrollDetails::source_kind(), payment_id)
                .await?;
        let movement_id = movement.id;

        movement.delete(&txn).await?;
        payment.delete(&txn).await?;
        txn.commit().await?;

        info!(payroll_id = %payment_id, movement_id = %movement_id, "Payroll payment deleted");
        Ok(())
    }
}

fn details_of(payment: &payroll_payments::Model) -> PayrollDetails {
    PayrollDetails {
        employee_id: payment.employee_id,
        amount: payment.amount,
        concept: payment.concept.clone(),
        period_start: payment.period_start,
        period_end: payment.period_end,
        payment_method: payment.payment_method.clone(),
        voucher: payment.voucher.clone(),
    }
}
