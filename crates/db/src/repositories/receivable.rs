//! Receivable repository: payment plans and their installments.
//!
//! An installment, the INSTALLMENT movement it posts and the plan totals it
//! moves are written in one transaction under an exclusive lock on the plan.

use chrono::Utc;
use kasa_core::ledger::LedgerService;
use kasa_core::receivables::{
    CreatePlanInput, InstallmentInput, PlanBalance, PlanStatus as CorePlanStatus,
    ReceivableService,
};
use kasa_shared::LedgerConfig;
use kasa_shared::types::{InstallmentId, PaymentPlanId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::posting::insert_movement;
use crate::entities::{
    debtors, installment_payments, movements, payment_plans, sea_orm_active_enums::PlanStatus,
};
use crate::error::RepositoryError;

/// A plan with its debtor's display name.
#[derive(Debug, Clone, Serialize)]
pub struct PlanDetail {
    /// The plan row.
    pub plan: payment_plans::Model,
    /// Debtor display name.
    pub debtor_name: String,
}

/// Result of registering an installment.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredInstallment {
    /// Updated plan with debtor detail.
    pub plan: PlanDetail,
    /// The installment row.
    pub installment: installment_payments::Model,
    /// The INSTALLMENT movement it posted.
    pub movement: movements::Model,
}

/// Receivable repository.
#[derive(Debug, Clone)]
pub struct ReceivableRepository {
    db: DatabaseConnection,
    allow_unassigned: bool,
    overpayment_tolerance: Decimal,
}

impl ReceivableRepository {
    /// Creates a new receivable repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, ledger: &LedgerConfig) -> Self {
        Self {
            db,
            allow_unassigned: ledger.allow_unassigned_movements,
            overpayment_tolerance: ledger.overpayment_tolerance,
        }
    }

    /// Creates a PENDING plan with `pending = total`.
    ///
    /// # Errors
    ///
    /// Returns a validation error or `NotFound` for an unknown debtor.
    pub async fn create_plan(&self, input: CreatePlanInput) -> Result<PlanDetail, RepositoryError> {
        let issue_date = input.issue_date.unwrap_or_else(|| Utc::now().date_naive());
        ReceivableService::validate_plan(&input, issue_date)?;

        let debtor = find_debtor(&self.db, input.debtor_id).await?;
        let balance = ReceivableService::new_balance(input.total_amount);
        let now = Utc::now();
        let (origin_kind, origin_id) = match input.origin {
            Some(origin) => (Some(origin.kind.as_str().to_string()), Some(origin.id)),
            None => (None, None),
        };

        let plan = payment_plans::ActiveModel {
            id: Set(PaymentPlanId::new().into_inner()),
            debtor_id: Set(debtor.id),
            total_amount: Set(balance.total),
            paid_amount: Set(balance.paid),
            pending_amount: Set(balance.pending),
            issue_date: Set(issue_date),
            due_date: Set(input.due_date),
            status: Set(balance.status.into()),
            notes: Set(input.notes.filter(|n| !n.trim().is_empty())),
            origin_kind: Set(origin_kind),
            origin_id: Set(origin_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(
            plan_id = %plan.id,
            debtor_id = %plan.debtor_id,
            total = %plan.total_amount,
            "Payment plan created"
        );
        Ok(PlanDetail {
            plan,
            debtor_name: debtor.name,
        })
    }

    /// Registers an installment and posts its INSTALLMENT movement.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PlanAlreadyPaid`, `Overpayment`, a validation
    /// error, or a duplicate-key integrity error when the reference was
    /// already used on this plan.
    pub async fn register_installment(
        &self,
        plan_id: Uuid,
        input: InstallmentInput,
    ) -> Result<RegisteredInstallment, RepositoryError> {
        let txn = self.db.begin().await?;

        let plan = payment_plans::Entity::find_by_id(plan_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("payment plan", plan_id))?;
        let debtor = find_debtor(&txn, plan.debtor_id).await?;

        let current = PlanBalance {
            total: plan.total_amount,
            paid: plan.paid_amount,
            pending: plan.pending_amount,
            status: plan.status.into(),
        };
        let next = ReceivableService::apply_installment(
            plan_id,
            &current,
            input.amount,
            self.overpayment_tolerance,
        )?;

        let installment_id = InstallmentId::new().into_inner();
        let posting =
            ReceivableService::installment_movement(installment_id, plan_id, &debtor.name, &input);
        let draft = LedgerService::prepare(&posting)?;

        let installment = installment_payments::ActiveModel {
            id: Set(installment_id),
            plan_id: Set(plan_id),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method.trim().to_string()),
            reference: Set(input
                .reference
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)),
            operator_id: Set(input.operator_id),
            paid_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        let movement = insert_movement(&txn, draft, self.allow_unassigned).await?;

        let mut active: payment_plans::ActiveModel = plan.into();
        active.paid_amount = Set(next.paid);
        active.pending_amount = Set(next.pending);
        active.status = Set(next.status.into());
        active.updated_at = Set(Utc::now());
        let plan = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            plan_id = %plan_id,
            installment_id = %installment.id,
            movement_id = %movement.id,
            amount = %installment.amount,
            pending = %plan.pending_amount,
            status = %CorePlanStatus::from(plan.status),
            "Installment registered"
        );
        Ok(RegisteredInstallment {
            plan: PlanDetail {
                plan,
                debtor_name: debtor.name,
            },
            installment,
            movement,
        })
    }

    /// Lists plans that are not fully paid, earliest due first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_pending(
        &self,
        debtor_id: Option<Uuid>,
    ) -> Result<Vec<payment_plans::Model>, RepositoryError> {
        let mut query =
            payment_plans::Entity::find().filter(payment_plans::Column::Status.ne(PlanStatus::Paid));
        if let Some(debtor_id) = debtor_id {
            query = query.filter(payment_plans::Column::DebtorId.eq(debtor_id));
        }
        Ok(query
            .order_by_asc(payment_plans::Column::DueDate)
            .order_by_asc(payment_plans::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Gets a plan with its debtor name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the plan does not exist.
    pub async fn get_plan(&self, plan_id: Uuid) -> Result<PlanDetail, RepositoryError> {
        let plan = payment_plans::Entity::find_by_id(plan_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("payment plan", plan_id))?;
        let debtor = find_debtor(&self.db, plan.debtor_id).await?;
        Ok(PlanDetail {
            plan,
            debtor_name: debtor.name,
        })
    }

    /// Lists a plan's installments in payment order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the plan does not exist.
    pub async fn list_installments(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<installment_payments::Model>, RepositoryError> {
        payment_plans::Entity::find_by_id(plan_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("payment plan", plan_id))?;

        Ok(installment_payments::Entity::find()
            .filter(installment_payments::Column::PlanId.eq(plan_id))
            .order_by_asc(installment_payments::Column::PaidAt)
            .order_by_asc(installment_payments::Column::Id)
            .all(&self.db)
            .await?)
    }
}

async fn find_debtor<C: ConnectionTrait>(
    conn: &C,
    debtor_id: Uuid,
) -> Result<debtors::Model, RepositoryError> {
    debtors::Entity::find_by_id(debtor_id)
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("debtor", debtor_id))
}
