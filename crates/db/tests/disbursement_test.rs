//! Expense and payroll tests: each record owns exactly one outflow.

mod common;

use common::{
    close_input, date, insert_category, insert_employee, insert_operator, open_input, setup_db,
};
use kasa_core::disbursement::{
    DisbursementError, ExpenseDetails, ExpenseUpdate, PayrollDetails, PayrollUpdate,
};
use kasa_db::entities::{movements, sea_orm_active_enums::MovementDirection};
use kasa_db::repositories::ExpenseFilter;
use kasa_db::{
    CashSessionRepository, ExpenseRepository, MovementRepository, PayrollRepository,
    RepositoryError,
};
use kasa_shared::types::PageRequest;
use kasa_shared::{LedgerConfig, ReconciliationMode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

fn expense(category_id: Uuid, amount: Decimal) -> ExpenseDetails {
    ExpenseDetails {
        category_id,
        amount,
        description: "Cleaning supplies".to_string(),
        expense_date: date(2030, 3, 2),
        payment_method: Some("cash".to_string()),
        voucher: Some("B-001".to_string()),
    }
}

fn payroll(employee_id: Uuid, amount: Decimal) -> PayrollDetails {
    PayrollDetails {
        employee_id,
        amount,
        concept: "Fortnight wage".to_string(),
        period_start: date(2030, 3, 1),
        period_end: date(2030, 3, 15),
        payment_method: Some("cash".to_string()),
        voucher: None,
    }
}

async fn linked(db: &DatabaseConnection, kind: &str, record_id: Uuid) -> Vec<movements::Model> {
    movements::Entity::find()
        .filter(movements::Column::SourceKind.eq(kind))
        .filter(movements::Column::SourceId.eq(record_id))
        .all(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_expense_posts_linked_outflow() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let category_id = insert_category(&db, "Cleaning").await;
    let sessions = CashSessionRepository::new(db.clone(), ReconciliationMode::Warn);
    let expenses = ExpenseRepository::new(db.clone(), &LedgerConfig::default());

    let session = sessions.open(open_input(operator_id, dec!(100))).await.unwrap();
    let record = expenses
        .create(expense(category_id, dec!(25)), operator_id)
        .await
        .unwrap();

    assert_eq!(record.movement.category, "EXPENSE");
    assert_eq!(record.movement.direction, MovementDirection::Outflow);
    assert_eq!(record.movement.amount, dec!(25));
    assert_eq!(record.movement.session_id, Some(session.id));
    assert_eq!(record.movement.source_id, Some(record.expense.id));
    assert_eq!(linked(&db, "expense", record.expense.id).await.len(), 1);

    let closed = sessions
        .close(close_input(operator_id, dec!(75)))
        .await
        .unwrap();
    assert_eq!(closed.outcome.expected(), dec!(75));
}

#[tokio::test]
async fn test_expense_update_propagates_to_movement() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let category_id = insert_category(&db, "Cleaning").await;
    let expenses = ExpenseRepository::new(db.clone(), &LedgerConfig::default());

    let record = expenses
        .create(expense(category_id, dec!(25)), operator_id)
        .await
        .unwrap();

    let update = ExpenseUpdate {
        amount: Some(dec!(40)),
        description: Some("Cleaning supplies and bags".to_string()),
        ..Default::default()
    };
    let updated = expenses.update(record.expense.id, update).await.unwrap();

    assert_eq!(updated.expense.amount, dec!(40));
    assert_eq!(updated.movement.id, record.movement.id);
    assert_eq!(updated.movement.amount, dec!(40));
    assert_eq!(updated.movement.description, "Cleaning supplies and bags");

    let stored = linked(&db, "expense", record.expense.id).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].amount, dec!(40));
}

#[tokio::test]
async fn test_expense_delete_removes_movement() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let category_id = insert_category(&db, "Cleaning").await;
    let expenses = ExpenseRepository::new(db.clone(), &LedgerConfig::default());

    let record = expenses
        .create(expense(category_id, dec!(25)), operator_id)
        .await
        .unwrap();
    expenses.delete(record.expense.id).await.unwrap();

    assert!(linked(&db, "expense", record.expense.id).await.is_empty());
    let err = expenses.get(record.expense.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { entity: "expense", .. }));
}

#[tokio::test]
async fn test_expense_unknown_category_writes_nothing() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let expenses = ExpenseRepository::new(db.clone(), &LedgerConfig::default());
    let movements = MovementRepository::new(db.clone(), &LedgerConfig::default());

    let err = expenses
        .create(expense(Uuid::new_v4(), dec!(25)), operator_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::NotFound {
            entity: "expense category",
            ..
        }
    ));

    let page = movements
        .query(Default::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 0);
}

#[tokio::test]
async fn test_expense_correction_after_close_is_rejected() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let category_id = insert_category(&db, "Cleaning").await;
    let sessions = CashSessionRepository::new(db.clone(), ReconciliationMode::Warn);
    let expenses = ExpenseRepository::new(db.clone(), &LedgerConfig::default());

    let session = sessions.open(open_input(operator_id, dec!(100))).await.unwrap();
    let record = expenses
        .create(expense(category_id, dec!(25)), operator_id)
        .await
        .unwrap();
    sessions
        .close(close_input(operator_id, dec!(75)))
        .await
        .unwrap();

    let update = ExpenseUpdate {
        amount: Some(dec!(30)),
        ..Default::default()
    };
    let err = expenses
        .update(record.expense.id, update)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Disbursement(DisbursementError::RecordInClosedSession { session_id, .. })
            if session_id == session.id
    ));
    assert_eq!(err.http_status_code(), 409);

    assert!(expenses.delete(record.expense.id).await.is_err());
    assert_eq!(expenses.get(record.expense.id).await.unwrap().amount, dec!(25));
}

#[tokio::test]
async fn test_reversed_expense_cannot_be_corrected_or_deleted() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let category_id = insert_category(&db, "Cleaning").await;
    let sessions = CashSessionRepository::new(db.clone(), ReconciliationMode::Warn);
    let expenses = ExpenseRepository::new(db.clone(), &LedgerConfig::default());
    let movements = MovementRepository::new(db.clone(), &LedgerConfig::default());

    sessions.open(open_input(operator_id, dec!(100))).await.unwrap();
    let record = expenses
        .create(expense(category_id, dec!(25)), operator_id)
        .await
        .unwrap();
    movements
        .reverse(record.movement.id, operator_id, Some("duplicated receipt"))
        .await
        .unwrap();

    let err = expenses.delete(record.expense.id).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Disbursement(DisbursementError::RecordReversed { movement_id, .. })
            if movement_id == record.movement.id
    ));
    assert_eq!(err.http_status_code(), 409);
    assert_eq!(linked(&db, "expense", record.expense.id).await.len(), 1);

    let update = ExpenseUpdate {
        amount: Some(dec!(60)),
        ..Default::default()
    };
    let err = expenses
        .update(record.expense.id, update)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "RECORD_REVERSED");
    assert_eq!(expenses.get(record.expense.id).await.unwrap().amount, dec!(25));

    let closed = sessions
        .close(close_input(operator_id, dec!(100)))
        .await
        .unwrap();
    assert_eq!(closed.outcome.expected(), dec!(100));
}

#[tokio::test]
async fn test_reversed_payroll_payment_cannot_be_deleted() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let employee_id = insert_employee(&db, "Jorge").await;
    let payroll_repo = PayrollRepository::new(db.clone(), &LedgerConfig::default());
    let movements = MovementRepository::new(db.clone(), &LedgerConfig::default());

    let record = payroll_repo
        .create(payroll(employee_id, dec!(600)), operator_id)
        .await
        .unwrap();
    movements
        .reverse(record.movement.id, operator_id, None)
        .await
        .unwrap();

    let err = payroll_repo.delete(record.payment.id).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Disbursement(DisbursementError::RecordReversed { .. })
    ));
    assert!(payroll_repo.get(record.payment.id).await.is_ok());
}

#[tokio::test]
async fn test_list_expenses_by_category() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let cleaning = insert_category(&db, "Cleaning").await;
    let transport = insert_category(&db, "Transport").await;
    let expenses = ExpenseRepository::new(db.clone(), &LedgerConfig::default());

    expenses
        .create(expense(cleaning, dec!(10)), operator_id)
        .await
        .unwrap();
    expenses
        .create(expense(cleaning, dec!(12)), operator_id)
        .await
        .unwrap();
    expenses
        .create(expense(transport, dec!(8)), operator_id)
        .await
        .unwrap();

    let filter = ExpenseFilter {
        category_id: Some(cleaning),
        ..Default::default()
    };
    let page = expenses.list(filter, PageRequest::default()).await.unwrap();
    assert_eq!(page.meta.total, 2);
    assert!(page.data.iter().all(|e| e.category_id == cleaning));

    let out_of_range = ExpenseFilter {
        from: Some(date(2031, 1, 1)),
        ..Default::default()
    };
    let page = expenses
        .list(out_of_range, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 0);
}

#[tokio::test]
async fn test_payroll_lifecycle_keeps_movement_in_sync() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let employee_id = insert_employee(&db, "Jorge").await;
    let payroll_repo = PayrollRepository::new(db.clone(), &LedgerConfig::default());

    let record = payroll_repo
        .create(payroll(employee_id, dec!(600)), operator_id)
        .await
        .unwrap();
    assert_eq!(record.movement.category, "PAYROLL");
    assert_eq!(record.movement.direction, MovementDirection::Outflow);
    assert!(record.movement.description.starts_with("Payroll: Fortnight wage"));

    let update = PayrollUpdate {
        amount: Some(dec!(650)),
        ..Default::default()
    };
    let updated = payroll_repo.update(record.payment.id, update).await.unwrap();
    assert_eq!(updated.payment.amount, dec!(650));
    assert_eq!(updated.movement.amount, dec!(650));

    let page = payroll_repo
        .list(Some(employee_id), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 1);

    payroll_repo.delete(record.payment.id).await.unwrap();
    assert!(linked(&db, "payroll_payment", record.payment.id).await.is_empty());
    assert!(payroll_repo.get(record.payment.id).await.is_err());
}

#[tokio::test]
async fn test_payroll_rejects_inverted_period_and_unknown_employee() {
    let db = setup_db().await;
    let operator_id = insert_operator(&db, "Ana").await;
    let employee_id = insert_employee(&db, "Jorge").await;
    let payroll_repo = PayrollRepository::new(db.clone(), &LedgerConfig::default());

    let mut inverted = payroll(employee_id, dec!(600));
    inverted.period_end = date(2030, 2, 1);
    let err = payroll_repo.create(inverted, operator_id).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Disbursement(DisbursementError::InvalidPayPeriod { .. })
    ));
    assert_eq!(err.http_status_code(), 400);

    let err = payroll_repo
        .create(payroll(Uuid::new_v4(), dec!(600)), operator_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { entity: "employee", .. }));
}
