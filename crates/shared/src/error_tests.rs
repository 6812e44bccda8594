use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::NotFound("x".into()), 404, "NOT_FOUND")]
#[case(AppError::Validation("x".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::BusinessRule("x".into()), 422, "BUSINESS_RULE_VIOLATION")]
#[case(AppError::Conflict("x".into()), 409, "CONFLICT")]
#[case(AppError::Database("x".into()), 500, "DATABASE_ERROR")]
#[case(AppError::Internal("x".into()), 500, "INTERNAL_ERROR")]
fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(err.status_code(), status);
    assert_eq!(err.error_code(), code);
}

#[test]
fn test_integrity_is_conflict_with_specific_code() {
    let dup = AppError::Integrity {
        kind: IntegrityKind::DuplicateKey,
        detail: "uq_installments_reference".into(),
    };
    let dangling = AppError::Integrity {
        kind: IntegrityKind::DanglingReference,
        detail: "fk_movements_session".into(),
    };

    assert_eq!(dup.status_code(), 409);
    assert_eq!(dangling.status_code(), 409);
    assert_eq!(dup.error_code(), "DUPLICATE_KEY");
    assert_eq!(dangling.error_code(), "DANGLING_REFERENCE");
}

#[test]
fn test_error_display() {
    assert_eq!(
        AppError::Conflict("session already open".into()).to_string(),
        "Conflict: session already open"
    );
    assert_eq!(
        AppError::Integrity {
            kind: IntegrityKind::DuplicateKey,
            detail: "voucher".into(),
        }
        .to_string(),
        "Integrity violation (duplicate key): voucher"
    );
}

#[test]
fn test_client_error_classification() {
    assert!(AppError::Validation(String::new()).is_client_error());
    assert!(AppError::Conflict(String::new()).is_client_error());
    assert!(!AppError::Database(String::new()).is_client_error());
}
