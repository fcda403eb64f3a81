//! Tests for core_kernel error types

use core_kernel::money::MoneyError;
use core_kernel::PortError;

#[test]
fn test_money_error_messages() {
    let mismatch = MoneyError::CurrencyMismatch("GTQ".to_string(), "USD".to_string());
    assert_eq!(
        mismatch.to_string(),
        "Currency mismatch: cannot operate on GTQ and USD"
    );
    assert_eq!(MoneyError::Overflow.to_string(), "Overflow during calculation");
}

#[test]
fn test_port_error_validation() {
    let error = PortError::validation("Account is deprecated");

    match error {
        PortError::Validation { message } => {
            assert_eq!(message, "Account is deprecated");
        }
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_port_error_conflict_is_not_not_found() {
    let error = PortError::conflict("stale version");
    assert!(error.is_conflict());
    assert!(!error.is_not_found());
}
