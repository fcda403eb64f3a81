//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::{Currency, Money};
use domain_ledger::LedgerEntry;
use domain_petty_cash::ExpenseBatch;

/// Asserts that a ledger entry balances
///
/// # Panics
///
/// Panics if the sum of debits differs from the sum of credits
pub fn assert_entry_balanced(entry: &LedgerEntry, currency: Currency) {
    let debits = entry.total_debit(currency).expect("Debits in ledger currency");
    let credits = entry.total_credit(currency).expect("Credits in ledger currency");
    assert_eq!(
        debits, credits,
        "Entry {} is unbalanced: debits={}, credits={}",
        entry.reference, debits, credits
    );
}

/// Asserts that the stored totals of a batch equal the sums of its lines
pub fn assert_totals_consistent(batch: &ExpenseBatch) {
    let currency = batch.currency();
    let sum = |f: fn(&domain_petty_cash::ExpenseLine) -> Money| {
        batch
            .lines()
            .iter()
            .map(f)
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(&m))
            .expect("Line sums fit in a decimal")
    };

    assert_eq!(batch.total_amount(), sum(|l| l.amount()), "Total amount out of sync");
    assert_eq!(batch.total_iva(), sum(|l| l.iva()), "Total IVA out of sync");
    assert_eq!(batch.total_idp(), sum(|l| l.idp()), "Total IDP out of sync");
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}
