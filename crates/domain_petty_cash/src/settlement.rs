//! Settlement entry construction
//!
//! Turns a confirmed batch into a ledger entry request. Lines are emitted
//! in a fixed order:
//!
//! 1. expense debit (always, even when zero)
//! 2. IVA debit (only when IVA > 0)
//! 3. IDP debit to the IDP account, or the IVA account when unset (only when IDP > 0)
//! 4. cash/provision credit of the grand total (always)

use serde::Serialize;

use core_kernel::{Currency, JournalId, Money, MoneyError};
use domain_ledger::{EntryLineDraft, NewEntry};

use crate::batch::{ExpenseBatch, SettlementAccounts};
use crate::line::ExpenseLine;

/// Source type recorded on settlement entries
pub const SOURCE_TYPE: &str = "petty_cash";

/// Aggregated amounts of a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettlementTotals {
    pub expense: Money,
    pub iva: Money,
    pub idp: Money,
    /// Equal to both the total debit and the total credit
    pub total: Money,
}

impl SettlementTotals {
    /// Aggregates line amounts, IVA and IDP
    pub fn from_lines(lines: &[ExpenseLine], currency: Currency) -> Result<Self, MoneyError> {
        let expense = Money::checked_sum(&lines.iter().map(|l| l.amount()).collect::<Vec<_>>(), currency)?;
        let iva = Money::checked_sum(&lines.iter().map(|l| l.iva()).collect::<Vec<_>>(), currency)?;
        let idp = Money::checked_sum(&lines.iter().map(|l| l.idp()).collect::<Vec<_>>(), currency)?;
        let total = expense.checked_add(&iva)?.checked_add(&idp)?;

        Ok(Self { expense, iva, idp, total })
    }
}

/// Builds the settlement entry request for a batch
///
/// The batch is expected to have passed `check_settleable`, which supplies
/// `accounts`.
///
/// # Arguments
///
/// * `batch` - The batch being settled
/// * `accounts` - Resolved settlement accounts
/// * `journal_id` - Journal receiving the entry
///
/// # Errors
///
/// Returns error if a line amount is in a foreign currency
pub fn build_entry(
    batch: &ExpenseBatch,
    accounts: &SettlementAccounts,
    journal_id: JournalId,
) -> Result<NewEntry, MoneyError> {
    let totals = SettlementTotals::from_lines(batch.lines(), batch.currency())?;
    let reference = batch.reference();

    let mut request = NewEntry::new(
        journal_id,
        batch.company_id(),
        batch.date(),
        format!("Settlement {}", reference),
    )
    .with_source(SOURCE_TYPE, *batch.id().as_uuid())
    .line(EntryLineDraft::debit(
        format!("Petty cash expense {}", reference),
        accounts.expense,
        totals.expense,
    ));

    if totals.iva.is_positive() {
        request = request.line(EntryLineDraft::debit(
            format!("IVA tax credit {}", reference),
            accounts.iva,
            totals.iva,
        ));
    }

    if totals.idp.is_positive() {
        request = request.line(EntryLineDraft::debit(
            format!("IDP {}", reference),
            accounts.idp_or_iva(),
            totals.idp,
        ));
    }

    Ok(request.line(EntryLineDraft::credit(
        format!("Provision/cash {}", reference),
        accounts.cash,
        totals.total,
    )))
}
