//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account already exists
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    /// Account can no longer receive postings
    #[error("Account is deprecated: {0}")]
    DeprecatedAccount(String),

    /// Journal not found
    #[error("Journal not found: {0}")]
    JournalNotFound(String),

    /// Ledger entry not found
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(String),

    /// Entry is not balanced
    #[error("Unbalanced entry: debits={debits}, credits={credits}")]
    UnbalancedEntry {
        debits: Decimal,
        credits: Decimal,
    },

    /// Entry has no lines
    #[error("Entry has no lines: {0}")]
    EmptyEntry(String),

    /// Entry is not in the state the operation requires
    #[error("Entry {entry} is {state}, expected draft")]
    NotDraft { entry: String, state: String },

    /// Calculation error
    #[error("Calculation error: {0}")]
    CalculationError(#[from] MoneyError),
}
