//! Petty Cash Domain - Expense Batches and Settlement
//!
//! This crate records the documents paid from a petty cash fund, computes
//! their taxes and settles them into one balanced ledger entry.
//!
//! # Taxes
//!
//! - **IVA**: 12% of every non-zero line amount
//! - **IDP**: 5% of fuel line amounts
//!
//! # Lifecycle
//!
//! ```text
//! Draft ──confirm──► Confirmed ──settle──► Settled
//! ```
//!
//! Settlement debits the expense, IVA and IDP accounts and credits the
//! cash/provision account with the grand total:
//!
//! | Line          | Account              | Debit      | Credit |
//! |---------------|----------------------|------------|--------|
//! | Expense       | expense              | Σ amount   |        |
//! | IVA (if > 0)  | IVA                  | Σ IVA      |        |
//! | IDP (if > 0)  | IDP, else IVA        | Σ IDP      |        |
//! | Provision     | cash                 |            | total  |
//!
//! # Example
//!
//! ```rust,ignore
//! let batch = service.create_batch(NewBatch::new(company, Currency::GTQ, date, BatchCategory::Operations)
//!     .with_accounts(accounts)
//!     .with_line(fuel_receipt)).await?;
//! service.confirm(batch.id()).await?;
//! let settled = service.settle(batch.id(), true).await?;
//! ```

pub mod tax;
pub mod line;
pub mod batch;
pub mod settlement;
pub mod reference;
pub mod report;
pub mod ports;
pub mod adapters;
pub mod services;
pub mod error;

pub use tax::{TaxBreakdown, IDP_RATE, IVA_RATE};
pub use line::{DocumentCategory, DocumentType, ExpenseLine, LineUpdate};
pub use batch::{
    BatchAccounts, BatchCategory, BatchState, ExpenseBatch, SettlementAccounts,
    UNASSIGNED_REFERENCE,
};
pub use settlement::SettlementTotals;
pub use reference::{PLACEHOLDER_REFERENCE, SEQUENCE_CODE};
pub use report::Notification;
pub use ports::{
    BatchQuery, ChartOfAccountsPort, ExpenseBatchRepository, JournalRegistryPort,
    LedgerPostingPort, SequencePort,
};
pub use services::{NewBatch, NewLine, PettyCashService};
pub use error::PettyCashError;
