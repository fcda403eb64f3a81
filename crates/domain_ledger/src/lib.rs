//! Ledger Domain - Double-Entry Ledger Book
//!
//! This crate implements the ledger-posting subsystem that receives the
//! entries generated by petty cash settlement, together with the chart of
//! accounts and the journal registry those entries refer to.
//!
//! # Entry Lifecycle
//!
//! ```text
//! create_entry -> Draft -> post -> Posted
//!                   └── discard (removed)
//! ```
//!
//! Drafts may be unbalanced while they are being built; only `post`
//! enforces that the sum of debits equals the sum of credits.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{Ledger, NewEntry, EntryLineDraft};
//!
//! let mut ledger = Ledger::new(Currency::GTQ);
//! let entry_id = ledger.create_entry(NewEntry::new(journal_id, company_id, date, "Settlement CC/00001")
//!     .line(EntryLineDraft::debit("Expense", expense_account, amount))
//!     .line(EntryLineDraft::credit("Cash", cash_account, amount)))?;
//! ledger.post(&entry_id)?;
//! ```

pub mod account;
pub mod journal;
pub mod entry;
pub mod ledger;
pub mod error;

pub use account::{Account, AccountType, PettyCashChartOfAccounts};
pub use journal::{Journal, JournalType};
pub use entry::{EntryLine, EntryLineDraft, EntryState, EntryType, LedgerEntry, NewEntry};
pub use ledger::Ledger;
pub use error::LedgerError;
