//! Ledger entry and entry line types
//!
//! This module defines the structure of the double-entry transactions
//! recorded in the ledger. Each line carries a debit and a credit amount,
//! one of which is normally zero.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{AccountId, CompanyId, Currency, EntryLineId, JournalId, LedgerEntryId, Money, MoneyError};

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Generic journal entry (not an invoice or a payment)
    Entry,
}

/// Posting state of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Created but not yet validated; may be unbalanced
    Draft,
    /// Validated and reflected in account balances
    Posted,
}

/// A line of an entry that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLineDraft {
    /// Label shown on the line
    pub name: String,
    /// Account to post to
    pub account_id: AccountId,
    /// Debit amount (zero for credit lines)
    pub debit: Money,
    /// Credit amount (zero for debit lines)
    pub credit: Money,
}

impl EntryLineDraft {
    /// Creates a debit line
    ///
    /// # Arguments
    ///
    /// * `name` - Line label
    /// * `account_id` - Account to debit
    /// * `amount` - Amount to debit
    pub fn debit(name: impl Into<String>, account_id: AccountId, amount: Money) -> Self {
        Self {
            name: name.into(),
            account_id,
            debit: amount,
            credit: Money::zero(amount.currency()),
        }
    }

    /// Creates a credit line
    ///
    /// # Arguments
    ///
    /// * `name` - Line label
    /// * `account_id` - Account to credit
    /// * `amount` - Amount to credit
    pub fn credit(name: impl Into<String>, account_id: AccountId, amount: Money) -> Self {
        Self {
            name: name.into(),
            account_id,
            debit: Money::zero(amount.currency()),
            credit: amount,
        }
    }

    /// Returns true when the line debits its account
    pub fn is_debit(&self) -> bool {
        self.credit.is_zero()
    }
}

/// A stored line of a ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryLine {
    pub id: EntryLineId,
    pub name: String,
    pub account_id: AccountId,
    pub debit: Money,
    pub credit: Money,
}

impl From<EntryLineDraft> for EntryLine {
    fn from(draft: EntryLineDraft) -> Self {
        Self {
            id: EntryLineId::new_v7(),
            name: draft.name,
            account_id: draft.account_id,
            debit: draft.debit,
            credit: draft.credit,
        }
    }
}

/// Request to create a ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
    pub entry_type: EntryType,
    pub journal_id: JournalId,
    pub company_id: CompanyId,
    /// Accounting date
    pub date: NaiveDate,
    /// Human-readable reference (e.g., "Settlement CC/00001")
    pub reference: String,
    /// Kind of document the entry originates from (e.g., "petty_cash")
    pub source_type: Option<String>,
    /// Identity of the originating document
    pub source_id: Option<Uuid>,
    pub lines: Vec<EntryLineDraft>,
}

impl NewEntry {
    /// Creates a generic entry request without lines
    pub fn new(
        journal_id: JournalId,
        company_id: CompanyId,
        date: NaiveDate,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            entry_type: EntryType::Entry,
            journal_id,
            company_id,
            date,
            reference: reference.into(),
            source_type: None,
            source_id: None,
            lines: Vec::new(),
        }
    }

    /// Sets the originating document
    pub fn with_source(mut self, source_type: impl Into<String>, source_id: Uuid) -> Self {
        self.source_type = Some(source_type.into());
        self.source_id = Some(source_id);
        self
    }

    /// Appends a line
    pub fn line(mut self, line: EntryLineDraft) -> Self {
        self.lines.push(line);
        self
    }
}

/// A ledger entry (journal transaction)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub entry_type: EntryType,
    pub journal_id: JournalId,
    pub company_id: CompanyId,
    pub date: NaiveDate,
    pub reference: String,
    pub source_type: Option<String>,
    pub source_id: Option<Uuid>,
    pub lines: Vec<EntryLine>,
    pub state: EntryState,
    pub created_at: DateTime<Utc>,
    pub posted_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Builds a draft entry from a creation request
    pub fn draft(request: NewEntry) -> Self {
        Self {
            id: LedgerEntryId::new_v7(),
            entry_type: request.entry_type,
            journal_id: request.journal_id,
            company_id: request.company_id,
            date: request.date,
            reference: request.reference,
            source_type: request.source_type,
            source_id: request.source_id,
            lines: request.lines.into_iter().map(EntryLine::from).collect(),
            state: EntryState::Draft,
            created_at: Utc::now(),
            posted_at: None,
        }
    }

    /// Sum of all debit amounts
    pub fn total_debit(&self, currency: Currency) -> Result<Money, MoneyError> {
        Money::checked_sum(self.lines.iter().map(|l| &l.debit), currency)
    }

    /// Sum of all credit amounts
    pub fn total_credit(&self, currency: Currency) -> Result<Money, MoneyError> {
        Money::checked_sum(self.lines.iter().map(|l| &l.credit), currency)
    }

    /// Checks if the entry is balanced
    pub fn is_balanced(&self, currency: Currency) -> bool {
        match (self.total_debit(currency), self.total_credit(currency)) {
            (Ok(debit), Ok(credit)) => debit == credit,
            _ => false,
        }
    }

    pub fn is_posted(&self) -> bool {
        self.state == EntryState::Posted
    }
}
