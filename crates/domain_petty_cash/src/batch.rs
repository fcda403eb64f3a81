//! Petty cash batch aggregate
//!
//! A batch groups the expense documents paid from the petty cash fund and
//! moves through a linear lifecycle:
//!
//! ```text
//! Draft -> Confirmed -> Settled
//! ```
//!
//! Totals are recomputed by every mutation of the line collection and are
//! never edited independently. A settled batch references exactly one
//! ledger entry and rejects further edits.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{
    AccountId, CompanyId, Currency, ExpenseBatchId, ExpenseLineId,
    JournalId, LedgerEntryId, Money, MoneyError, UserId,
};
use crate::error::PettyCashError;
use crate::line::{ExpenseLine, LineUpdate};

/// Reference carried by a batch until the sequence assigns one
pub const UNASSIGNED_REFERENCE: &str = "New";

/// Other spellings of the unassigned reference accepted from clients
const UNASSIGNED_ALIASES: [&str; 1] = ["Nuevo"];

/// Purpose of the petty cash batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchCategory {
    Operations,
    Administration,
    Depreciation,
    SalesRefund,
    ManagementRefund,
}

/// Lifecycle state of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Draft,
    Confirmed,
    /// Terminal; the ledger entry exists
    Settled,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BatchState::Draft => "draft",
            BatchState::Confirmed => "confirmed",
            BatchState::Settled => "settled",
        };
        write!(f, "{}", label)
    }
}

/// Account selections of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAccounts {
    pub expense: Option<AccountId>,
    pub iva: Option<AccountId>,
    /// Optional; IDP falls back to the IVA account
    pub idp: Option<AccountId>,
    pub cash: Option<AccountId>,
}

impl BatchAccounts {
    /// All selected accounts, in expense/iva/idp/cash order
    pub fn selected(&self) -> impl Iterator<Item = AccountId> {
        [self.expense, self.iva, self.idp, self.cash].into_iter().flatten()
    }
}

/// Accounts a settlement posts to, with the required ones resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementAccounts {
    pub expense: AccountId,
    pub iva: AccountId,
    pub idp: Option<AccountId>,
    pub cash: AccountId,
}

impl SettlementAccounts {
    /// Account receiving the IDP debit
    pub fn idp_or_iva(&self) -> AccountId {
        self.idp.unwrap_or(self.iva)
    }
}

/// Petty cash batch aggregate root
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseBatch {
    id: ExpenseBatchId,
    reference: String,
    company_id: CompanyId,
    currency: Currency,
    date: NaiveDate,
    category: BatchCategory,
    supervisor: Option<UserId>,
    lines: Vec<ExpenseLine>,
    accounts: BatchAccounts,
    journal_id: Option<JournalId>,
    total_amount: Money,
    total_iva: Money,
    total_idp: Money,
    ledger_entry_id: Option<LedgerEntryId>,
    state: BatchState,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExpenseBatch {
    /// Creates an empty draft batch with an unassigned reference
    ///
    /// # Arguments
    ///
    /// * `company_id` - Owning company
    /// * `currency` - Company currency; every line must use it
    /// * `date` - Accounting date of the settlement
    /// * `category` - Purpose of the batch
    pub fn new(
        company_id: CompanyId,
        currency: Currency,
        date: NaiveDate,
        category: BatchCategory,
    ) -> Self {
        let now = Utc::now();
        let zero = Money::zero(currency);
        Self {
            id: ExpenseBatchId::new_v7(),
            reference: UNASSIGNED_REFERENCE.to_string(),
            company_id,
            currency,
            date,
            category,
            supervisor: None,
            lines: Vec::new(),
            accounts: BatchAccounts::default(),
            journal_id: None,
            total_amount: zero,
            total_iva: zero,
            total_idp: zero,
            ledger_entry_id: None,
            state: BatchState::Draft,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> ExpenseBatchId {
        self.id
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> BatchCategory {
        self.category
    }

    pub fn supervisor(&self) -> Option<UserId> {
        self.supervisor
    }

    pub fn lines(&self) -> &[ExpenseLine] {
        &self.lines
    }

    pub fn line(&self, line_id: ExpenseLineId) -> Option<&ExpenseLine> {
        self.lines.iter().find(|l| l.id() == line_id)
    }

    pub fn accounts(&self) -> BatchAccounts {
        self.accounts
    }

    pub fn journal_id(&self) -> Option<JournalId> {
        self.journal_id
    }

    /// Sum of line amounts
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Sum of line IVA
    pub fn total_iva(&self) -> Money {
        self.total_iva
    }

    /// Sum of line IDP
    pub fn total_idp(&self) -> Money {
        self.total_idp
    }

    /// Amount, IVA and IDP together
    pub fn grand_total(&self) -> Result<Money, MoneyError> {
        self.total_amount
            .checked_add(&self.total_iva)?
            .checked_add(&self.total_idp)
    }

    pub fn ledger_entry_id(&self) -> Option<LedgerEntryId> {
        self.ledger_entry_id
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Persistence version, used for optimistic concurrency
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ------------------------------------------------------------------
    // Reference
    // ------------------------------------------------------------------

    /// Returns true until a reference has been assigned
    pub fn has_unassigned_reference(&self) -> bool {
        is_unassigned(&self.reference)
    }

    /// Assigns the reference once; later calls are ignored
    ///
    /// Returns true when the reference was assigned.
    pub fn assign_reference(&mut self, reference: impl Into<String>) -> bool {
        if !self.has_unassigned_reference() {
            return false;
        }
        let reference = reference.into();
        if is_unassigned(&reference) {
            return false;
        }
        self.reference = reference;
        true
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Appends a line
    ///
    /// # Errors
    ///
    /// - Returns error if the batch is settled
    /// - Returns error if the line is not in the batch currency
    /// - Returns error if the totals would overflow
    pub fn add_line(&mut self, line: ExpenseLine) -> Result<ExpenseLineId, PettyCashError> {
        self.ensure_editable("add line to")?;
        if line.amount().currency() != self.currency {
            return Err(PettyCashError::validation(format!(
                "Line currency {} differs from batch currency {}",
                line.amount().currency(),
                self.currency
            )));
        }

        let totals = Totals::of(self.lines.iter().chain(std::iter::once(&line)), self.currency)?;
        let line_id = line.id();
        self.lines.push(line);
        self.set_totals(totals);
        Ok(line_id)
    }

    /// Updates a line and recomputes its taxes and the batch totals
    ///
    /// # Errors
    ///
    /// - Returns error if the batch is settled
    /// - Returns error if the line doesn't exist
    /// - Returns error if the new amount cannot be taxed or totalled
    pub fn update_line(
        &mut self,
        line_id: ExpenseLineId,
        update: LineUpdate,
    ) -> Result<&ExpenseLine, PettyCashError> {
        self.ensure_editable("update line of")?;
        let position = self.position_of(line_id)?;

        let mut updated = self.lines[position].clone();
        updated.apply(update)?;
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != position)
            .map(|(_, l)| l);
        let totals = Totals::of(others.chain(std::iter::once(&updated)), self.currency)?;

        self.lines[position] = updated;
        self.set_totals(totals);
        Ok(&self.lines[position])
    }

    /// Removes a line
    ///
    /// # Errors
    ///
    /// - Returns error if the batch is settled
    /// - Returns error if the line doesn't exist
    pub fn remove_line(&mut self, line_id: ExpenseLineId) -> Result<ExpenseLine, PettyCashError> {
        self.ensure_editable("remove line from")?;
        let position = self.position_of(line_id)?;

        let remaining = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != position)
            .map(|(_, l)| l);
        let totals = Totals::of(remaining, self.currency)?;

        let removed = self.lines.remove(position);
        self.set_totals(totals);
        Ok(removed)
    }

    /// Replaces the account selections
    pub fn assign_accounts(&mut self, accounts: BatchAccounts) -> Result<(), PettyCashError> {
        self.ensure_editable("assign accounts to")?;
        self.accounts = accounts;
        self.touch();
        Ok(())
    }

    /// Sets or clears the journal receiving the settlement
    pub fn set_journal(&mut self, journal_id: Option<JournalId>) -> Result<(), PettyCashError> {
        self.ensure_editable("set journal of")?;
        self.journal_id = journal_id;
        self.touch();
        Ok(())
    }

    pub fn set_supervisor(&mut self, supervisor: Option<UserId>) -> Result<(), PettyCashError> {
        self.ensure_editable("set supervisor of")?;
        self.supervisor = supervisor;
        self.touch();
        Ok(())
    }

    pub fn set_date(&mut self, date: NaiveDate) -> Result<(), PettyCashError> {
        self.ensure_editable("set date of")?;
        self.date = date;
        self.touch();
        Ok(())
    }

    pub fn set_category(&mut self, category: BatchCategory) -> Result<(), PettyCashError> {
        self.ensure_editable("set category of")?;
        self.category = category;
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Moves a draft batch to confirmed
    ///
    /// # Errors
    ///
    /// Returns error if the batch is not a draft
    pub fn confirm(&mut self) -> Result<(), PettyCashError> {
        self.ensure_state(BatchState::Draft, "confirm")?;
        self.state = BatchState::Confirmed;
        self.touch();
        Ok(())
    }

    /// Checks the settlement preconditions without changing the batch
    ///
    /// Checked in order: state, lines, required accounts, non-negative totals.
    ///
    /// # Errors
    ///
    /// - Returns error if the batch is not confirmed
    /// - Returns error if the batch has no lines
    /// - Returns error if the expense, IVA or cash account is missing
    /// - Returns error if any total is negative
    pub fn check_settleable(&self) -> Result<SettlementAccounts, PettyCashError> {
        self.ensure_state(BatchState::Confirmed, "settle")?;

        if self.lines.is_empty() {
            return Err(PettyCashError::validation(
                "Add at least one expense line before settling",
            ));
        }

        let (expense, iva, cash) = match (self.accounts.expense, self.accounts.iva, self.accounts.cash) {
            (Some(expense), Some(iva), Some(cash)) => (expense, iva, cash),
            _ => {
                return Err(PettyCashError::validation(
                    "Select the expense, IVA and cash/provision accounts",
                ))
            }
        };

        if self.total_amount.is_negative() || self.total_iva.is_negative() || self.total_idp.is_negative() {
            return Err(PettyCashError::validation(format!(
                "Settlement totals cannot be negative: amount {}, IVA {}, IDP {}",
                self.total_amount, self.total_iva, self.total_idp
            )));
        }

        Ok(SettlementAccounts {
            expense,
            iva,
            idp: self.accounts.idp,
            cash,
        })
    }

    /// Records the settlement entry and closes the batch
    ///
    /// # Errors
    ///
    /// Returns error if the batch is not confirmed or already has an entry
    pub fn mark_settled(&mut self, entry_id: LedgerEntryId) -> Result<(), PettyCashError> {
        self.ensure_state(BatchState::Confirmed, "settle")?;
        if self.ledger_entry_id.is_some() {
            return Err(PettyCashError::invalid_state("settle", "already linked to a ledger entry"));
        }

        self.ledger_entry_id = Some(entry_id);
        self.state = BatchState::Settled;
        self.touch();
        Ok(())
    }

    /// Advances the persistence version; called by repositories on save
    pub fn increment_version(&mut self) {
        self.version += 1;
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_editable(&self, action: &str) -> Result<(), PettyCashError> {
        if self.state == BatchState::Settled {
            return Err(PettyCashError::invalid_state(action, self.state));
        }
        Ok(())
    }

    fn ensure_state(&self, expected: BatchState, action: &str) -> Result<(), PettyCashError> {
        if self.state != expected {
            return Err(PettyCashError::invalid_state(action, self.state));
        }
        Ok(())
    }

    fn position_of(&self, line_id: ExpenseLineId) -> Result<usize, PettyCashError> {
        self.lines
            .iter()
            .position(|l| l.id() == line_id)
            .ok_or_else(|| PettyCashError::not_found("Expense line", line_id))
    }

    fn set_totals(&mut self, totals: Totals) {
        self.total_amount = totals.amount;
        self.total_iva = totals.iva;
        self.total_idp = totals.idp;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Line sums of a batch; the grand total must also be representable
struct Totals {
    amount: Money,
    iva: Money,
    idp: Money,
}

impl Totals {
    fn of<'a>(
        mut lines: impl Iterator<Item = &'a ExpenseLine>,
        currency: Currency,
    ) -> Result<Self, MoneyError> {
        let zero = Money::zero(currency);
        let (amount, iva, idp) = lines.try_fold((zero, zero, zero), |(amount, iva, idp), line| {
            Ok::<_, MoneyError>((
                amount.checked_add(&line.amount())?,
                iva.checked_add(&line.iva())?,
                idp.checked_add(&line.idp())?,
            ))
        })?;
        amount.checked_add(&iva)?.checked_add(&idp)?;
        Ok(Self { amount, iva, idp })
    }
}

/// Returns true for an empty reference or an unassigned sentinel
pub fn is_unassigned(reference: &str) -> bool {
    let reference = reference.trim();
    reference.is_empty()
        || reference == UNASSIGNED_REFERENCE
        || UNASSIGNED_ALIASES.contains(&reference)
}
