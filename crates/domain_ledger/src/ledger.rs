//! Double-entry ledger implementation
//!
//! This module provides the in-memory ledger book: the chart of accounts,
//! the journal registry and the entries posted into them.

use chrono::Utc;
use std::collections::HashMap;
use tracing::debug;

use core_kernel::{AccountId, CompanyId, Currency, JournalId, LedgerEntryId, Money};
use crate::account::{Account, PettyCashChartOfAccounts};
use crate::entry::{EntryState, LedgerEntry, NewEntry};
use crate::error::LedgerError;
use crate::journal::{Journal, JournalType};

/// The ledger book for one currency
///
/// # Invariants
///
/// - Posted entries always balance (debits = credits)
/// - Account balances are always consistent with posted entries
/// - Posted entries cannot be modified or discarded
#[derive(Debug)]
pub struct Ledger {
    /// Chart of accounts
    accounts: HashMap<AccountId, Account>,
    /// Journals in registration order
    journals: Vec<Journal>,
    /// Entries, draft and posted
    entries: HashMap<LedgerEntryId, LedgerEntry>,
    /// Running balances of posted entries
    balances: HashMap<AccountId, Money>,
    /// Ledger currency
    currency: Currency,
}

impl Ledger {
    /// Creates an empty ledger
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let ledger = Ledger::new(Currency::GTQ);
    /// ```
    pub fn new(currency: Currency) -> Self {
        Self {
            accounts: HashMap::new(),
            journals: Vec::new(),
            entries: HashMap::new(),
            balances: HashMap::new(),
            currency,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Adds an account to the chart of accounts
    ///
    /// # Errors
    ///
    /// Returns error if account already exists
    pub fn add_account(&mut self, account: Account) -> Result<(), LedgerError> {
        if self.accounts.contains_key(&account.id) {
            return Err(LedgerError::AccountAlreadyExists(account.id.to_string()));
        }

        let account_id = account.id;
        self.accounts.insert(account_id, account);
        self.balances.insert(account_id, Money::zero(self.currency));

        Ok(())
    }

    /// Registers the standard chart of accounts of a company together
    /// with its petty cash ("CSH1") and miscellaneous ("MISC") journals
    pub fn seed_company(&mut self, company_id: CompanyId) -> Result<(), LedgerError> {
        for account in PettyCashChartOfAccounts::create_standard_accounts(company_id) {
            self.add_account(account)?;
        }
        self.add_journal(Journal::new(company_id, "CSH1", "Petty Cash", JournalType::Cash));
        self.add_journal(Journal::new(company_id, "MISC", "Miscellaneous Operations", JournalType::General));
        debug!(company_id = %company_id, "Seeded standard chart of accounts");
        Ok(())
    }

    /// Marks an account as deprecated
    pub fn deprecate_account(&mut self, id: &AccountId) -> Result<(), LedgerError> {
        let account = self.accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;
        account.deprecated = true;
        Ok(())
    }

    /// Gets an account by ID
    pub fn get_account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Finds an account of a company by its code
    pub fn find_account_by_code(&self, company_id: CompanyId, code: &str) -> Option<&Account> {
        self.accounts
            .values()
            .find(|a| a.company_id == company_id && a.code == code)
    }

    /// Registers a journal
    pub fn add_journal(&mut self, journal: Journal) {
        self.journals.push(journal);
    }

    /// Gets a journal by ID
    pub fn get_journal(&self, id: &JournalId) -> Option<&Journal> {
        self.journals.iter().find(|j| &j.id == id)
    }

    /// Finds the first registered journal of the company whose type is one of `types`
    pub fn find_journal(&self, company_id: CompanyId, types: &[JournalType]) -> Option<&Journal> {
        self.journals
            .iter()
            .find(|j| j.company_id == company_id && types.contains(&j.journal_type))
    }

    /// Gets an entry by ID
    pub fn get_entry(&self, id: &LedgerEntryId) -> Option<&LedgerEntry> {
        self.entries.get(id)
    }

    /// Gets the posted balance of an account
    pub fn balance(&self, id: &AccountId) -> Option<Money> {
        self.balances.get(id).copied()
    }

    /// Stores a new draft entry
    ///
    /// Balance is not checked here: drafts may be unbalanced until posted.
    ///
    /// # Errors
    ///
    /// - Returns error if the journal doesn't exist
    /// - Returns error if any referenced account doesn't exist
    /// - Returns error if a line is in a foreign currency
    pub fn create_entry(&mut self, request: NewEntry) -> Result<LedgerEntryId, LedgerError> {
        let journal = self
            .get_journal(&request.journal_id)
            .ok_or_else(|| LedgerError::JournalNotFound(request.journal_id.to_string()))?;
        if journal.company_id != request.company_id {
            return Err(LedgerError::JournalNotFound(format!(
                "{} for company {}",
                request.journal_id, request.company_id
            )));
        }

        for line in &request.lines {
            if !self.accounts.contains_key(&line.account_id) {
                return Err(LedgerError::AccountNotFound(line.account_id.to_string()));
            }
            // Rejects foreign-currency lines
            line.debit.checked_add(&Money::zero(self.currency))?;
            line.credit.checked_add(&Money::zero(self.currency))?;
        }

        let entry = LedgerEntry::draft(request);
        let entry_id = entry.id;
        debug!(entry_id = %entry_id, lines = entry.lines.len(), "Draft ledger entry created");
        self.entries.insert(entry_id, entry);

        Ok(entry_id)
    }

    /// Posts a draft entry
    ///
    /// Validates the entry and updates all affected account balances.
    /// On any error the entry stays a draft and no balance changes.
    ///
    /// # Errors
    ///
    /// - Returns error if the entry doesn't exist or is already posted
    /// - Returns error if the entry has no lines or is not balanced
    /// - Returns error if any line targets a deprecated account
    pub fn post(&mut self, entry_id: &LedgerEntryId) -> Result<(), LedgerError> {
        let entry = self.entries
            .get(entry_id)
            .ok_or_else(|| LedgerError::EntryNotFound(entry_id.to_string()))?;

        if entry.state != EntryState::Draft {
            return Err(LedgerError::NotDraft {
                entry: entry_id.to_string(),
                state: format!("{:?}", entry.state),
            });
        }
        if entry.lines.is_empty() {
            return Err(LedgerError::EmptyEntry(entry_id.to_string()));
        }

        let debits = entry.total_debit(self.currency)?;
        let credits = entry.total_credit(self.currency)?;
        if debits != credits {
            return Err(LedgerError::UnbalancedEntry {
                debits: debits.amount(),
                credits: credits.amount(),
            });
        }

        let mut changes = Vec::with_capacity(entry.lines.len());
        for line in &entry.lines {
            let account = self.accounts
                .get(&line.account_id)
                .ok_or_else(|| LedgerError::AccountNotFound(line.account_id.to_string()))?;
            if account.deprecated {
                return Err(LedgerError::DeprecatedAccount(account.display_name()));
            }
            let change = if account.account_type.is_debit_normal() {
                line.debit.checked_sub(&line.credit)?
            } else {
                line.credit.checked_sub(&line.debit)?
            };
            changes.push((line.account_id, change));
        }

        for (account_id, change) in changes {
            let balance = self.balances
                .entry(account_id)
                .or_insert_with(|| Money::zero(self.currency));
            *balance = balance.checked_add(&change)?;
        }

        if let Some(entry) = self.entries.get_mut(entry_id) {
            entry.state = EntryState::Posted;
            entry.posted_at = Some(Utc::now());
        }

        Ok(())
    }

    /// Removes a draft entry
    ///
    /// # Errors
    ///
    /// Returns error if the entry doesn't exist or is posted
    pub fn discard(&mut self, entry_id: &LedgerEntryId) -> Result<LedgerEntry, LedgerError> {
        match self.entries.get(entry_id) {
            None => Err(LedgerError::EntryNotFound(entry_id.to_string())),
            Some(entry) if entry.state != EntryState::Draft => Err(LedgerError::NotDraft {
                entry: entry_id.to_string(),
                state: format!("{:?}", entry.state),
            }),
            Some(_) => self.entries
                .remove(entry_id)
                .ok_or_else(|| LedgerError::EntryNotFound(entry_id.to_string())),
        }
    }

    /// Number of stored entries, draft and posted
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountType;
    use crate::entry::EntryLineDraft;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    struct Setup {
        ledger: Ledger,
        company: CompanyId,
        journal: JournalId,
        cash: AccountId,
        expense: AccountId,
    }

    fn setup_ledger() -> Setup {
        let company = CompanyId::new();
        let mut ledger = Ledger::new(Currency::GTQ);

        let cash = Account::new(company, "1105", "Petty Cash Fund", AccountType::Asset);
        let expense = Account::new(company, "6100", "Operating Expenses", AccountType::Expense);
        let (cash_id, expense_id) = (cash.id, expense.id);
        ledger.add_account(cash).unwrap();
        ledger.add_account(expense).unwrap();

        let journal = Journal::new(company, "MISC", "Miscellaneous", JournalType::General);
        let journal_id = journal.id;
        ledger.add_journal(journal);

        Setup { ledger, company, journal: journal_id, cash: cash_id, expense: expense_id }
    }

    fn request(s: &Setup, debit: Money, credit: Money) -> NewEntry {
        NewEntry::new(s.journal, s.company, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), "test")
            .line(EntryLineDraft::debit("Expense", s.expense, debit))
            .line(EntryLineDraft::credit("Cash", s.cash, credit))
    }

    #[test]
    fn test_balanced_entry_posts() {
        let mut s = setup_ledger();
        let amount = Money::new(dec!(1000), Currency::GTQ);

        let id = s.ledger.create_entry(request(&s, amount, amount)).unwrap();
        s.ledger.post(&id).unwrap();

        assert!(s.ledger.get_entry(&id).unwrap().is_posted());
        assert_eq!(s.ledger.balance(&s.expense).unwrap().amount(), dec!(1000));
        assert_eq!(s.ledger.balance(&s.cash).unwrap().amount(), dec!(-1000));
    }

    #[test]
    fn test_unbalanced_entry_stays_draft() {
        let mut s = setup_ledger();

        let id = s.ledger.create_entry(request(
            &s,
            Money::new(dec!(1000), Currency::GTQ),
            Money::new(dec!(500), Currency::GTQ),
        )).unwrap();

        let result = s.ledger.post(&id);
        assert!(matches!(result, Err(LedgerError::UnbalancedEntry { .. })));
        assert_eq!(s.ledger.get_entry(&id).unwrap().state, EntryState::Draft);
        assert!(s.ledger.balance(&s.expense).unwrap().is_zero());
    }

    #[test]
    fn test_discard_only_drafts() {
        let mut s = setup_ledger();
        let amount = Money::new(dec!(10), Currency::GTQ);

        let draft = s.ledger.create_entry(request(&s, amount, amount)).unwrap();
        s.ledger.discard(&draft).unwrap();
        assert!(s.ledger.get_entry(&draft).is_none());

        let posted = s.ledger.create_entry(request(&s, amount, amount)).unwrap();
        s.ledger.post(&posted).unwrap();
        assert!(matches!(s.ledger.discard(&posted), Err(LedgerError::NotDraft { .. })));
    }
}
