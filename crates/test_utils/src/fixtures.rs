//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the petty cash system: a ledger book
//! seeded with the standard chart of accounts and journals, and handles to
//! the accounts settlement tests need.

use chrono::NaiveDate;
use core_kernel::{AccountId, CompanyId, Currency, JournalId, Money};
use domain_ledger::{JournalType, Ledger, PettyCashChartOfAccounts};
use domain_petty_cash::BatchAccounts;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Q100.00, the base amount of the fuel scenario
    pub fn gtq_100() -> Money {
        Money::new(dec!(100.00), Currency::GTQ)
    }

    /// Q50.00, the base amount of the goods scenario
    pub fn gtq_50() -> Money {
        Money::new(dec!(50.00), Currency::GTQ)
    }

    pub fn gtq_zero() -> Money {
        Money::zero(Currency::GTQ)
    }

    /// Creates a GTQ amount
    pub fn gtq(amount: Decimal) -> Money {
        Money::new(amount, Currency::GTQ)
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    /// Accounting date used by settlement scenarios
    pub fn settlement_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 31).unwrap()
    }

    /// Date of the source documents
    pub fn document_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
    }
}

/// Accounts and journals of a seeded company
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardAccounts {
    pub company_id: CompanyId,
    pub expense: AccountId,
    pub iva: AccountId,
    pub idp: AccountId,
    pub cash: AccountId,
    /// A deprecated expense account
    pub deprecated: AccountId,
    /// First settlement-capable journal
    pub cash_journal: JournalId,
    pub general_journal: JournalId,
}

impl StandardAccounts {
    /// Looks up the standard accounts of a company in a seeded ledger
    ///
    /// # Panics
    ///
    /// Panics if the ledger was not seeded for the company
    pub fn from_ledger(ledger: &Ledger, company_id: CompanyId) -> Self {
        let account = |code: &str| {
            ledger
                .find_account_by_code(company_id, code)
                .unwrap_or_else(|| panic!("Account {} not seeded", code))
                .id
        };
        let cash_journal = ledger
            .find_journal(company_id, &[JournalType::Cash])
            .expect("Cash journal not seeded")
            .id;
        let general_journal = ledger
            .find_journal(company_id, &[JournalType::General])
            .expect("General journal not seeded")
            .id;

        Self {
            company_id,
            expense: account(PettyCashChartOfAccounts::OPERATING_EXPENSE),
            iva: account(PettyCashChartOfAccounts::IVA_CREDIT),
            idp: account(PettyCashChartOfAccounts::IDP),
            cash: account(PettyCashChartOfAccounts::CASH_FUND),
            deprecated: account("6900"),
            cash_journal,
            general_journal,
        }
    }

    /// All four settlement accounts selected
    pub fn batch_accounts(&self) -> BatchAccounts {
        BatchAccounts {
            expense: Some(self.expense),
            iva: Some(self.iva),
            idp: Some(self.idp),
            cash: Some(self.cash),
        }
    }
}

/// Creates a GTQ ledger seeded for a new company
pub fn seeded_ledger() -> (Ledger, StandardAccounts) {
    let company_id = CompanyId::new();
    let mut ledger = Ledger::new(Currency::GTQ);
    ledger.seed_company(company_id).expect("Fresh ledger cannot hold duplicates");
    let accounts = StandardAccounts::from_ledger(&ledger, company_id);
    (ledger, accounts)
}
