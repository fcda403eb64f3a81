//! Account types for the chart of accounts
//!
//! Accounts belong to one company. A deprecated account stays in the chart
//! for history but can no longer be selected or posted to.

use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, CompanyId};

/// Types of accounts in the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// Asset accounts (debit normal balance)
    Asset,
    /// Liability accounts (credit normal balance)
    Liability,
    /// Equity accounts (credit normal balance)
    Equity,
    /// Revenue accounts (credit normal balance)
    Revenue,
    /// Expense accounts (debit normal balance)
    Expense,
}

impl AccountType {
    /// Returns true if this account type has a debit normal balance
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }
}

/// An account in the chart of accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Owning company
    pub company_id: CompanyId,
    /// Account code (e.g., "1105")
    pub code: String,
    /// Account name
    pub name: String,
    /// Account type
    pub account_type: AccountType,
    /// Deprecated accounts are kept for history only
    pub deprecated: bool,
}

impl Account {
    /// Creates a new, active account
    ///
    /// # Arguments
    ///
    /// * `company_id` - Company owning the account
    /// * `code` - Account code
    /// * `name` - Account name
    /// * `account_type` - Type of account
    pub fn new(
        company_id: CompanyId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            id: AccountId::new_v7(),
            company_id,
            code: code.into(),
            name: name.into(),
            account_type,
            deprecated: false,
        }
    }

    /// Marks the account as deprecated
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Returns the display label `code name`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.code, self.name)
    }
}

/// Standard chart of accounts for petty cash bookkeeping
pub struct PettyCashChartOfAccounts;

impl PettyCashChartOfAccounts {
    /// Code of the petty cash fund account
    pub const CASH_FUND: &'static str = "1105";
    /// Code of the IVA tax credit account
    pub const IVA_CREDIT: &'static str = "1180";
    /// Code of the IDP account
    pub const IDP: &'static str = "1185";
    /// Code of the petty cash provision account
    pub const PROVISION: &'static str = "2150";
    /// Code of the operating expense account
    pub const OPERATING_EXPENSE: &'static str = "6100";

    /// Creates the standard accounts for one company
    pub fn create_standard_accounts(company_id: CompanyId) -> Vec<Account> {
        vec![
            // Assets
            Account::new(company_id, "1101", "Cash on Hand", AccountType::Asset),
            Account::new(company_id, Self::CASH_FUND, "Petty Cash Fund", AccountType::Asset),
            Account::new(company_id, "1110", "Bank Accounts", AccountType::Asset),
            Account::new(company_id, Self::IVA_CREDIT, "IVA Tax Credit", AccountType::Asset),
            Account::new(company_id, Self::IDP, "IDP Fuel Duty", AccountType::Asset),

            // Liabilities
            Account::new(company_id, Self::PROVISION, "Petty Cash Provision", AccountType::Liability),
            Account::new(company_id, "2160", "Reimbursements Payable", AccountType::Liability),

            // Equity
            Account::new(company_id, "3100", "Retained Earnings", AccountType::Equity),

            // Revenue
            Account::new(company_id, "4100", "Sales", AccountType::Revenue),

            // Expenses
            Account::new(company_id, Self::OPERATING_EXPENSE, "Operating Expenses", AccountType::Expense),
            Account::new(company_id, "6200", "Administrative Expenses", AccountType::Expense),
            Account::new(company_id, "6300", "Depreciation Expense", AccountType::Expense),
            Account::new(company_id, "6400", "Sales Refunds", AccountType::Expense),
            Account::new(company_id, "6500", "Management Refunds", AccountType::Expense),
            Account::new(company_id, "6900", "Miscellaneous Expenses (old)", AccountType::Expense)
                .deprecated(),
        ]
    }
}
