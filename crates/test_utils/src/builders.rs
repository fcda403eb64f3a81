//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{CompanyId, Currency, Money};
use domain_petty_cash::{
    BatchAccounts, BatchCategory, DocumentCategory, DocumentType, ExpenseBatch, ExpenseLine,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::fixtures::DateFixtures;

/// Builder for constructing expense batches
pub struct ExpenseBatchBuilder {
    company_id: CompanyId,
    currency: Currency,
    date: NaiveDate,
    category: BatchCategory,
    reference: Option<String>,
    lines: Vec<(Decimal, DocumentCategory)>,
    accounts: BatchAccounts,
    confirmed: bool,
}

impl Default for ExpenseBatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseBatchBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            company_id: CompanyId::new(),
            currency: Currency::GTQ,
            date: DateFixtures::settlement_date(),
            category: BatchCategory::Operations,
            reference: None,
            lines: Vec::new(),
            accounts: BatchAccounts::default(),
            confirmed: false,
        }
    }

    /// Sets the owning company
    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = company_id;
        self
    }

    /// Sets the batch category
    pub fn with_category(mut self, category: BatchCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Adds an invoice line
    pub fn with_line(mut self, amount: Decimal, category: DocumentCategory) -> Self {
        self.lines.push((amount, category));
        self
    }

    /// Sets the account selections
    pub fn with_accounts(mut self, accounts: BatchAccounts) -> Self {
        self.accounts = accounts;
        self
    }

    /// Confirms the batch when built
    pub fn confirmed(mut self) -> Self {
        self.confirmed = true;
        self
    }

    /// Builds the batch
    pub fn build(self) -> ExpenseBatch {
        let mut batch = ExpenseBatch::new(self.company_id, self.currency, self.date, self.category);
        if let Some(reference) = self.reference {
            batch.assign_reference(reference);
        }
        for (amount, category) in self.lines {
            let line = ExpenseLine::new(
                DateFixtures::document_date(),
                DocumentType::Invoice,
                category,
                Money::new(amount, self.currency),
            )
            .expect("Builder amounts are taxable");
            batch.add_line(line).expect("Draft batch accepts lines");
        }
        batch.assign_accounts(self.accounts).expect("Draft batch accepts accounts");
        if self.confirmed {
            batch.confirm().expect("Draft batch can be confirmed");
        }
        batch
    }
}

/// Builder for JSON bodies of the batch creation endpoint
#[derive(Default)]
pub struct CreateBatchBodyBuilder {
    reference: Option<String>,
    accounts: Option<BatchAccounts>,
    lines: Vec<Value>,
}

impl CreateBatchBodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the account selections
    pub fn with_accounts(mut self, accounts: BatchAccounts) -> Self {
        self.accounts = Some(accounts);
        self
    }

    /// Adds an invoice line
    pub fn with_line(mut self, amount: Decimal, category: &str) -> Self {
        self.lines.push(line_body(amount, category));
        self
    }

    /// Builds the JSON body
    pub fn build(self) -> Value {
        let mut body = json!({
            "date": DateFixtures::settlement_date(),
            "category": "operations",
            "lines": self.lines,
        });
        if let Some(reference) = self.reference {
            body["reference"] = json!(reference);
        }
        if let Some(accounts) = self.accounts {
            body["accounts"] = accounts_body(&accounts);
        }
        body
    }
}

/// JSON body of a line
pub fn line_body(amount: Decimal, category: &str) -> Value {
    json!({
        "date": DateFixtures::document_date(),
        "document_type": "invoice",
        "series": "A",
        "number": "1001",
        "category": category,
        "amount": amount.to_string(),
    })
}

/// JSON body of an account selection
pub fn accounts_body(accounts: &BatchAccounts) -> Value {
    json!({
        "expense": accounts.expense,
        "iva": accounts.iva,
        "idp": accounts.idp,
        "cash": accounts.cash,
    })
}
