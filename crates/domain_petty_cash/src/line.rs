//! Expense lines
//!
//! One line per source document. IVA, IDP and the line total are derived
//! from the amount and the document category and are never set directly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ExpenseLineId, Money, MoneyError};
use crate::tax::{self, TaxBreakdown};

/// Kind of source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Invoice,
    CreditNote,
    Receipt,
}

/// Category of the purchased item, drives tax computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Good,
    Service,
    /// Fuel purchases carry IDP
    Fuel,
}

/// Partial update of a line; `None` keeps the current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineUpdate {
    pub date: Option<NaiveDate>,
    pub document_type: Option<DocumentType>,
    pub series: Option<String>,
    pub number: Option<String>,
    pub category: Option<DocumentCategory>,
    /// New amount in the batch currency
    pub amount: Option<Decimal>,
}

/// A source document within a petty cash batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseLine {
    id: ExpenseLineId,
    date: NaiveDate,
    document_type: DocumentType,
    series: String,
    number: String,
    category: DocumentCategory,
    amount: Money,
    iva: Money,
    idp: Money,
    total: Money,
}

impl ExpenseLine {
    /// Creates a line and computes its taxes
    ///
    /// # Arguments
    ///
    /// * `date` - Document date
    /// * `document_type` - Invoice, credit note or receipt
    /// * `category` - Good, service or fuel
    /// * `amount` - Base amount
    ///
    /// # Errors
    ///
    /// Returns error if the amount is too large to tax
    pub fn new(
        date: NaiveDate,
        document_type: DocumentType,
        category: DocumentCategory,
        amount: Money,
    ) -> Result<Self, MoneyError> {
        let taxes = tax::compute(&amount, category)?;
        Ok(Self {
            id: ExpenseLineId::new_v7(),
            date,
            document_type,
            series: String::new(),
            number: String::new(),
            category,
            amount,
            iva: taxes.iva,
            idp: taxes.idp,
            total: taxes.total,
        })
    }

    /// Sets the document series and number
    pub fn with_document(mut self, series: impl Into<String>, number: impl Into<String>) -> Self {
        self.series = series.into();
        self.number = number.into();
        self
    }

    pub fn id(&self) -> ExpenseLineId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn category(&self) -> DocumentCategory {
        self.category
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn iva(&self) -> Money {
        self.iva
    }

    pub fn idp(&self) -> Money {
        self.idp
    }

    /// amount + iva + idp
    pub fn total(&self) -> Money {
        self.total
    }

    /// Current tax split
    pub fn taxes(&self) -> TaxBreakdown {
        TaxBreakdown {
            iva: self.iva,
            idp: self.idp,
            total: self.total,
        }
    }

    /// Changes the amount and recomputes taxes
    ///
    /// The line is left unchanged when the taxes cannot be computed.
    pub fn set_amount(&mut self, amount: Money) -> Result<(), MoneyError> {
        self.retax(amount, self.category)
    }

    /// Changes the category and recomputes taxes
    pub fn set_category(&mut self, category: DocumentCategory) -> Result<(), MoneyError> {
        self.retax(self.amount, category)
    }

    /// Applies a partial update in the line's currency
    ///
    /// Nothing changes when the updated amount cannot be taxed.
    pub(crate) fn apply(&mut self, update: LineUpdate) -> Result<(), MoneyError> {
        let category = update.category.unwrap_or(self.category);
        let amount = update
            .amount
            .map_or(self.amount, |amount| Money::new(amount, self.amount.currency()));
        self.retax(amount, category)?;

        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(document_type) = update.document_type {
            self.document_type = document_type;
        }
        if let Some(series) = update.series {
            self.series = series;
        }
        if let Some(number) = update.number {
            self.number = number;
        }
        Ok(())
    }

    fn retax(&mut self, amount: Money, category: DocumentCategory) -> Result<(), MoneyError> {
        let taxes = tax::compute(&amount, category)?;
        self.amount = amount;
        self.category = category;
        self.iva = taxes.iva;
        self.idp = taxes.idp;
        self.total = taxes.total;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn line(amount: Decimal, category: DocumentCategory) -> ExpenseLine {
        ExpenseLine::new(
            NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            DocumentType::Invoice,
            category,
            Money::new(amount, Currency::GTQ),
        )
        .unwrap()
    }

    #[test]
    fn test_new_line_computes_taxes() {
        let line = line(dec!(100), DocumentCategory::Fuel).with_document("A", "001");
        assert_eq!(line.iva().amount(), dec!(12));
        assert_eq!(line.idp().amount(), dec!(5));
        assert_eq!(line.total().amount(), dec!(117));
        assert_eq!(line.series(), "A");
        assert_eq!(line.number(), "001");
    }

    #[test]
    fn test_category_change_recomputes() {
        let mut line = line(dec!(100), DocumentCategory::Fuel);
        line.set_category(DocumentCategory::Service).unwrap();

        assert!(line.idp().is_zero());
        assert_eq!(line.total().amount(), dec!(112));
    }

    #[test]
    fn test_amount_change_recomputes() {
        let mut line = line(dec!(100), DocumentCategory::Good);
        line.set_amount(Money::zero(Currency::GTQ)).unwrap();

        assert!(line.iva().is_zero());
        assert!(line.total().is_zero());
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut line = line(dec!(10), DocumentCategory::Good).with_document("B", "77");
        line.apply(LineUpdate {
            amount: Some(dec!(20)),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(line.amount().amount(), dec!(20));
        assert_eq!(line.amount().currency(), Currency::GTQ);
        assert_eq!(line.iva().amount(), dec!(2.4));
        assert_eq!(line.series(), "B");
        assert_eq!(line.document_type(), DocumentType::Invoice);
    }

    #[test]
    fn test_untaxable_amount_leaves_line_unchanged() {
        let mut line = line(dec!(10), DocumentCategory::Fuel);
        let result = line.apply(LineUpdate {
            amount: Some(Decimal::MAX),
            series: Some("Z".to_string()),
            ..Default::default()
        });

        assert_eq!(result, Err(MoneyError::Overflow));
        assert_eq!(line.amount().amount(), dec!(10));
        assert_eq!(line.total().amount(), dec!(11.7));
        assert_eq!(line.series(), "");
    }

    #[test]
    fn test_new_line_rejects_untaxable_amount() {
        let result = ExpenseLine::new(
            NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            DocumentType::Receipt,
            DocumentCategory::Good,
            Money::new(Decimal::MAX, Currency::GTQ),
        );
        assert_eq!(result, Err(MoneyError::Overflow));
    }
}
