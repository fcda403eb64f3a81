//! Tax computation for expense documents
//!
//! Every non-zero amount carries IVA at 12%. Fuel documents additionally
//! carry IDP at 5%. Rates are fixed.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, MoneyError, Rate};
use crate::line::DocumentCategory;

/// IVA (consumption tax) rate
pub const IVA_RATE: Rate = Rate::new(dec!(0.12));

/// IDP (fuel duty) rate
pub const IDP_RATE: Rate = Rate::new(dec!(0.05));

/// Taxes and total derived from one document amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub iva: Money,
    pub idp: Money,
    /// amount + iva + idp
    pub total: Money,
}

impl TaxBreakdown {
    /// All-zero breakdown in the amount's currency
    pub fn zero(amount: &Money) -> Self {
        let zero = Money::zero(amount.currency());
        Self { iva: zero, idp: zero, total: zero }
    }
}

/// Computes the tax split of a document amount
///
/// # Arguments
///
/// * `amount` - Base amount entered for the document
/// * `category` - Document category; only fuel carries IDP
///
/// # Errors
///
/// Returns `MoneyError::Overflow` if the amount is too large to tax
///
/// # Example
///
/// ```rust,ignore
/// let taxes = compute(&Money::new(dec!(100), Currency::GTQ), DocumentCategory::Fuel)?;
/// assert_eq!(taxes.total.amount(), dec!(117));
/// ```
pub fn compute(amount: &Money, category: DocumentCategory) -> Result<TaxBreakdown, MoneyError> {
    if amount.is_zero() {
        return Ok(TaxBreakdown::zero(amount));
    }

    let iva = IVA_RATE.apply(amount)?;
    let idp = match category {
        DocumentCategory::Fuel => IDP_RATE.apply(amount)?,
        DocumentCategory::Good | DocumentCategory::Service => Money::zero(amount.currency()),
    };
    let total = amount.checked_add(&iva)?.checked_add(&idp)?;

    Ok(TaxBreakdown { iva, idp, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;

    fn gtq(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::GTQ)
    }

    #[test]
    fn test_fuel_carries_idp() {
        let taxes = compute(&gtq(dec!(100)), DocumentCategory::Fuel).unwrap();
        assert_eq!(taxes.iva.amount(), dec!(12));
        assert_eq!(taxes.idp.amount(), dec!(5));
        assert_eq!(taxes.total.amount(), dec!(117));
    }

    #[test]
    fn test_goods_and_services_no_idp() {
        for category in [DocumentCategory::Good, DocumentCategory::Service] {
            let taxes = compute(&gtq(dec!(50)), category).unwrap();
            assert_eq!(taxes.iva.amount(), dec!(6));
            assert!(taxes.idp.is_zero());
            assert_eq!(taxes.total.amount(), dec!(56));
        }
    }

    #[test]
    fn test_zero_amount() {
        let taxes = compute(&gtq(dec!(0)), DocumentCategory::Fuel).unwrap();
        assert!(taxes.iva.is_zero());
        assert!(taxes.idp.is_zero());
        assert!(taxes.total.is_zero());
    }

    #[test]
    fn test_negative_amount_is_taxed() {
        let taxes = compute(&gtq(dec!(-10)), DocumentCategory::Good).unwrap();
        assert_eq!(taxes.iva.amount(), dec!(-1.2));
        assert_eq!(taxes.total.amount(), dec!(-11.2));
    }

    #[test]
    fn test_amount_too_large_to_tax() {
        let result = compute(&gtq(rust_decimal::Decimal::MAX), DocumentCategory::Fuel);
        assert_eq!(result, Err(MoneyError::Overflow));
    }

    #[test]
    fn test_rates_display() {
        assert_eq!(IVA_RATE.to_string(), "12%");
        assert_eq!(IDP_RATE.to_string(), "5%");
    }
}
