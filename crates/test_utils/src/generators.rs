//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{Currency, Money};
use domain_petty_cash::{BatchCategory, DocumentCategory, DocumentType};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating non-negative amounts in centavos
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..100_000_000i64
}

/// Strategy for generating non-negative GTQ amounts
pub fn gtq_amount_strategy() -> impl Strategy<Value = Money> {
    amount_minor_strategy().prop_map(|minor| Money::from_minor(minor, Currency::GTQ))
}

/// Strategy for generating non-negative decimal amounts with two places
pub fn decimal_amount_strategy() -> impl Strategy<Value = Decimal> {
    amount_minor_strategy().prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for document categories
pub fn document_category_strategy() -> impl Strategy<Value = DocumentCategory> {
    prop_oneof![
        Just(DocumentCategory::Good),
        Just(DocumentCategory::Service),
        Just(DocumentCategory::Fuel),
    ]
}

/// Strategy for document types
pub fn document_type_strategy() -> impl Strategy<Value = DocumentType> {
    prop_oneof![
        Just(DocumentType::Invoice),
        Just(DocumentType::CreditNote),
        Just(DocumentType::Receipt),
    ]
}

/// Strategy for batch categories
pub fn batch_category_strategy() -> impl Strategy<Value = BatchCategory> {
    prop_oneof![
        Just(BatchCategory::Operations),
        Just(BatchCategory::Administration),
        Just(BatchCategory::Depreciation),
        Just(BatchCategory::SalesRefund),
        Just(BatchCategory::ManagementRefund),
    ]
}

/// Strategy for the lines of a batch as (amount, category) pairs
pub fn lines_strategy(max_lines: usize) -> impl Strategy<Value = Vec<(Decimal, DocumentCategory)>> {
    prop::collection::vec(
        (decimal_amount_strategy(), document_category_strategy()),
        1..=max_lines.max(1),
    )
}
