//! Journals (ledger books)

use serde::{Deserialize, Serialize};

use core_kernel::{CompanyId, JournalId};

/// Kind of ledger book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalType {
    Sale,
    Purchase,
    Cash,
    Bank,
    General,
}

impl JournalType {
    /// Journal types that may receive a petty cash settlement
    pub fn settlement_types() -> &'static [JournalType] {
        &[JournalType::Cash, JournalType::Bank, JournalType::General]
    }
}

/// A named ledger book entries are posted into
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub id: JournalId,
    pub company_id: CompanyId,
    /// Short code (e.g., "CSH1")
    pub code: String,
    pub name: String,
    pub journal_type: JournalType,
}

impl Journal {
    pub fn new(
        company_id: CompanyId,
        code: impl Into<String>,
        name: impl Into<String>,
        journal_type: JournalType,
    ) -> Self {
        Self {
            id: JournalId::new_v7(),
            company_id,
            code: code.into(),
            name: name.into(),
            journal_type,
        }
    }
}
