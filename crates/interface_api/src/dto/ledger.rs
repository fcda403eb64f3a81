//! Ledger DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use domain_ledger::{EntryLine, EntryState, LedgerEntry};

#[derive(Debug, Serialize)]
pub struct EntryLineResponse {
    pub id: Uuid,
    pub name: String,
    pub account_id: Uuid,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl From<&EntryLine> for EntryLineResponse {
    fn from(line: &EntryLine) -> Self {
        Self {
            id: *line.id.as_uuid(),
            name: line.name.clone(),
            account_id: *line.account_id.as_uuid(),
            debit: line.debit.amount(),
            credit: line.credit.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub journal_id: Uuid,
    pub date: NaiveDate,
    pub reference: String,
    pub source_type: Option<String>,
    pub source_id: Option<Uuid>,
    pub state: EntryState,
    pub lines: Vec<EntryLineResponse>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub created_at: DateTime<Utc>,
    pub posted_at: Option<DateTime<Utc>>,
}

impl From<&LedgerEntry> for EntryResponse {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            journal_id: *entry.journal_id.as_uuid(),
            date: entry.date,
            reference: entry.reference.clone(),
            source_type: entry.source_type.clone(),
            source_id: entry.source_id,
            state: entry.state,
            lines: entry.lines.iter().map(EntryLineResponse::from).collect(),
            total_debit: entry.lines.iter().map(|l| l.debit.amount()).sum(),
            total_credit: entry.lines.iter().map(|l| l.credit.amount()).sum(),
            created_at: entry.created_at,
            posted_at: entry.posted_at,
        }
    }
}
