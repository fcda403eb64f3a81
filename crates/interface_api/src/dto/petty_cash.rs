//! Petty cash DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{CompanyId, Currency, JournalId, UserId};
use domain_petty_cash::{
    BatchAccounts, BatchCategory, BatchState, DocumentCategory, DocumentType, ExpenseBatch,
    ExpenseLine, NewBatch, NewLine, Notification, PettyCashError,
};

#[derive(Debug, Deserialize)]
pub struct CreateBatchRequest {
    pub date: NaiveDate,
    pub category: BatchCategory,
    /// Explicit reference; drawn from the sequence when absent or "New"
    pub reference: Option<String>,
    pub supervisor_id: Option<Uuid>,
    pub journal_id: Option<Uuid>,
    #[serde(default)]
    pub accounts: BatchAccounts,
    #[serde(default)]
    pub lines: Vec<NewLine>,
}

impl CreateBatchRequest {
    /// Converts the request for the company and currency the server books for
    pub fn into_new_batch(self, company_id: CompanyId, currency: Currency) -> NewBatch {
        NewBatch {
            company_id,
            currency,
            date: self.date,
            category: self.category,
            reference: self.reference,
            supervisor: self.supervisor_id.map(UserId::from_uuid),
            journal_id: self.journal_id.map(JournalId::from_uuid),
            accounts: self.accounts,
            lines: self.lines,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListBatchesQuery {
    pub state: Option<BatchState>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettleRequest {
    /// Posts the generated entry right away
    #[serde(default)]
    pub post_immediately: bool,
}

#[derive(Debug, Serialize)]
pub struct LineResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub document_type: DocumentType,
    pub series: String,
    pub number: String,
    pub category: DocumentCategory,
    pub amount: Decimal,
    pub iva: Decimal,
    pub idp: Decimal,
    pub total: Decimal,
}

impl From<&ExpenseLine> for LineResponse {
    fn from(line: &ExpenseLine) -> Self {
        Self {
            id: *line.id().as_uuid(),
            date: line.date(),
            document_type: line.document_type(),
            series: line.series().to_string(),
            number: line.number().to_string(),
            category: line.category(),
            amount: line.amount().amount(),
            iva: line.iva().amount(),
            idp: line.idp().amount(),
            total: line.total().amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub id: Uuid,
    pub reference: String,
    pub company_id: Uuid,
    pub currency: Currency,
    pub date: NaiveDate,
    pub category: BatchCategory,
    pub state: BatchState,
    pub supervisor_id: Option<Uuid>,
    pub journal_id: Option<Uuid>,
    pub accounts: BatchAccounts,
    pub lines: Vec<LineResponse>,
    pub total_amount: Decimal,
    pub total_iva: Decimal,
    pub total_idp: Decimal,
    pub grand_total: Decimal,
    pub ledger_entry_id: Option<Uuid>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&ExpenseBatch> for BatchResponse {
    type Error = PettyCashError;

    fn try_from(batch: &ExpenseBatch) -> Result<Self, Self::Error> {
        let grand_total = batch.grand_total()?.amount();

        Ok(Self {
            id: *batch.id().as_uuid(),
            reference: batch.reference().to_string(),
            company_id: *batch.company_id().as_uuid(),
            currency: batch.currency(),
            date: batch.date(),
            category: batch.category(),
            state: batch.state(),
            supervisor_id: batch.supervisor().map(|id| *id.as_uuid()),
            journal_id: batch.journal_id().map(|id| *id.as_uuid()),
            accounts: batch.accounts(),
            lines: batch.lines().iter().map(LineResponse::from).collect(),
            total_amount: batch.total_amount().amount(),
            total_iva: batch.total_iva().amount(),
            total_idp: batch.total_idp().amount(),
            grand_total,
            ledger_entry_id: batch.ledger_entry_id().map(|id| *id.as_uuid()),
            version: batch.version(),
            created_at: batch.created_at(),
            updated_at: batch.updated_at(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub title: String,
    pub message: String,
    pub sticky: bool,
}

impl From<Notification> for NotificationResponse {
    fn from(notice: Notification) -> Self {
        Self {
            title: notice.title,
            message: notice.message,
            sticky: notice.sticky,
        }
    }
}
