//! Petty cash domain services
//!
//! This module contains the application service that runs each user action
//! (create, edit, confirm, settle, print) as one unit of work against the
//! collaborator ports.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use core_kernel::{
    CompanyId, Currency, ExpenseBatchId, ExpenseLineId, JournalId, LedgerEntryId,
    Money, OperationMetadata, UserId,
};
use domain_ledger::{JournalType, LedgerEntry};

use crate::batch::{is_unassigned, BatchAccounts, BatchCategory, BatchState, ExpenseBatch};
use crate::error::PettyCashError;
use crate::line::{DocumentCategory, DocumentType, ExpenseLine, LineUpdate};
use crate::ports::{
    BatchQuery, ChartOfAccountsPort, ExpenseBatchRepository, JournalRegistryPort,
    LedgerPostingPort, SequencePort,
};
use crate::reference;
use crate::report::Notification;
use crate::settlement;

/// Request for a new expense line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLine {
    pub date: NaiveDate,
    pub document_type: DocumentType,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub number: String,
    pub category: DocumentCategory,
    /// Amount in the batch currency; zero when omitted
    #[serde(default)]
    pub amount: Decimal,
}

impl NewLine {
    fn into_line(self, currency: Currency) -> Result<ExpenseLine, PettyCashError> {
        let line = ExpenseLine::new(
            self.date,
            self.document_type,
            self.category,
            Money::new(self.amount, currency),
        )?;
        Ok(line.with_document(self.series, self.number))
    }
}

/// Request for a new batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatch {
    pub company_id: CompanyId,
    pub currency: Currency,
    pub date: NaiveDate,
    pub category: BatchCategory,
    /// Explicit reference; drawn from the sequence when absent
    pub reference: Option<String>,
    pub supervisor: Option<UserId>,
    pub journal_id: Option<JournalId>,
    #[serde(default)]
    pub accounts: BatchAccounts,
    #[serde(default)]
    pub lines: Vec<NewLine>,
}

impl NewBatch {
    /// Creates an empty request
    pub fn new(company_id: CompanyId, currency: Currency, date: NaiveDate, category: BatchCategory) -> Self {
        Self {
            company_id,
            currency,
            date,
            category,
            reference: None,
            supervisor: None,
            journal_id: None,
            accounts: BatchAccounts::default(),
            lines: Vec::new(),
        }
    }

    pub fn with_accounts(mut self, accounts: BatchAccounts) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_journal(mut self, journal_id: JournalId) -> Self {
        self.journal_id = Some(journal_id);
        self
    }

    pub fn with_line(mut self, line: NewLine) -> Self {
        self.lines.push(line);
        self
    }
}

/// Service for petty cash batches
///
/// Each public method is one unit of work. Batches are read, changed
/// in memory and saved once; a stale save is rejected by the repository.
pub struct PettyCashService {
    repository: Arc<dyn ExpenseBatchRepository>,
    sequence: Arc<dyn SequencePort>,
    accounts: Arc<dyn ChartOfAccountsPort>,
    journals: Arc<dyn JournalRegistryPort>,
    ledger: Arc<dyn LedgerPostingPort>,
}

impl PettyCashService {
    /// Creates a new service
    ///
    /// # Arguments
    ///
    /// * `repository` - Batch persistence
    /// * `sequence` - Reference numbering
    /// * `accounts` - Chart of accounts lookup
    /// * `journals` - Journal registry
    /// * `ledger` - Ledger-posting subsystem
    pub fn new(
        repository: Arc<dyn ExpenseBatchRepository>,
        sequence: Arc<dyn SequencePort>,
        accounts: Arc<dyn ChartOfAccountsPort>,
        journals: Arc<dyn JournalRegistryPort>,
        ledger: Arc<dyn LedgerPostingPort>,
    ) -> Self {
        Self {
            repository,
            sequence,
            accounts,
            journals,
            ledger,
        }
    }

    // ========================================================================
    // Creation and queries
    // ========================================================================

    /// Creates a draft batch and assigns its reference
    ///
    /// # Errors
    ///
    /// - Returns error if a selected account or journal is invalid for the company
    /// - Returns error if a collaborator fails
    pub async fn create_batch(&self, request: NewBatch) -> Result<ExpenseBatch, PettyCashError> {
        let mut batch = ExpenseBatch::new(
            request.company_id,
            request.currency,
            request.date,
            request.category,
        );

        self.validate_accounts(batch.company_id(), &request.accounts).await?;
        if let Some(journal_id) = request.journal_id {
            self.validate_journal(batch.company_id(), journal_id).await?;
        }

        for line in request.lines {
            batch.add_line(line.into_line(request.currency)?)?;
        }
        batch.assign_accounts(request.accounts)?;
        batch.set_journal(request.journal_id)?;
        batch.set_supervisor(request.supervisor)?;

        let reference = match request.reference {
            Some(reference) if !is_unassigned(&reference) => reference,
            _ => reference::next_reference(self.sequence.as_ref(), None).await?,
        };
        batch.assign_reference(reference);

        let batch = self.repository.insert(batch, None).await?;
        info!(
            batch_id = %batch.id(),
            reference = %batch.reference(),
            lines = batch.lines().len(),
            "Petty cash batch created"
        );
        Ok(batch)
    }

    /// Creates several batches, one after the other
    pub async fn create_batches(&self, requests: Vec<NewBatch>) -> Result<Vec<ExpenseBatch>, PettyCashError> {
        let mut created = Vec::with_capacity(requests.len());
        for request in requests {
            created.push(self.create_batch(request).await?);
        }
        Ok(created)
    }

    /// Retrieves a batch
    pub async fn get_batch(&self, id: ExpenseBatchId) -> Result<ExpenseBatch, PettyCashError> {
        self.load(id).await
    }

    /// Lists batches
    pub async fn list_batches(&self, query: BatchQuery) -> Result<Vec<ExpenseBatch>, PettyCashError> {
        Ok(self.repository.list(query, None).await?)
    }

    /// Deletes a batch together with its lines
    ///
    /// # Errors
    ///
    /// Returns error if the batch is settled
    pub async fn delete_batch(&self, id: ExpenseBatchId) -> Result<(), PettyCashError> {
        let batch = self.load(id).await?;
        if batch.ledger_entry_id().is_some() {
            return Err(PettyCashError::invalid_state("delete", batch.state()));
        }

        self.repository.delete(id, None).await?;
        info!(batch_id = %id, reference = %batch.reference(), "Petty cash batch deleted");
        Ok(())
    }

    /// Retrieves the ledger entry of a settled batch
    pub async fn get_entry(&self, id: LedgerEntryId) -> Result<LedgerEntry, PettyCashError> {
        self.ledger.get_entry(id, None).await.map_err(|e| {
            if e.is_not_found() {
                PettyCashError::not_found("Ledger entry", id)
            } else {
                e.into()
            }
        })
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Adds a line to a batch
    pub async fn add_line(&self, id: ExpenseBatchId, line: NewLine) -> Result<ExpenseBatch, PettyCashError> {
        let mut batch = self.load(id).await?;
        let line = line.into_line(batch.currency())?;
        batch.add_line(line)?;
        self.store(batch).await
    }

    /// Updates a line of a batch
    pub async fn update_line(
        &self,
        id: ExpenseBatchId,
        line_id: ExpenseLineId,
        update: LineUpdate,
    ) -> Result<ExpenseBatch, PettyCashError> {
        let mut batch = self.load(id).await?;
        batch.update_line(line_id, update)?;
        self.store(batch).await
    }

    /// Removes a line from a batch
    pub async fn remove_line(
        &self,
        id: ExpenseBatchId,
        line_id: ExpenseLineId,
    ) -> Result<ExpenseBatch, PettyCashError> {
        let mut batch = self.load(id).await?;
        batch.remove_line(line_id)?;
        self.store(batch).await
    }

    /// Replaces the account selections of a batch
    ///
    /// # Errors
    ///
    /// Returns error if an account is unknown, deprecated or owned by another company
    pub async fn assign_accounts(
        &self,
        id: ExpenseBatchId,
        accounts: BatchAccounts,
    ) -> Result<ExpenseBatch, PettyCashError> {
        let mut batch = self.load(id).await?;
        self.validate_accounts(batch.company_id(), &accounts).await?;
        batch.assign_accounts(accounts)?;
        self.store(batch).await
    }

    /// Sets or clears the settlement journal of a batch
    pub async fn set_journal(
        &self,
        id: ExpenseBatchId,
        journal_id: Option<JournalId>,
    ) -> Result<ExpenseBatch, PettyCashError> {
        let mut batch = self.load(id).await?;
        if let Some(journal_id) = journal_id {
            self.validate_journal(batch.company_id(), journal_id).await?;
        }
        batch.set_journal(journal_id)?;
        self.store(batch).await
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Confirms a draft batch
    pub async fn confirm(&self, id: ExpenseBatchId) -> Result<ExpenseBatch, PettyCashError> {
        let mut batch = self.load(id).await?;
        batch.confirm()?;
        let batch = self.store(batch).await?;

        info!(batch_id = %batch.id(), reference = %batch.reference(), "Petty cash batch confirmed");
        Ok(batch)
    }

    /// Confirms several batches; nothing changes unless all are drafts
    pub async fn confirm_all(&self, ids: &[ExpenseBatchId]) -> Result<Vec<ExpenseBatch>, PettyCashError> {
        let mut batches = Vec::with_capacity(ids.len());
        for id in ids {
            let mut batch = self.load(*id).await?;
            batch.confirm()?;
            batches.push(batch);
        }

        let mut confirmed = Vec::with_capacity(batches.len());
        for batch in batches {
            let batch = self.store(batch).await?;
            info!(batch_id = %batch.id(), reference = %batch.reference(), "Petty cash batch confirmed");
            confirmed.push(batch);
        }
        Ok(confirmed)
    }

    /// Settles a confirmed batch into a ledger entry
    ///
    /// This method:
    /// 1. Checks state, lines and required accounts
    /// 2. Resolves the journal (selected, or the company's first cash/bank/general journal)
    /// 3. Creates the draft ledger entry
    /// 4. Links the entry and marks the batch settled in one save
    /// 5. Optionally posts the entry; a posting failure is logged and ignored
    ///
    /// If the save loses a concurrent race the draft entry is discarded.
    /// The call fails with `InvalidState` when the competing change left
    /// the batch unsettleable, and with the port conflict otherwise.
    ///
    /// # Arguments
    ///
    /// * `id` - Batch to settle
    /// * `post_immediately` - Whether to post the entry after creating it
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the batch is not confirmed
    /// - `Validation` if the batch has no lines or lacks a required account
    /// - `Operation` if no journal can be resolved
    pub async fn settle(&self, id: ExpenseBatchId, post_immediately: bool) -> Result<ExpenseBatch, PettyCashError> {
        let mut batch = self.load(id).await?;
        let accounts = batch.check_settleable()?;
        let journal_id = self.resolve_journal(&batch).await?;

        let request = settlement::build_entry(&batch, &accounts, journal_id)?;
        let metadata = Self::metadata(&batch);
        let entry_id = self.ledger.create_entry(request, metadata.clone()).await?;

        batch.mark_settled(entry_id)?;
        let batch = match self.repository.save(batch, metadata.clone()).await {
            Ok(batch) => batch,
            Err(save_error) => {
                if let Err(discard_error) = self.ledger.discard_entry(entry_id, metadata).await {
                    error!(
                        batch_id = %id,
                        entry_id = %entry_id,
                        error = %discard_error,
                        "Failed to discard ledger entry of unsaved settlement"
                    );
                }
                if save_error.is_conflict() {
                    let current = self.load(id).await?;
                    if current.state() != BatchState::Confirmed {
                        return Err(PettyCashError::invalid_state("settle", current.state()));
                    }
                }
                return Err(save_error.into());
            }
        };

        if post_immediately {
            if let Err(post_error) = self.ledger.post_entry(entry_id, Self::metadata(&batch)).await {
                warn!(
                    batch_id = %batch.id(),
                    entry_id = %entry_id,
                    error = %post_error,
                    "Posting settlement entry failed, entry left in draft"
                );
            }
        }

        let total = batch.grand_total()?;
        info!(
            batch_id = %batch.id(),
            reference = %batch.reference(),
            entry_id = %entry_id,
            total = %total,
            "Petty cash batch settled"
        );
        Ok(batch)
    }

    /// Settles several batches after checking all of their preconditions
    pub async fn settle_all(
        &self,
        ids: &[ExpenseBatchId],
        post_immediately: bool,
    ) -> Result<Vec<ExpenseBatch>, PettyCashError> {
        for id in ids {
            let batch = self.load(*id).await?;
            batch.check_settleable()?;
            self.resolve_journal(&batch).await?;
        }

        let mut settled = Vec::with_capacity(ids.len());
        for id in ids {
            settled.push(self.settle(*id, post_immediately).await?);
        }
        Ok(settled)
    }

    /// Print action; no renderer is available, so a notice is returned
    pub async fn print(&self, id: ExpenseBatchId) -> Result<Notification, PettyCashError> {
        let batch = self.load(id).await?;
        Ok(Notification::print_not_implemented(batch.reference()))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn load(&self, id: ExpenseBatchId) -> Result<ExpenseBatch, PettyCashError> {
        self.repository.get(id, None).await.map_err(|e| {
            if e.is_not_found() {
                PettyCashError::not_found("Petty cash batch", id)
            } else {
                e.into()
            }
        })
    }

    async fn store(&self, batch: ExpenseBatch) -> Result<ExpenseBatch, PettyCashError> {
        Ok(self.repository.save(batch, None).await?)
    }

    fn metadata(batch: &ExpenseBatch) -> Option<OperationMetadata> {
        Some(
            OperationMetadata::with_correlation_id(batch.id().to_string())
                .with_context("reference", batch.reference()),
        )
    }

    async fn resolve_journal(&self, batch: &ExpenseBatch) -> Result<JournalId, PettyCashError> {
        if let Some(journal_id) = batch.journal_id() {
            return Ok(journal_id);
        }

        let journal = self
            .journals
            .find_journal(batch.company_id(), JournalType::settlement_types(), None)
            .await?
            .ok_or_else(|| {
                PettyCashError::operation(format!(
                    "No valid journal found for company {}; configure or select one",
                    batch.company_id()
                ))
            })?;

        debug!(batch_id = %batch.id(), journal = %journal.code, "Resolved settlement journal");
        Ok(journal.id)
    }

    async fn validate_accounts(
        &self,
        company_id: CompanyId,
        accounts: &BatchAccounts,
    ) -> Result<(), PettyCashError> {
        for account_id in accounts.selected() {
            let account = self.accounts.get_account(account_id, None).await.map_err(|e| {
                if e.is_not_found() {
                    PettyCashError::validation(format!("Unknown account {}", account_id))
                } else {
                    e.into()
                }
            })?;

            if account.company_id != company_id {
                return Err(PettyCashError::validation(format!(
                    "Account {} belongs to another company",
                    account.display_name()
                )));
            }
            if account.deprecated {
                return Err(PettyCashError::validation(format!(
                    "Account {} is deprecated",
                    account.display_name()
                )));
            }
        }
        Ok(())
    }

    async fn validate_journal(&self, company_id: CompanyId, journal_id: JournalId) -> Result<(), PettyCashError> {
        let journal = self.journals.get_journal(journal_id, None).await.map_err(|e| {
            if e.is_not_found() {
                PettyCashError::validation(format!("Unknown journal {}", journal_id))
            } else {
                e.into()
            }
        })?;

        if journal.company_id != company_id {
            return Err(PettyCashError::validation(format!(
                "Journal {} belongs to another company",
                journal.code
            )));
        }
        Ok(())
    }
}
