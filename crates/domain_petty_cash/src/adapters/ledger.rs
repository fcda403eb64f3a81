//! In-process ledger adapter
//!
//! Serves the chart of accounts, the journal registry and the posting
//! subsystem from one shared [`Ledger`] book.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{
    AccountId, CompanyId, DomainPort, HealthCheckResult, HealthCheckable,
    JournalId, LedgerEntryId, OperationMetadata, PortError,
};
use domain_ledger::{Account, Journal, JournalType, Ledger, LedgerEntry, LedgerError, NewEntry};

use crate::ports::{ChartOfAccountsPort, JournalRegistryPort, LedgerPostingPort};

/// Adapter over a shared in-memory ledger book
#[derive(Debug, Clone)]
pub struct InMemoryLedgerAdapter {
    ledger: Arc<RwLock<Ledger>>,
}

impl InMemoryLedgerAdapter {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Shared handle to the underlying book
    pub fn ledger(&self) -> Arc<RwLock<Ledger>> {
        Arc::clone(&self.ledger)
    }
}

/// Maps ledger failures onto port errors
fn port_error(error: LedgerError) -> PortError {
    match error {
        LedgerError::AccountNotFound(id) => PortError::not_found("Account", id),
        LedgerError::JournalNotFound(id) => PortError::not_found("Journal", id),
        LedgerError::EntryNotFound(id) => PortError::not_found("LedgerEntry", id),
        LedgerError::AccountAlreadyExists(_) | LedgerError::NotDraft { .. } => {
            PortError::conflict(error.to_string())
        }
        LedgerError::DeprecatedAccount(_)
        | LedgerError::UnbalancedEntry { .. }
        | LedgerError::EmptyEntry(_)
        | LedgerError::CalculationError(_) => PortError::validation(error.to_string()),
    }
}

impl DomainPort for InMemoryLedgerAdapter {}

#[async_trait]
impl HealthCheckable for InMemoryLedgerAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let entries = self.ledger.read().await.entry_count();
        HealthCheckResult::healthy("in-memory-ledger", format!("{} entries", entries))
    }
}

#[async_trait]
impl ChartOfAccountsPort for InMemoryLedgerAdapter {
    async fn get_account(
        &self,
        id: AccountId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Account, PortError> {
        self.ledger
            .read()
            .await
            .get_account(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Account", id))
    }
}

#[async_trait]
impl JournalRegistryPort for InMemoryLedgerAdapter {
    async fn get_journal(
        &self,
        id: JournalId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Journal, PortError> {
        self.ledger
            .read()
            .await
            .get_journal(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Journal", id))
    }

    async fn find_journal(
        &self,
        company_id: CompanyId,
        types: &[JournalType],
        _metadata: Option<OperationMetadata>,
    ) -> Result<Option<Journal>, PortError> {
        Ok(self.ledger.read().await.find_journal(company_id, types).cloned())
    }
}

#[async_trait]
impl LedgerPostingPort for InMemoryLedgerAdapter {
    async fn create_entry(
        &self,
        request: NewEntry,
        _metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntryId, PortError> {
        self.ledger.write().await.create_entry(request).map_err(port_error)
    }

    async fn post_entry(
        &self,
        id: LedgerEntryId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        self.ledger.write().await.post(&id).map_err(port_error)
    }

    async fn discard_entry(
        &self,
        id: LedgerEntryId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        self.ledger
            .write()
            .await
            .discard(&id)
            .map(|_| ())
            .map_err(port_error)
    }

    async fn get_entry(
        &self,
        id: LedgerEntryId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntry, PortError> {
        self.ledger
            .read()
            .await
            .get_entry(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("LedgerEntry", id))
    }
}
