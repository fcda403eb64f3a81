//! Petty Cash Domain Ports
//!
//! This module defines the collaborator interfaces the petty cash domain
//! consumes from its host platform:
//!
//! - **ExpenseBatchRepository**: persistence of batches and their lines
//! - **SequencePort**: monotonic reference numbering
//! - **ChartOfAccountsPort**: account lookup
//! - **JournalRegistryPort**: journal lookup and fallback resolution
//! - **LedgerPostingPort**: creation and posting of ledger entries
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_petty_cash::ports::ExpenseBatchRepository;
//! use std::sync::Arc;
//!
//! pub struct Reader {
//!     repository: Arc<dyn ExpenseBatchRepository>,
//! }
//!
//! impl Reader {
//!     pub async fn get(&self, id: ExpenseBatchId) -> Result<ExpenseBatch, PortError> {
//!         self.repository.get(id, None).await
//!     }
//! }
//! ```
//!
//! In-memory adapters for every port live in [`crate::adapters`].

use async_trait::async_trait;

use core_kernel::{
    AccountId, CompanyId, DomainPort, ExpenseBatchId, JournalId, LedgerEntryId,
    OperationMetadata, PortError,
};
use domain_ledger::{Account, Journal, JournalType, LedgerEntry, NewEntry};

use crate::batch::{BatchState, ExpenseBatch};

/// Query parameters for listing batches
#[derive(Debug, Clone, Default)]
pub struct BatchQuery {
    /// Filter by owning company
    pub company_id: Option<CompanyId>,
    /// Filter by lifecycle state
    pub state: Option<BatchState>,
    /// Limit results
    pub limit: Option<u32>,
    /// Offset for pagination
    pub offset: Option<u32>,
}

impl BatchQuery {
    /// Creates a query for one company
    pub fn for_company(company_id: CompanyId) -> Self {
        Self {
            company_id: Some(company_id),
            ..Default::default()
        }
    }

    /// Restricts the query to one state
    pub fn in_state(mut self, state: BatchState) -> Self {
        self.state = Some(state);
        self
    }

    /// Adds pagination to the query
    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}

/// Persistence of petty cash batches
///
/// Lines are stored with their batch and deleted with it.
#[async_trait]
pub trait ExpenseBatchRepository: DomainPort {
    /// Stores a new batch
    ///
    /// # Returns
    ///
    /// The stored batch with its first persistence version
    async fn insert(
        &self,
        batch: ExpenseBatch,
        metadata: Option<OperationMetadata>,
    ) -> Result<ExpenseBatch, PortError>;

    /// Retrieves a batch by ID, or `PortError::NotFound`
    async fn get(
        &self,
        id: ExpenseBatchId,
        metadata: Option<OperationMetadata>,
    ) -> Result<ExpenseBatch, PortError>;

    /// Saves a modified batch
    ///
    /// # Returns
    ///
    /// The stored batch with its new version, or `PortError::Conflict`
    /// when the batch was saved by someone else since it was read
    async fn save(
        &self,
        batch: ExpenseBatch,
        metadata: Option<OperationMetadata>,
    ) -> Result<ExpenseBatch, PortError>;

    /// Deletes a batch together with its lines
    async fn delete(
        &self,
        id: ExpenseBatchId,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    /// Lists batches matching the query, oldest first
    async fn list(
        &self,
        query: BatchQuery,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<ExpenseBatch>, PortError>;
}

/// Sequential identifier generator
#[async_trait]
pub trait SequencePort: DomainPort {
    /// Draws the next value of the named sequence
    ///
    /// # Returns
    ///
    /// `None` when the sequence is not configured
    async fn next_value(
        &self,
        code: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<Option<String>, PortError>;
}

/// Chart of accounts lookup
#[async_trait]
pub trait ChartOfAccountsPort: DomainPort {
    /// Retrieves an account by ID, or `PortError::NotFound`
    async fn get_account(
        &self,
        id: AccountId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Account, PortError>;
}

/// Journal registry
#[async_trait]
pub trait JournalRegistryPort: DomainPort {
    /// Retrieves a journal by ID, or `PortError::NotFound`
    async fn get_journal(
        &self,
        id: JournalId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Journal, PortError>;

    /// Finds a journal of the company whose type is one of `types`
    async fn find_journal(
        &self,
        company_id: CompanyId,
        types: &[JournalType],
        metadata: Option<OperationMetadata>,
    ) -> Result<Option<Journal>, PortError>;
}

/// Ledger-posting subsystem
#[async_trait]
pub trait LedgerPostingPort: DomainPort {
    /// Creates a draft entry without balance validation
    async fn create_entry(
        &self,
        request: NewEntry,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntryId, PortError>;

    /// Posts (finalizes) a draft entry
    async fn post_entry(
        &self,
        id: LedgerEntryId,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    /// Removes a draft entry
    async fn discard_entry(
        &self,
        id: LedgerEntryId,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    /// Retrieves an entry by ID, or `PortError::NotFound`
    async fn get_entry(
        &self,
        id: LedgerEntryId,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntry, PortError>;
}
