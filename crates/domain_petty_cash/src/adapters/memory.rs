//! In-memory persistence and sequence adapters

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{
    DomainPort, ExpenseBatchId, HealthCheckResult, HealthCheckable,
    OperationMetadata, PortError,
};

use crate::batch::ExpenseBatch;
use crate::ports::{BatchQuery, ExpenseBatchRepository, SequencePort};
use crate::reference::SEQUENCE_CODE;

/// In-memory batch store with optimistic versioning
#[derive(Debug, Clone, Default)]
pub struct InMemoryBatchRepository {
    batches: Arc<RwLock<HashMap<ExpenseBatchId, ExpenseBatch>>>,
}

impl InMemoryBatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored batches
    pub async fn len(&self) -> usize {
        self.batches.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.batches.read().await.is_empty()
    }
}

impl DomainPort for InMemoryBatchRepository {}

#[async_trait]
impl HealthCheckable for InMemoryBatchRepository {
    async fn health_check(&self) -> HealthCheckResult {
        let count = self.batches.read().await.len();
        HealthCheckResult::healthy("in-memory-batches", format!("{} batches", count))
    }
}

#[async_trait]
impl ExpenseBatchRepository for InMemoryBatchRepository {
    async fn insert(
        &self,
        mut batch: ExpenseBatch,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ExpenseBatch, PortError> {
        let mut batches = self.batches.write().await;
        if batches.contains_key(&batch.id()) {
            return Err(PortError::conflict(format!("Batch {} already exists", batch.id())));
        }

        batch.increment_version();
        batches.insert(batch.id(), batch.clone());
        Ok(batch)
    }

    async fn get(
        &self,
        id: ExpenseBatchId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ExpenseBatch, PortError> {
        self.batches
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("ExpenseBatch", id))
    }

    async fn save(
        &self,
        mut batch: ExpenseBatch,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ExpenseBatch, PortError> {
        let mut batches = self.batches.write().await;
        let stored = batches
            .get(&batch.id())
            .ok_or_else(|| PortError::not_found("ExpenseBatch", batch.id()))?;

        if stored.version() != batch.version() {
            return Err(PortError::conflict(format!(
                "Batch {} was modified concurrently (version {} != {})",
                batch.id(),
                batch.version(),
                stored.version()
            )));
        }

        batch.increment_version();
        batches.insert(batch.id(), batch.clone());
        Ok(batch)
    }

    async fn delete(
        &self,
        id: ExpenseBatchId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        self.batches
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("ExpenseBatch", id))
    }

    async fn list(
        &self,
        query: BatchQuery,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<ExpenseBatch>, PortError> {
        let batches = self.batches.read().await;
        let mut results: Vec<_> = batches
            .values()
            .filter(|b| query.company_id.map_or(true, |c| b.company_id() == c))
            .filter(|b| query.state.map_or(true, |s| b.state() == s))
            .cloned()
            .collect();
        results.sort_by_key(|b| (b.created_at(), b.id()));

        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);
        Ok(results.into_iter().skip(offset).take(limit).collect())
    }
}

/// Definition of a named sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Sequence code (e.g., "xim.caja.chica")
    pub code: String,
    /// Prefix of every value (e.g., "CC/")
    pub prefix: String,
    /// Zero-padded width of the number
    pub padding: usize,
    /// Next number to hand out
    pub next: u64,
}

impl SequenceConfig {
    /// The petty cash reference sequence, starting at 1
    pub fn petty_cash(prefix: impl Into<String>, padding: usize) -> Self {
        Self {
            code: SEQUENCE_CODE.to_string(),
            prefix: prefix.into(),
            padding,
            next: 1,
        }
    }

    fn format(&self, number: u64) -> String {
        format!("{}{:0>width$}", self.prefix, number, width = self.padding)
    }
}

/// In-memory monotonic sequences
#[derive(Debug, Clone, Default)]
pub struct InMemorySequence {
    sequences: Arc<RwLock<HashMap<String, SequenceConfig>>>,
}

impl InMemorySequence {
    pub fn new(configs: Vec<SequenceConfig>) -> Self {
        let sequences = configs.into_iter().map(|c| (c.code.clone(), c)).collect();
        Self {
            sequences: Arc::new(RwLock::new(sequences)),
        }
    }
}

impl DomainPort for InMemorySequence {}

#[async_trait]
impl HealthCheckable for InMemorySequence {
    async fn health_check(&self) -> HealthCheckResult {
        let count = self.sequences.read().await.len();
        HealthCheckResult::healthy("in-memory-sequence", format!("{} sequences", count))
    }
}

#[async_trait]
impl SequencePort for InMemorySequence {
    async fn next_value(
        &self,
        code: &str,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Option<String>, PortError> {
        let mut sequences = self.sequences.write().await;
        Ok(sequences.get_mut(code).map(|sequence| {
            let value = sequence.format(sequence.next);
            sequence.next += 1;
            value
        }))
    }
}
