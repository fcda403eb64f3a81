//! In-memory wiring of the petty cash service

use std::sync::Arc;

use core_kernel::{CompanyId, HealthCheckable};
use domain_ledger::{Ledger, LedgerError};
use domain_petty_cash::adapters::{
    InMemoryBatchRepository, InMemoryLedgerAdapter, InMemorySequence, SequenceConfig,
};
use domain_petty_cash::PettyCashService;
use tracing::info;

use crate::config::ApiConfig;

/// Service and adapters backed by process memory
pub struct InMemoryBackend {
    pub company_id: CompanyId,
    pub service: Arc<PettyCashService>,
    pub ledger: InMemoryLedgerAdapter,
    pub health_checks: Vec<Arc<dyn HealthCheckable>>,
}

impl InMemoryBackend {
    /// Builds the backend described by the configuration
    ///
    /// # Errors
    ///
    /// Returns error if seeding the chart of accounts fails
    pub fn from_config(config: &ApiConfig) -> Result<Self, LedgerError> {
        let company_id = config
            .company_id
            .map(CompanyId::from_uuid)
            .unwrap_or_else(CompanyId::new_v7);

        let mut book = Ledger::new(config.currency);
        if config.seed_chart_of_accounts {
            book.seed_company(company_id)?;
        }

        let ledger = InMemoryLedgerAdapter::new(book);
        let repository = Arc::new(InMemoryBatchRepository::new());
        let sequence = Arc::new(InMemorySequence::new(vec![SequenceConfig::petty_cash(
            config.sequence_prefix.clone(),
            config.sequence_padding,
        )]));
        let adapter = Arc::new(ledger.clone());

        let service = Arc::new(PettyCashService::new(
            repository.clone(),
            sequence.clone(),
            adapter.clone(),
            adapter.clone(),
            adapter.clone(),
        ));

        info!(
            company_id = %company_id,
            currency = %config.currency.code(),
            seeded = config.seed_chart_of_accounts,
            "Petty cash backend ready"
        );

        Ok(Self {
            company_id,
            service,
            ledger,
            health_checks: vec![repository, sequence, adapter],
        })
    }
}
