//! Comprehensive tests for domain_petty_cash

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex, OnceLock};

use core_kernel::{
    AccountId, CompanyId, Currency, DomainPort, ExpenseBatchId, JournalId, Money,
    OperationMetadata, PortError,
};
use domain_ledger::{
    Account, AccountType, EntryState, Journal, JournalType, Ledger, PettyCashChartOfAccounts,
};

use domain_petty_cash::adapters::{
    InMemoryBatchRepository, InMemoryLedgerAdapter, InMemorySequence, SequenceConfig,
};
use domain_petty_cash::{
    BatchAccounts, BatchCategory, BatchQuery, BatchState, DocumentCategory, DocumentType,
    ExpenseBatch, ExpenseBatchRepository, ExpenseLine, JournalRegistryPort, LedgerPostingPort,
    LineUpdate, NewBatch, NewLine, PettyCashError, PettyCashService, PLACEHOLDER_REFERENCE,
    UNASSIGNED_REFERENCE,
};
use domain_petty_cash::settlement;

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    service: PettyCashService,
    ledger: InMemoryLedgerAdapter,
    company: CompanyId,
    expense: AccountId,
    iva: AccountId,
    idp: AccountId,
    cash: AccountId,
    journal: JournalId,
}

impl Harness {
    fn accounts(&self) -> BatchAccounts {
        BatchAccounts {
            expense: Some(self.expense),
            iva: Some(self.iva),
            idp: Some(self.idp),
            cash: Some(self.cash),
        }
    }

    fn new_batch(&self) -> NewBatch {
        NewBatch::new(self.company, Currency::GTQ, date(), BatchCategory::Operations)
    }

    async fn entry_count(&self) -> usize {
        self.ledger.ledger().read().await.entry_count()
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 31).unwrap()
}

fn line(amount: Decimal, category: DocumentCategory) -> NewLine {
    NewLine {
        date: date(),
        document_type: DocumentType::Invoice,
        series: "A".to_string(),
        number: "1001".to_string(),
        category,
        amount,
    }
}

fn seeded_ledger(company: CompanyId, with_journal: bool) -> (Ledger, Option<JournalId>) {
    let mut ledger = Ledger::new(Currency::GTQ);
    for account in PettyCashChartOfAccounts::create_standard_accounts(company) {
        ledger.add_account(account).unwrap();
    }
    let journal_id = with_journal.then(|| {
        ledger.add_journal(Journal::new(company, "INV", "Customer Invoices", JournalType::Sale));
        let journal = Journal::new(company, "CSH1", "Petty Cash", JournalType::Cash);
        let id = journal.id;
        ledger.add_journal(journal);
        id
    });
    (ledger, journal_id)
}

fn build_harness(
    with_journal: bool,
    repository: Arc<dyn ExpenseBatchRepository>,
    sequences: Vec<SequenceConfig>,
) -> Harness {
    let company = CompanyId::new();
    let (ledger, journal) = seeded_ledger(company, with_journal);
    let code = |code: &str| ledger.find_account_by_code(company, code).unwrap().id;
    let expense = code(PettyCashChartOfAccounts::OPERATING_EXPENSE);
    let iva = code(PettyCashChartOfAccounts::IVA_CREDIT);
    let idp = code(PettyCashChartOfAccounts::IDP);
    let cash = code(PettyCashChartOfAccounts::CASH_FUND);

    let adapter = InMemoryLedgerAdapter::new(ledger);
    let shared = Arc::new(adapter.clone());
    let service = PettyCashService::new(
        repository,
        Arc::new(InMemorySequence::new(sequences)),
        shared.clone(),
        shared.clone(),
        shared,
    );

    Harness {
        service,
        ledger: adapter,
        company,
        expense,
        iva,
        idp,
        cash,
        journal: journal.unwrap_or_default(),
    }
}

fn harness() -> Harness {
    build_harness(
        true,
        Arc::new(InMemoryBatchRepository::new()),
        vec![SequenceConfig::petty_cash("CC/", 5)],
    )
}

/// Creates and confirms a batch with all accounts selected
async fn confirmed_batch(h: &Harness, lines: Vec<NewLine>) -> ExpenseBatch {
    let mut request = h.new_batch().with_accounts(h.accounts());
    request.lines = lines;
    let batch = h.service.create_batch(request).await.unwrap();
    h.service.confirm(batch.id()).await.unwrap()
}

// ============================================================================
// Reference Assignment Tests
// ============================================================================

mod reference_tests {
    use super::*;

    #[tokio::test]
    async fn test_references_are_sequential_and_distinct() {
        let h = harness();

        let first = h.service.create_batch(h.new_batch()).await.unwrap();
        let second = h.service.create_batch(h.new_batch()).await.unwrap();

        assert_eq!(first.reference(), "CC/00001");
        assert_eq!(second.reference(), "CC/00002");
        assert_ne!(first.reference(), second.reference());
    }

    #[tokio::test]
    async fn test_sentinel_reference_draws_from_sequence() {
        let h = harness();
        let mut request = h.new_batch();
        request.reference = Some(UNASSIGNED_REFERENCE.to_string());

        let batch = h.service.create_batch(request).await.unwrap();
        assert_eq!(batch.reference(), "CC/00001");
    }

    #[tokio::test]
    async fn test_spanish_sentinel_reference_draws_from_sequence() {
        let h = harness();
        let mut request = h.new_batch();
        request.reference = Some("Nuevo".to_string());

        let batch = h.service.create_batch(request).await.unwrap();
        assert_eq!(batch.reference(), "CC/00001");
    }

    #[tokio::test]
    async fn test_explicit_reference_is_kept() {
        let h = harness();
        let mut request = h.new_batch();
        request.reference = Some("CC/MANUAL-1".to_string());

        let batch = h.service.create_batch(request).await.unwrap();
        assert_eq!(batch.reference(), "CC/MANUAL-1");
    }

    #[tokio::test]
    async fn test_placeholder_without_sequence() {
        let h = build_harness(true, Arc::new(InMemoryBatchRepository::new()), vec![]);

        let batch = h.service.create_batch(h.new_batch()).await.unwrap();
        assert_eq!(batch.reference(), PLACEHOLDER_REFERENCE);
    }

    #[tokio::test]
    async fn test_reference_survives_edits() {
        let h = harness();
        let batch = h.service.create_batch(h.new_batch()).await.unwrap();

        let edited = h
            .service
            .add_line(batch.id(), line(dec!(10), DocumentCategory::Good))
            .await
            .unwrap();
        assert_eq!(edited.reference(), batch.reference());
    }

    #[tokio::test]
    async fn test_create_batches_loop() {
        let h = harness();
        let created = h
            .service
            .create_batches(vec![h.new_batch(), h.new_batch(), h.new_batch()])
            .await
            .unwrap();

        let references: Vec<_> = created.iter().map(|b| b.reference().to_string()).collect();
        assert_eq!(references, vec!["CC/00001", "CC/00002", "CC/00003"]);
    }
}

// ============================================================================
// Batch Editing Tests
// ============================================================================

mod editing_tests {
    use super::*;

    #[tokio::test]
    async fn test_totals_recomputed_through_service() {
        let h = harness();
        let batch = h.service.create_batch(h.new_batch()).await.unwrap();

        let batch = h.service.add_line(batch.id(), line(dec!(100), DocumentCategory::Fuel)).await.unwrap();
        let batch = h.service.add_line(batch.id(), line(dec!(50), DocumentCategory::Good)).await.unwrap();
        assert_eq!(batch.total_amount().amount(), dec!(150));
        assert_eq!(batch.total_iva().amount(), dec!(18));
        assert_eq!(batch.total_idp().amount(), dec!(5));

        let fuel = batch.lines()[0].id();
        let batch = h
            .service
            .update_line(batch.id(), fuel, LineUpdate {
                category: Some(DocumentCategory::Service),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(batch.total_idp().is_zero());

        let batch = h.service.remove_line(batch.id(), fuel).await.unwrap();
        assert_eq!(batch.total_amount().amount(), dec!(50));
        assert_eq!(batch.total_iva().amount(), dec!(6));
    }

    #[tokio::test]
    async fn test_deprecated_account_rejected() {
        let h = harness();
        let batch = h.service.create_batch(h.new_batch()).await.unwrap();
        let old = h
            .ledger
            .ledger()
            .read()
            .await
            .find_account_by_code(h.company, "6900")
            .unwrap()
            .id;

        let result = h
            .service
            .assign_accounts(batch.id(), BatchAccounts { expense: Some(old), ..h.accounts() })
            .await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_foreign_company_account_rejected() {
        let h = harness();
        let foreign = Account::new(CompanyId::new(), "6100", "Operating Expenses", AccountType::Expense);
        let foreign_id = foreign.id;
        h.ledger.ledger().write().await.add_account(foreign).unwrap();

        let request = h
            .new_batch()
            .with_accounts(BatchAccounts { expense: Some(foreign_id), ..h.accounts() });
        let result = h.service.create_batch(request).await;

        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_unknown_journal_rejected() {
        let h = harness();
        let batch = h.service.create_batch(h.new_batch()).await.unwrap();

        let result = h.service.set_journal(batch.id(), Some(JournalId::new())).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_confirmed_batch_still_editable() {
        let h = harness();
        let batch = confirmed_batch(&h, vec![line(dec!(10), DocumentCategory::Good)]).await;

        let batch = h.service.add_line(batch.id(), line(dec!(20), DocumentCategory::Good)).await.unwrap();
        assert_eq!(batch.state(), BatchState::Confirmed);
        assert_eq!(batch.total_amount().amount(), dec!(30));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let h = harness();
        let draft = h.service.create_batch(h.new_batch()).await.unwrap();
        confirmed_batch(&h, vec![]).await;

        let all = h.service.list_batches(BatchQuery::for_company(h.company)).await.unwrap();
        assert_eq!(all.len(), 2);

        let drafts = h
            .service
            .list_batches(BatchQuery::for_company(h.company).in_state(BatchState::Draft))
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);

        h.service.delete_batch(draft.id()).await.unwrap();
        let result = h.service.get_batch(draft.id()).await;
        assert!(matches!(result, Err(PettyCashError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_settled_batch_cannot_be_deleted_or_edited() {
        let h = harness();
        let batch = confirmed_batch(&h, vec![line(dec!(10), DocumentCategory::Good)]).await;
        h.service.settle(batch.id(), true).await.unwrap();

        assert!(h.service.delete_batch(batch.id()).await.unwrap_err().is_invalid_state());
        let result = h.service.add_line(batch.id(), line(dec!(1), DocumentCategory::Good)).await;
        assert!(result.unwrap_err().is_invalid_state());
    }
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_only_from_draft() {
        let h = harness();
        let batch = confirmed_batch(&h, vec![]).await;
        assert_eq!(batch.state(), BatchState::Confirmed);

        let result = h.service.confirm(batch.id()).await;
        assert!(result.unwrap_err().is_invalid_state());
        assert_eq!(h.service.get_batch(batch.id()).await.unwrap().state(), BatchState::Confirmed);
    }

    #[tokio::test]
    async fn test_confirm_all_is_all_or_nothing() {
        let h = harness();
        let draft = h.service.create_batch(h.new_batch()).await.unwrap();
        let confirmed = confirmed_batch(&h, vec![]).await;

        let result = h.service.confirm_all(&[draft.id(), confirmed.id()]).await;
        assert!(result.unwrap_err().is_invalid_state());
        assert_eq!(h.service.get_batch(draft.id()).await.unwrap().state(), BatchState::Draft);

        let other = h.service.create_batch(h.new_batch()).await.unwrap();
        let done = h.service.confirm_all(&[draft.id(), other.id()]).await.unwrap();
        assert!(done.iter().all(|b| b.state() == BatchState::Confirmed));
    }

    #[tokio::test]
    async fn test_unknown_batch() {
        let h = harness();
        let result = h.service.confirm(ExpenseBatchId::new()).await;
        assert!(matches!(result, Err(PettyCashError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_print_returns_notice() {
        let h = harness();
        let batch = h.service.create_batch(h.new_batch()).await.unwrap();

        let notice = h.service.print(batch.id()).await.unwrap();
        assert!(!notice.sticky);
        assert!(notice.title.contains(batch.reference()));
        assert_eq!(h.service.get_batch(batch.id()).await.unwrap().state(), BatchState::Draft);
    }
}

// ============================================================================
// Settlement Tests
// ============================================================================

mod settlement_tests {
    use super::*;

    #[tokio::test]
    async fn test_fuel_settlement_end_to_end() {
        let h = harness();
        let batch = confirmed_batch(&h, vec![line(dec!(100), DocumentCategory::Fuel)]).await;
        let created = &batch.lines()[0];
        assert_eq!(created.iva().amount(), dec!(12));
        assert_eq!(created.idp().amount(), dec!(5));
        assert_eq!(created.total().amount(), dec!(117));

        let settled = h.service.settle(batch.id(), true).await.unwrap();
        assert_eq!(settled.state(), BatchState::Settled);

        let entry = h.service.get_entry(settled.ledger_entry_id().unwrap()).await.unwrap();
        assert_eq!(entry.state, EntryState::Posted);
        assert_eq!(entry.journal_id, h.journal);
        assert_eq!(entry.date, date());
        assert_eq!(entry.reference, format!("Settlement {}", settled.reference()));

        let shape: Vec<_> = entry
            .lines
            .iter()
            .map(|l| (l.account_id, l.debit.amount(), l.credit.amount()))
            .collect();
        assert_eq!(shape, vec![
            (h.expense, dec!(100), dec!(0)),
            (h.iva, dec!(12), dec!(0)),
            (h.idp, dec!(5), dec!(0)),
            (h.cash, dec!(0), dec!(117)),
        ]);
        assert!(entry.is_balanced(Currency::GTQ));
    }

    #[tokio::test]
    async fn test_idp_falls_back_to_iva_account() {
        let h = harness();
        let request = h
            .new_batch()
            .with_accounts(BatchAccounts { idp: None, ..h.accounts() })
            .with_line(line(dec!(100), DocumentCategory::Fuel));
        let batch = h.service.create_batch(request).await.unwrap();
        h.service.confirm(batch.id()).await.unwrap();

        let settled = h.service.settle(batch.id(), true).await.unwrap();
        let entry = h.service.get_entry(settled.ledger_entry_id().unwrap()).await.unwrap();

        assert_eq!(entry.lines[2].account_id, h.iva);
        assert_eq!(entry.lines[2].debit.amount(), dec!(5));
    }

    #[tokio::test]
    async fn test_goods_and_zero_service_settlement() {
        let h = harness();
        let batch = confirmed_batch(&h, vec![
            line(dec!(50), DocumentCategory::Good),
            line(dec!(0), DocumentCategory::Service),
        ])
        .await;
        assert_eq!(batch.total_amount().amount(), dec!(50));
        assert_eq!(batch.total_iva().amount(), dec!(6));
        assert!(batch.total_idp().is_zero());

        let settled = h.service.settle(batch.id(), false).await.unwrap();
        let entry = h.service.get_entry(settled.ledger_entry_id().unwrap()).await.unwrap();

        assert_eq!(entry.lines.len(), 3);
        assert!(entry.lines.iter().all(|l| l.account_id != h.idp));
        assert_eq!(entry.lines[0].debit.amount(), dec!(50));
        assert_eq!(entry.lines[2].account_id, h.cash);
        assert_eq!(entry.lines[2].credit.amount(), dec!(56));
        assert_eq!(entry.state, EntryState::Draft);
    }

    #[tokio::test]
    async fn test_settle_twice_fails() {
        let h = harness();
        let batch = confirmed_batch(&h, vec![line(dec!(10), DocumentCategory::Good)]).await;

        let settled = h.service.settle(batch.id(), true).await.unwrap();
        let result = h.service.settle(batch.id(), true).await;

        assert!(result.unwrap_err().is_invalid_state());
        let current = h.service.get_batch(batch.id()).await.unwrap();
        assert_eq!(current.ledger_entry_id(), settled.ledger_entry_id());
        assert_eq!(h.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_settle_draft_fails() {
        let h = harness();
        let request = h
            .new_batch()
            .with_accounts(h.accounts())
            .with_line(line(dec!(10), DocumentCategory::Good));
        let batch = h.service.create_batch(request).await.unwrap();

        let result = h.service.settle(batch.id(), true).await;
        assert!(result.unwrap_err().is_invalid_state());

        let current = h.service.get_batch(batch.id()).await.unwrap();
        assert_eq!(current.state(), BatchState::Draft);
        assert!(current.ledger_entry_id().is_none());
        assert_eq!(h.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_settle_without_lines_fails() {
        let h = harness();
        let batch = confirmed_batch(&h, vec![]).await;

        let result = h.service.settle(batch.id(), true).await;
        assert!(result.unwrap_err().is_validation());
        assert_eq!(h.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_settle_without_required_accounts_fails() {
        let h = harness();
        let request = h
            .new_batch()
            .with_accounts(BatchAccounts { iva: None, ..h.accounts() })
            .with_line(line(dec!(10), DocumentCategory::Good));
        let batch = h.service.create_batch(request).await.unwrap();
        h.service.confirm(batch.id()).await.unwrap();

        let result = h.service.settle(batch.id(), true).await;
        assert!(result.unwrap_err().is_validation());

        let current = h.service.get_batch(batch.id()).await.unwrap();
        assert_eq!(current.state(), BatchState::Confirmed);
        assert!(current.ledger_entry_id().is_none());
    }

    #[tokio::test]
    async fn test_settle_without_journal_fails() {
        let h = build_harness(
            false,
            Arc::new(InMemoryBatchRepository::new()),
            vec![SequenceConfig::petty_cash("CC/", 5)],
        );
        let batch = confirmed_batch(&h, vec![line(dec!(10), DocumentCategory::Good)]).await;

        let result = h.service.settle(batch.id(), true).await;
        assert!(matches!(result, Err(PettyCashError::Operation(_))));
        assert_eq!(h.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_selected_journal_wins() {
        let h = harness();
        let general = Journal::new(h.company, "MISC", "Miscellaneous", JournalType::General);
        let general_id = general.id;
        h.ledger.ledger().write().await.add_journal(general);

        let request = h
            .new_batch()
            .with_accounts(h.accounts())
            .with_journal(general_id)
            .with_line(line(dec!(10), DocumentCategory::Good));
        let batch = h.service.create_batch(request).await.unwrap();
        h.service.confirm(batch.id()).await.unwrap();

        let settled = h.service.settle(batch.id(), true).await.unwrap();
        let entry = h.service.get_entry(settled.ledger_entry_id().unwrap()).await.unwrap();
        assert_eq!(entry.journal_id, general_id);
    }

    #[tokio::test]
    async fn test_posting_failure_is_swallowed() {
        let h = harness();
        let batch = confirmed_batch(&h, vec![line(dec!(100), DocumentCategory::Fuel)]).await;
        h.ledger.ledger().write().await.deprecate_account(&h.iva).unwrap();

        let settled = h.service.settle(batch.id(), true).await.unwrap();
        assert_eq!(settled.state(), BatchState::Settled);

        let entry = h.service.get_entry(settled.ledger_entry_id().unwrap()).await.unwrap();
        assert_eq!(entry.state, EntryState::Draft);
    }

    #[tokio::test]
    async fn test_settle_all_checks_every_batch_first() {
        let h = harness();
        let ready = confirmed_batch(&h, vec![line(dec!(10), DocumentCategory::Good)]).await;
        let empty = confirmed_batch(&h, vec![]).await;

        let result = h.service.settle_all(&[ready.id(), empty.id()], true).await;
        assert!(result.unwrap_err().is_validation());
        assert_eq!(h.service.get_batch(ready.id()).await.unwrap().state(), BatchState::Confirmed);
        assert_eq!(h.entry_count().await, 0);

        let other = confirmed_batch(&h, vec![line(dec!(5), DocumentCategory::Fuel)]).await;
        let settled = h.service.settle_all(&[ready.id(), other.id()], true).await.unwrap();
        assert!(settled.iter().all(|b| b.state() == BatchState::Settled));
        assert_eq!(h.entry_count().await, 2);
    }
}

// ============================================================================
// Concurrency Tests
// ============================================================================

/// Change a competing session commits just before the settlement save
#[derive(Debug, Clone, Copy)]
enum Race {
    /// Settles the batch with its own ledger entry
    Settle,
    /// Adds a line while the batch stays confirmed
    AddLine,
}

/// Repository that lets a competing session save the batch first
struct RacingRepository {
    inner: InMemoryBatchRepository,
    ledger: OnceLock<InMemoryLedgerAdapter>,
    race: Mutex<Option<Race>>,
}

impl RacingRepository {
    fn new(race: Race) -> Self {
        Self {
            inner: InMemoryBatchRepository::new(),
            ledger: OnceLock::new(),
            race: Mutex::new(Some(race)),
        }
    }

    async fn compete(&self, id: ExpenseBatchId, race: Race) -> Result<(), PortError> {
        let mut current = self.inner.get(id, None).await?;
        match race {
            Race::Settle => {
                let ledger = self
                    .ledger
                    .get()
                    .ok_or_else(|| PortError::internal("ledger not attached"))?;
                let accounts = current
                    .check_settleable()
                    .map_err(|e| PortError::validation(e.to_string()))?;
                let journal = ledger
                    .find_journal(current.company_id(), JournalType::settlement_types(), None)
                    .await?
                    .ok_or_else(|| PortError::not_found("Journal", current.company_id()))?;
                let request = settlement::build_entry(&current, &accounts, journal.id)
                    .map_err(|e| PortError::validation(e.to_string()))?;
                let entry_id = ledger.create_entry(request, None).await?;
                current
                    .mark_settled(entry_id)
                    .map_err(|e| PortError::validation(e.to_string()))?;
            }
            Race::AddLine => {
                let line = ExpenseLine::new(
                    date(),
                    DocumentType::Receipt,
                    DocumentCategory::Service,
                    Money::new(dec!(20), Currency::GTQ),
                )
                .map_err(|e| PortError::validation(e.to_string()))?;
                current
                    .add_line(line)
                    .map_err(|e| PortError::validation(e.to_string()))?;
            }
        }
        self.inner.save(current, None).await?;
        Ok(())
    }
}

impl DomainPort for RacingRepository {}

#[async_trait]
impl ExpenseBatchRepository for RacingRepository {
    async fn insert(&self, batch: ExpenseBatch, metadata: Option<OperationMetadata>) -> Result<ExpenseBatch, PortError> {
        self.inner.insert(batch, metadata).await
    }

    async fn get(&self, id: ExpenseBatchId, metadata: Option<OperationMetadata>) -> Result<ExpenseBatch, PortError> {
        self.inner.get(id, metadata).await
    }

    async fn save(&self, batch: ExpenseBatch, metadata: Option<OperationMetadata>) -> Result<ExpenseBatch, PortError> {
        let race = if batch.state() == BatchState::Settled {
            self.race.lock().unwrap().take()
        } else {
            None
        };
        if let Some(race) = race {
            self.compete(batch.id(), race).await?;
        }
        self.inner.save(batch, metadata).await
    }

    async fn delete(&self, id: ExpenseBatchId, metadata: Option<OperationMetadata>) -> Result<(), PortError> {
        self.inner.delete(id, metadata).await
    }

    async fn list(&self, query: BatchQuery, metadata: Option<OperationMetadata>) -> Result<Vec<ExpenseBatch>, PortError> {
        self.inner.list(query, metadata).await
    }
}

fn racing_harness(race: Race) -> Harness {
    let repository = Arc::new(RacingRepository::new(race));
    let h = build_harness(true, repository.clone(), vec![SequenceConfig::petty_cash("CC/", 5)]);
    assert!(repository.ledger.set(h.ledger.clone()).is_ok());
    h
}

mod concurrency_tests {
    use super::*;

    #[tokio::test]
    async fn test_losing_settlement_keeps_the_winning_entry() {
        let h = racing_harness(Race::Settle);
        let batch = confirmed_batch(&h, vec![line(dec!(10), DocumentCategory::Good)]).await;

        let result = h.service.settle(batch.id(), true).await;
        assert!(result.unwrap_err().is_invalid_state());

        let stored = h.service.get_batch(batch.id()).await.unwrap();
        assert_eq!(stored.state(), BatchState::Settled);
        assert_eq!(h.entry_count().await, 1);

        let winner = stored.ledger_entry_id().unwrap();
        let entry = h.service.get_entry(winner).await.unwrap();
        assert_eq!(entry.state, EntryState::Draft);
        assert_eq!(entry.lines.len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_edit_surfaces_conflict() {
        let h = racing_harness(Race::AddLine);
        let batch = confirmed_batch(&h, vec![line(dec!(10), DocumentCategory::Good)]).await;

        let result = h.service.settle(batch.id(), false).await;
        match result {
            Err(PettyCashError::Port(error)) => assert!(error.is_conflict()),
            other => panic!("Expected a port conflict, got {:?}", other),
        }

        let stored = h.service.get_batch(batch.id()).await.unwrap();
        assert_eq!(stored.state(), BatchState::Confirmed);
        assert_eq!(stored.lines().len(), 2);
        assert!(stored.ledger_entry_id().is_none());
        assert_eq!(h.entry_count().await, 0);

        let settled = h.service.settle(batch.id(), false).await.unwrap();
        assert_eq!(settled.state(), BatchState::Settled);
        assert_eq!(h.entry_count().await, 1);
    }
}
