//! Adapters for the petty cash ports
//!
//! # Available Adapters
//!
//! - **InMemoryLedgerAdapter**: chart of accounts, journal registry and
//!   ledger posting over one shared `domain_ledger::Ledger`
//! - **InMemoryBatchRepository**: batch persistence with optimistic versioning
//! - **InMemorySequence**: monotonic reference numbering
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_petty_cash::adapters::{InMemoryLedgerAdapter, InMemoryBatchRepository, InMemorySequence, SequenceConfig};
//! use std::sync::Arc;
//!
//! let ledger = Arc::new(InMemoryLedgerAdapter::new(Ledger::new(Currency::GTQ)));
//! let service = PettyCashService::new(
//!     Arc::new(InMemoryBatchRepository::new()),
//!     Arc::new(InMemorySequence::new(vec![SequenceConfig::petty_cash("CC/", 5)])),
//!     ledger.clone(),
//!     ledger.clone(),
//!     ledger,
//! );
//! ```

pub mod ledger;
pub mod memory;

pub use ledger::InMemoryLedgerAdapter;
pub use memory::{InMemoryBatchRepository, InMemorySequence, SequenceConfig};
