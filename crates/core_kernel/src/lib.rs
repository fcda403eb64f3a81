//! Core Kernel - Foundational types and utilities for the petty cash system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly typed identifiers
//! - Port infrastructure shared by every collaborator interface

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate};
pub use identifiers::{
    CompanyId, UserId, ExpenseBatchId, ExpenseLineId,
    AccountId, JournalId, LedgerEntryId, EntryLineId,
};
pub use ports::{
    PortError, DomainPort, OperationMetadata,
    HealthCheckable, HealthCheckResult, AdapterHealth,
};
