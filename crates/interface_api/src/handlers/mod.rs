//! Request handlers

pub mod health;
pub mod ledger;
pub mod petty_cash;
