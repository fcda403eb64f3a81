//! Petty cash domain errors
//!
//! Settlement distinguishes hard failures (state, validation, journal
//! resolution) from the optional posting step, whose failure is logged and
//! never surfaced as an error.

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur in the petty cash domain
#[derive(Debug, Error)]
pub enum PettyCashError {
    /// Operation attempted from a lifecycle state that does not allow it
    #[error("Cannot {action} petty cash batch in state {state}")]
    InvalidState {
        action: String,
        state: String,
    },

    /// Required data is missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation cannot proceed with the current configuration
    #[error("Operation error: {0}")]
    Operation(String),

    /// Batch or line not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A collaborator failed
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// Monetary calculation error
    #[error("Calculation error: {0}")]
    Money(#[from] MoneyError),
}

impl PettyCashError {
    /// Creates an invalid state error
    pub fn invalid_state(action: impl Into<String>, state: impl std::fmt::Display) -> Self {
        PettyCashError::InvalidState {
            action: action.into(),
            state: state.to_string(),
        }
    }

    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PettyCashError::Validation(message.into())
    }

    /// Creates an operation error
    pub fn operation(message: impl Into<String>) -> Self {
        PettyCashError::Operation(message.into())
    }

    /// Creates a not found error
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        PettyCashError::NotFound(format!("{} {}", entity, id))
    }

    /// Returns true for lifecycle violations
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, PettyCashError::InvalidState { .. })
    }

    /// Returns true for missing or malformed data
    pub fn is_validation(&self) -> bool {
        matches!(self, PettyCashError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message() {
        let error = PettyCashError::invalid_state("confirm", "settled");
        assert!(error.is_invalid_state());
        assert_eq!(error.to_string(), "Cannot confirm petty cash batch in state settled");
    }

    #[test]
    fn test_port_error_conversion() {
        let error: PettyCashError = PortError::not_found("ExpenseBatch", "42").into();
        assert!(matches!(error, PettyCashError::Port(_)));
        assert!(!error.is_validation());
    }
}
