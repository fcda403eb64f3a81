//! Batch reference assignment
//!
//! References come from a named monotonic sequence. When the sequence
//! yields nothing the fixed placeholder is used instead.

use tracing::warn;

use core_kernel::{OperationMetadata, PortError};
use crate::ports::SequencePort;

/// Code of the petty cash sequence
pub const SEQUENCE_CODE: &str = "xim.caja.chica";

/// Reference used when the sequence yields no value
pub const PLACEHOLDER_REFERENCE: &str = "CC/00000";

/// Draws the next batch reference
///
/// # Errors
///
/// Returns error if the sequence collaborator fails
pub async fn next_reference(
    sequence: &dyn SequencePort,
    metadata: Option<OperationMetadata>,
) -> Result<String, PortError> {
    match sequence.next_value(SEQUENCE_CODE, metadata).await? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => {
            warn!(code = SEQUENCE_CODE, "Sequence yielded no value, using placeholder reference");
            Ok(PLACEHOLDER_REFERENCE.to_string())
        }
    }
}
