//! Ledger handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use core_kernel::LedgerEntryId;

use crate::dto::ledger::EntryResponse;
use crate::{error::ApiError, AppState};

/// Gets a ledger entry by ID
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state.service.get_entry(LedgerEntryId::from_uuid(id)).await?;
    Ok(Json(EntryResponse::from(&entry)))
}
