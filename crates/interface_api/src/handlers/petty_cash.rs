//! Petty cash handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::{ExpenseBatchId, ExpenseLineId};
use domain_petty_cash::{BatchAccounts, BatchQuery, LineUpdate, NewLine};

use crate::dto::petty_cash::*;
use crate::{error::ApiError, AppState};

/// Creates a new petty cash batch
pub async fn create_batch(
    State(state): State<AppState>,
    Json(request): Json<CreateBatchRequest>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let request = request.into_new_batch(state.company_id, state.config.currency);
    let batch = state.service.create_batch(request).await?;
    Ok((StatusCode::CREATED, Json(BatchResponse::try_from(&batch)?)))
}

/// Lists the batches of the company
pub async fn list_batches(
    State(state): State<AppState>,
    Query(params): Query<ListBatchesQuery>,
) -> Result<Json<Vec<BatchResponse>>, ApiError> {
    let query = BatchQuery {
        company_id: Some(state.company_id),
        state: params.state,
        limit: params.limit,
        offset: params.offset,
    };
    let batches = state.service.list_batches(query).await?;
    let batches = batches
        .iter()
        .map(BatchResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(batches))
}

/// Gets a batch by ID
pub async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = state.service.get_batch(ExpenseBatchId::from_uuid(id)).await?;
    Ok(Json(BatchResponse::try_from(&batch)?))
}

/// Deletes a batch with its lines
pub async fn delete_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_batch(ExpenseBatchId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replaces the account selections
pub async fn assign_accounts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(accounts): Json<BatchAccounts>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = state
        .service
        .assign_accounts(ExpenseBatchId::from_uuid(id), accounts)
        .await?;
    Ok(Json(BatchResponse::try_from(&batch)?))
}

/// Adds a line
pub async fn add_line(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(line): Json<NewLine>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let batch = state.service.add_line(ExpenseBatchId::from_uuid(id), line).await?;
    Ok((StatusCode::CREATED, Json(BatchResponse::try_from(&batch)?)))
}

/// Updates a line
pub async fn update_line(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
    Json(update): Json<LineUpdate>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = state
        .service
        .update_line(
            ExpenseBatchId::from_uuid(id),
            ExpenseLineId::from_uuid(line_id),
            update,
        )
        .await?;
    Ok(Json(BatchResponse::try_from(&batch)?))
}

/// Removes a line
pub async fn remove_line(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = state
        .service
        .remove_line(ExpenseBatchId::from_uuid(id), ExpenseLineId::from_uuid(line_id))
        .await?;
    Ok(Json(BatchResponse::try_from(&batch)?))
}

/// Confirms a draft batch
pub async fn confirm_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = state.service.confirm(ExpenseBatchId::from_uuid(id)).await?;
    Ok(Json(BatchResponse::try_from(&batch)?))
}

/// Settles a confirmed batch into a ledger entry
pub async fn settle_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SettleRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = state
        .service
        .settle(ExpenseBatchId::from_uuid(id), request.post_immediately)
        .await?;
    Ok(Json(BatchResponse::try_from(&batch)?))
}

/// Print action
pub async fn print_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notice = state.service.print(ExpenseBatchId::from_uuid(id)).await?;
    Ok(Json(notice.into()))
}
