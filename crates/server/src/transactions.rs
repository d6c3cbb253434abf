//! Transaction history and adjustment API endpoints

use api_types::transaction::{
    TransactionAdjust, TransactionAdjusted, TransactionKind as ApiKind, TransactionList,
    TransactionListResponse, TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use engine::AdjustMode;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Credit => ApiKind::Credit,
        engine::TransactionKind::Debit => ApiKind::Debit,
    }
}

pub(crate) fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        kind: map_kind(tx.kind),
        value: tx.value,
        note: tx.note,
        created_by: tx.created_by,
        created_at: tx.created_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(payload): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let txs = state
        .engine
        .list_transactions(
            payload.child_id,
            payload.reward_type_id,
            payload.limit,
            payload.before_id,
        )
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: txs.into_iter().map(map_transaction).collect(),
    }))
}

pub async fn adjust(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TransactionAdjust>,
) -> Result<Json<TransactionAdjusted>, ServerError> {
    // Adjustments over HTTP correct the record only; the account balance
    // stays as committed.
    state
        .engine
        .adjust_transaction(
            id,
            payload.new_value,
            payload.new_note.as_deref(),
            AdjustMode::KeepBalance,
        )
        .await?;

    Ok(Json(TransactionAdjusted { id }))
}
