//! Grant/spend/balance API endpoints

use api_types::balance::{BalanceGet, BalanceView};
use api_types::reward::{GrantNew, ReceiptView, SpendNew};
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState};

pub async fn grant(
    State(state): State<ServerState>,
    Json(payload): Json<GrantNew>,
) -> Result<Json<ReceiptView>, ServerError> {
    let receipt = state
        .engine
        .grant(
            payload.family_id,
            payload.child_id,
            payload.reward_type_id,
            payload.value,
            payload.note.as_deref(),
            payload.idempotency_key.as_deref(),
        )
        .await?;

    Ok(Json(ReceiptView {
        transaction_id: receipt.transaction_id,
        new_balance: receipt.new_balance,
    }))
}

pub async fn spend(
    State(state): State<ServerState>,
    Json(payload): Json<SpendNew>,
) -> Result<Json<ReceiptView>, ServerError> {
    let receipt = state
        .engine
        .spend(
            payload.family_id,
            payload.child_id,
            payload.reward_type_id,
            payload.value,
            payload.note.as_deref(),
            payload.idempotency_key.as_deref(),
        )
        .await?;

    Ok(Json(ReceiptView {
        transaction_id: receipt.transaction_id,
        new_balance: receipt.new_balance,
    }))
}

pub async fn balance(
    State(state): State<ServerState>,
    Query(payload): Query<BalanceGet>,
) -> Result<Json<BalanceView>, ServerError> {
    let balance = state
        .engine
        .balance(payload.child_id, payload.reward_type_id)
        .await?;

    Ok(Json(BalanceView { balance }))
}
