//! JSON tool dispatcher.
//!
//! Chat assistants and similar integrations call the ledger through a
//! single endpoint with `{"tool": <name>, "params": {...}}` instead of the
//! per-operation routes. The dispatcher only translates; all rules live in
//! the engine.

use api_types::balance::{BalanceGet, BalanceView};
use api_types::reward::{GrantNew, ReceiptView, SpendNew};
use api_types::reward_type::RewardTypeNew;
use api_types::transaction::{TransactionList, TransactionListResponse};
use axum::{Json, extract::State};
use engine::AdjustMode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ServerError, server::ServerState};
use crate::{reward_types::map_unit_kind, transactions::map_transaction};

#[derive(Debug, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    pub params: Value,
}

#[derive(Debug, Deserialize)]
struct AdjustCall {
    transaction_id: i64,
    new_value: Option<i64>,
    new_note: Option<String>,
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ServerError> {
    serde_json::from_value(params).map_err(|err| ServerError::Generic(err.to_string()))
}

pub async fn dispatch(
    State(state): State<ServerState>,
    Json(call): Json<ToolCall>,
) -> Result<Json<Value>, ServerError> {
    let engine = &state.engine;

    match call.tool.as_str() {
        "create_reward_type" => {
            let p: RewardTypeNew = parse_params(call.params)?;
            let reward_type = engine
                .new_reward_type(
                    p.family_id,
                    &p.name,
                    map_unit_kind(p.unit_kind),
                    p.unit_label.as_deref(),
                )
                .await?;
            Ok(Json(json!({ "id": reward_type.id })))
        }
        "grant_reward" => {
            let p: GrantNew = parse_params(call.params)?;
            let receipt = engine
                .grant(
                    p.family_id,
                    p.child_id,
                    p.reward_type_id,
                    p.value,
                    p.note.as_deref(),
                    p.idempotency_key.as_deref(),
                )
                .await?;
            Ok(Json(json!(ReceiptView {
                transaction_id: receipt.transaction_id,
                new_balance: receipt.new_balance,
            })))
        }
        "spend_reward" => {
            let p: SpendNew = parse_params(call.params)?;
            let receipt = engine
                .spend(
                    p.family_id,
                    p.child_id,
                    p.reward_type_id,
                    p.value,
                    p.note.as_deref(),
                    p.idempotency_key.as_deref(),
                )
                .await?;
            Ok(Json(json!(ReceiptView {
                transaction_id: receipt.transaction_id,
                new_balance: receipt.new_balance,
            })))
        }
        "query_balance" => {
            let p: BalanceGet = parse_params(call.params)?;
            let balance = engine.balance(p.child_id, p.reward_type_id).await?;
            Ok(Json(json!(BalanceView { balance })))
        }
        "list_transactions" => {
            let p: TransactionList = parse_params(call.params)?;
            let txs = engine
                .list_transactions(p.child_id, p.reward_type_id, p.limit, p.before_id)
                .await?;
            Ok(Json(json!(TransactionListResponse {
                transactions: txs.into_iter().map(map_transaction).collect(),
            })))
        }
        "adjust_transaction" => {
            let p: AdjustCall = parse_params(call.params)?;
            engine
                .adjust_transaction(
                    p.transaction_id,
                    p.new_value,
                    p.new_note.as_deref(),
                    AdjustMode::KeepBalance,
                )
                .await?;
            Ok(Json(json!({ "id": p.transaction_id })))
        }
        _ => Err(ServerError::Generic("unknown tool".to_string())),
    }
}
