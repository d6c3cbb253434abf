//! Reward type API endpoints

use api_types::reward_type::{RewardTypeCreated, RewardTypeNew, UnitKind as ApiUnitKind};
use axum::{Json, extract::State};
use engine::UnitKind;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_unit_kind(kind: ApiUnitKind) -> UnitKind {
    match kind {
        ApiUnitKind::Money => UnitKind::Money,
        ApiUnitKind::Time => UnitKind::Time,
        ApiUnitKind::Points => UnitKind::Points,
        ApiUnitKind::Custom => UnitKind::Custom,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RewardTypeNew>,
) -> Result<Json<RewardTypeCreated>, ServerError> {
    let reward_type = state
        .engine
        .new_reward_type(
            payload.family_id,
            &payload.name,
            map_unit_kind(payload.unit_kind),
            payload.unit_label.as_deref(),
        )
        .await?;

    Ok(Json(RewardTypeCreated { id: reward_type.id }))
}
