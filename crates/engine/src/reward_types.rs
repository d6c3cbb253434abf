//! Reward type primitives.
//!
//! A `RewardType` names something a family hands out (pocket money, screen
//! time, stars). The ledger itself treats the id as opaque; this entity
//! exists for the provisioning surface.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Money,
    Time,
    Points,
    Custom,
}

impl UnitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Money => "money",
            Self::Time => "time",
            Self::Points => "points",
            Self::Custom => "custom",
        }
    }
}

impl TryFrom<&str> for UnitKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "money" => Ok(Self::Money),
            "time" => Ok(Self::Time),
            "points" => Ok(Self::Points),
            "custom" => Ok(Self::Custom),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid unit kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardType {
    pub id: i64,
    pub family_id: i64,
    pub name: String,
    pub unit_kind: UnitKind,
    pub unit_label: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reward_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub family_id: i64,
    pub name: String,
    pub unit_kind: String,
    pub unit_label: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for RewardType {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            family_id: model.family_id,
            name: model.name,
            unit_kind: UnitKind::try_from(model.unit_kind.as_str())?,
            unit_label: model.unit_label,
            created_at: model.created_at,
        })
    }
}
