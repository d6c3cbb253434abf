//! Account primitives.
//!
//! An `Account` holds one child's balance for one reward type within a
//! family. Accounts are created lazily on the first grant and are never
//! deleted; the balance is mutated only by the ledger operations, under an
//! exclusive row lock.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    /// Opaque family reference. Owned by the provisioning side; the ledger
    /// only requires it to be non-zero.
    pub family_id: i64,
    pub child_id: i64,
    pub reward_type_id: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub family_id: i64,
    pub child_id: i64,
    pub reward_type_id: i64,
    pub balance: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            family_id: model.family_id,
            child_id: model.child_id,
            reward_type_id: model.reward_type_id,
            balance: model.balance,
            created_at: model.created_at,
        }
    }
}
