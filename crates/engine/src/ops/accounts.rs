use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{Account, ResultEngine, accounts};

use super::{Engine, require_id, with_tx};

impl Engine {
    /// Returns the account row for `(child, reward type)` locked for update,
    /// or `None` when it does not exist.
    ///
    /// The lock is held until the caller's transaction commits or rolls
    /// back; backends without row locks fall back to their native write
    /// serialization.
    pub(super) async fn find_account_for_update(
        &self,
        db_tx: &DatabaseTransaction,
        child_id: i64,
        reward_type_id: i64,
    ) -> ResultEngine<Option<accounts::Model>> {
        accounts::Entity::find()
            .filter(accounts::Column::ChildId.eq(child_id))
            .filter(accounts::Column::RewardTypeId.eq(reward_type_id))
            .lock_exclusive()
            .one(db_tx)
            .await
            .map_err(Into::into)
    }

    /// Resolves the account for `(child, reward type)`, creating it with a
    /// zero balance on first use.
    ///
    /// Two callers racing on the first creation are split by the unique
    /// index on `(child_id, reward_type_id)`: the loser's insert fails and
    /// it re-reads the winner's row.
    pub(super) async fn get_or_create_account(
        &self,
        db_tx: &DatabaseTransaction,
        family_id: i64,
        child_id: i64,
        reward_type_id: i64,
    ) -> ResultEngine<accounts::Model> {
        if let Some(model) = self
            .find_account_for_update(db_tx, child_id, reward_type_id)
            .await?
        {
            return Ok(model);
        }

        let new_account = accounts::ActiveModel {
            id: ActiveValue::NotSet,
            family_id: ActiveValue::Set(family_id),
            child_id: ActiveValue::Set(child_id),
            reward_type_id: ActiveValue::Set(reward_type_id),
            balance: ActiveValue::Set(0),
            created_at: ActiveValue::Set(Utc::now()),
        };
        match new_account.insert(db_tx).await {
            Ok(model) => Ok(model),
            Err(err) => {
                match self
                    .find_account_for_update(db_tx, child_id, reward_type_id)
                    .await?
                {
                    Some(model) => Ok(model),
                    None => Err(err.into()),
                }
            }
        }
    }

    pub(super) async fn account_balance(
        &self,
        db_tx: &DatabaseTransaction,
        child_id: i64,
        reward_type_id: i64,
    ) -> ResultEngine<i64> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::ChildId.eq(child_id))
            .filter(accounts::Column::RewardTypeId.eq(reward_type_id))
            .one(db_tx)
            .await?;
        Ok(model.map_or(0, |m| m.balance))
    }

    /// Returns the account for `(child, reward type)`, or `None` when the
    /// child has never been granted that reward type.
    pub async fn account(
        &self,
        child_id: i64,
        reward_type_id: i64,
    ) -> ResultEngine<Option<Account>> {
        require_id(child_id, "child_id")?;
        require_id(reward_type_id, "reward_type_id")?;

        with_tx!(self, |db_tx| {
            let model = accounts::Entity::find()
                .filter(accounts::Column::ChildId.eq(child_id))
                .filter(accounts::Column::RewardTypeId.eq(reward_type_id))
                .one(&db_tx)
                .await?;
            Ok(model.map(Account::from))
        })
    }

    /// Returns the current balance for `(child, reward type)`.
    ///
    /// Reads never create an account: a missing account reads as 0.
    pub async fn balance(&self, child_id: i64, reward_type_id: i64) -> ResultEngine<i64> {
        require_id(child_id, "child_id")?;
        require_id(reward_type_id, "reward_type_id")?;

        with_tx!(self, |db_tx| {
            self.account_balance(&db_tx, child_id, reward_type_id).await
        })
    }
}
