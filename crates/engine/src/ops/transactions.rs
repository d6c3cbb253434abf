//! Transaction log queries and post-hoc adjustments.

use sea_orm::{
    ActiveValue, DatabaseTransaction, JoinType, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, accounts, transactions};

use super::{Engine, require_id, with_tx};

/// Page size used by [`Engine::list_transactions`] when the caller does not
/// ask for one.
const DEFAULT_LIST_LIMIT: u64 = 20;

/// How [`Engine::adjust_transaction`] treats the owning account's balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdjustMode {
    /// Rewrite value/note in place and leave the account balance as it is.
    ///
    /// The stored balance and the ledger sum can diverge afterwards; this
    /// treats the adjustment as a record correction, not a financial one.
    KeepBalance,
    /// Additionally apply the signed value delta to the owning account's
    /// balance, keeping the stored balance equal to the ledger sum.
    ReconcileBalance,
}

impl Engine {
    /// Looks up a previously committed transaction by idempotency key.
    pub(super) async fn find_prior_transaction(
        &self,
        db_tx: &DatabaseTransaction,
        key: &str,
    ) -> ResultEngine<Option<transactions::Model>> {
        transactions::Entity::find()
            .filter(transactions::Column::IdempotencyKey.eq(key))
            .one(db_tx)
            .await
            .map_err(Into::into)
    }

    /// Lists a child's transactions, newest first by id.
    ///
    /// `before_id` is a cursor: only entries with id strictly below it are
    /// returned, so a caller pages by passing the oldest id it has seen.
    /// `limit` falls back to 20 when absent or non-positive.
    pub async fn list_transactions(
        &self,
        child_id: i64,
        reward_type_id: Option<i64>,
        limit: Option<i64>,
        before_id: Option<i64>,
    ) -> ResultEngine<Vec<Transaction>> {
        require_id(child_id, "child_id")?;

        let limit = match limit {
            Some(n) if n > 0 => n as u64,
            _ => DEFAULT_LIST_LIMIT,
        };

        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find()
                .join(JoinType::InnerJoin, transactions::Relation::Accounts.def())
                .filter(accounts::Column::ChildId.eq(child_id))
                .order_by_desc(transactions::Column::Id)
                .limit(limit);

            if let Some(reward_type_id) = reward_type_id {
                query = query.filter(accounts::Column::RewardTypeId.eq(reward_type_id));
            }
            if let Some(before_id) = before_id {
                query = query.filter(transactions::Column::Id.lt(before_id));
            }

            let rows: Vec<transactions::Model> = query.all(&db_tx).await?;
            let mut out = Vec::with_capacity(rows.len());
            for model in rows {
                out.push(Transaction::try_from(model)?);
            }
            Ok(out)
        })
    }

    /// Rewrites the stored value and/or note of an existing transaction.
    ///
    /// Kind, account and timestamp are never touched. Whether the owning
    /// account's balance follows the new value is decided by `mode`; with
    /// [`AdjustMode::KeepBalance`] the balance stays as committed.
    pub async fn adjust_transaction(
        &self,
        transaction_id: i64,
        new_value: Option<i64>,
        new_note: Option<&str>,
        mode: AdjustMode,
    ) -> ResultEngine<()> {
        require_id(transaction_id, "transaction_id")?;
        if let Some(value) = new_value
            && value < 0
        {
            return Err(EngineError::InvalidAmount("value must be >= 0".to_string()));
        }

        with_tx!(self, |db_tx| {
            let tx_model = transactions::Entity::find_by_id(transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;

            if mode == AdjustMode::ReconcileBalance
                && let Some(value) = new_value
                && value != tx_model.value
            {
                let kind = TransactionKind::try_from(tx_model.kind.as_str())?;
                let account = accounts::Entity::find_by_id(tx_model.account_id)
                    .lock_exclusive()
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::AccountNotFound("account not exists".to_string())
                    })?;
                let delta = value - tx_model.value;
                let new_balance = match kind {
                    TransactionKind::Credit => account.balance + delta,
                    TransactionKind::Debit => account.balance - delta,
                };
                let account_update = accounts::ActiveModel {
                    id: ActiveValue::Set(account.id),
                    balance: ActiveValue::Set(new_balance),
                    ..Default::default()
                };
                account_update.update(&db_tx).await?;
            }

            if new_value.is_none() && new_note.is_none() {
                return Ok(());
            }

            let mut tx_update = transactions::ActiveModel {
                id: ActiveValue::Set(tx_model.id),
                ..Default::default()
            };
            if let Some(value) = new_value {
                tx_update.value = ActiveValue::Set(value);
            }
            if let Some(note) = new_note {
                tx_update.note = ActiveValue::Set(Some(note.to_string()));
            }
            tx_update.update(&db_tx).await?;
            Ok(())
        })
    }
}
