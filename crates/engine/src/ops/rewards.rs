//! Grant and spend, the write side of the ledger.
//!
//! Each call is one unit of work: idempotency check, account resolution,
//! row lock, validation, transaction insert and balance update commit
//! together or not at all.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use serde::Serialize;

use crate::{EngineError, ResultEngine, TransactionKind, accounts, transactions};

use super::{Engine, normalize_optional_text, require_id, require_positive_value, with_tx};

/// Outcome of a committed grant or spend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub transaction_id: i64,
    pub new_balance: i64,
}

impl Engine {
    /// Credits `value` to the child's account for the given reward type,
    /// creating the account on first use.
    ///
    /// A repeated call with the same non-empty `idempotency_key` returns the
    /// original transaction id and the account's current balance without
    /// writing anything.
    pub async fn grant(
        &self,
        family_id: i64,
        child_id: i64,
        reward_type_id: i64,
        value: i64,
        note: Option<&str>,
        idempotency_key: Option<&str>,
    ) -> ResultEngine<Receipt> {
        require_id(family_id, "family_id")?;
        require_id(child_id, "child_id")?;
        require_id(reward_type_id, "reward_type_id")?;
        require_positive_value(value)?;
        let note = normalize_optional_text(note);
        let key = normalize_optional_text(idempotency_key);

        with_tx!(self, |db_tx| {
            if let Some(key) = key.as_deref()
                && let Some(prior) = self.find_prior_transaction(&db_tx, key).await?
            {
                let new_balance = self.account_balance(&db_tx, child_id, reward_type_id).await?;
                return Ok(Receipt {
                    transaction_id: prior.id,
                    new_balance,
                });
            }

            let account = self
                .get_or_create_account(&db_tx, family_id, child_id, reward_type_id)
                .await?;
            self.write_ledger_entry(
                &db_tx,
                account,
                TransactionKind::Credit,
                value,
                note.clone(),
                child_id,
                key.clone(),
            )
            .await
        })
    }

    /// Debits `value` from the child's account for the given reward type.
    ///
    /// Unlike [`Engine::grant`] this requires an existing account, and the
    /// balance is re-checked after the row lock is held so that two
    /// concurrent spenders cannot both pass on the same funds.
    pub async fn spend(
        &self,
        family_id: i64,
        child_id: i64,
        reward_type_id: i64,
        value: i64,
        note: Option<&str>,
        idempotency_key: Option<&str>,
    ) -> ResultEngine<Receipt> {
        require_id(family_id, "family_id")?;
        require_id(child_id, "child_id")?;
        require_id(reward_type_id, "reward_type_id")?;
        require_positive_value(value)?;
        let note = normalize_optional_text(note);
        let key = normalize_optional_text(idempotency_key);

        with_tx!(self, |db_tx| {
            if let Some(key) = key.as_deref()
                && let Some(prior) = self.find_prior_transaction(&db_tx, key).await?
            {
                let new_balance = self.account_balance(&db_tx, child_id, reward_type_id).await?;
                return Ok(Receipt {
                    transaction_id: prior.id,
                    new_balance,
                });
            }

            let account = self
                .find_account_for_update(&db_tx, child_id, reward_type_id)
                .await?
                .ok_or_else(|| EngineError::AccountNotFound("account not exists".to_string()))?;
            if account.balance < value {
                return Err(EngineError::InsufficientFunds(format!(
                    "account {}",
                    account.id
                )));
            }

            self.write_ledger_entry(
                &db_tx,
                account,
                TransactionKind::Debit,
                value,
                note.clone(),
                child_id,
                key.clone(),
            )
            .await
        })
    }

    /// Appends the transaction row and moves the balance as one unit.
    ///
    /// The caller already holds the account row lock. A lost insert race on
    /// the idempotency key unique index is resolved by re-reading the
    /// winner's row; in that case the balance is left untouched.
    async fn write_ledger_entry(
        &self,
        db_tx: &DatabaseTransaction,
        account: accounts::Model,
        kind: TransactionKind,
        value: i64,
        note: Option<String>,
        created_by: i64,
        idempotency_key: Option<String>,
    ) -> ResultEngine<Receipt> {
        let row = transactions::ActiveModel {
            id: ActiveValue::NotSet,
            account_id: ActiveValue::Set(account.id),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            value: ActiveValue::Set(value),
            note: ActiveValue::Set(note),
            created_by: ActiveValue::Set(created_by),
            idempotency_key: ActiveValue::Set(idempotency_key.clone()),
            created_at: ActiveValue::Set(Utc::now()),
        };

        let inserted = match row.insert(db_tx).await {
            Ok(model) => model,
            Err(err) => {
                if let Some(key) = idempotency_key.as_deref()
                    && let Some(prior) = self.find_prior_transaction(db_tx, key).await?
                {
                    return Ok(Receipt {
                        transaction_id: prior.id,
                        new_balance: account.balance,
                    });
                }
                return Err(err.into());
            }
        };

        let new_balance = match kind {
            TransactionKind::Credit => account.balance + value,
            TransactionKind::Debit => account.balance - value,
        };
        let account_update = accounts::ActiveModel {
            id: ActiveValue::Set(account.id),
            balance: ActiveValue::Set(new_balance),
            ..Default::default()
        };
        account_update.update(db_tx).await?;

        Ok(Receipt {
            transaction_id: inserted.id,
            new_balance,
        })
    }
}
