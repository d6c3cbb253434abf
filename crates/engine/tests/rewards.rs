use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};

use engine::{Engine, EngineError, TransactionKind};
use migration::MigratorTrait;

const FAMILY: i64 = 1;
const CHILD: i64 = 10;
const STARS: i64 = 100;

async fn engine_with_db() -> Engine {
    // In-memory SQLite: keep a single pooled connection so every task sees
    // the same database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn grant_creates_account_and_credits() {
    let engine = engine_with_db().await;

    assert!(engine.account(CHILD, STARS).await.unwrap().is_none());

    let receipt = engine
        .grant(FAMILY, CHILD, STARS, 1000, Some("weekly allowance"), None)
        .await
        .unwrap();
    assert_eq!(receipt.new_balance, 1000);

    assert_eq!(engine.balance(CHILD, STARS).await.unwrap(), 1000);

    let account = engine.account(CHILD, STARS).await.unwrap().unwrap();
    assert_eq!(account.family_id, FAMILY);
    assert_eq!(account.child_id, CHILD);
    assert_eq!(account.reward_type_id, STARS);
    assert_eq!(account.balance, 1000);
}

#[tokio::test]
async fn balance_reads_zero_without_account() {
    let engine = engine_with_db().await;

    assert_eq!(engine.balance(CHILD, STARS).await.unwrap(), 0);

    // The read must not have created an account as a side effect.
    let err = engine
        .spend(FAMILY, CHILD, STARS, 1, None, None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::AccountNotFound("account not exists".to_string())
    );
}

#[tokio::test]
async fn grant_rejects_non_positive_value_and_zero_ids() {
    let engine = engine_with_db().await;

    for value in [0, -5] {
        let err = engine
            .grant(FAMILY, CHILD, STARS, value, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    let err = engine.grant(0, CHILD, STARS, 10, None, None).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    let err = engine.grant(FAMILY, 0, STARS, 10, None, None).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    let err = engine.grant(FAMILY, CHILD, 0, 10, None, None).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert_eq!(engine.balance(CHILD, STARS).await.unwrap(), 0);
}

#[tokio::test]
async fn spend_without_account_fails() {
    let engine = engine_with_db().await;

    let err = engine
        .spend(FAMILY, CHILD, STARS, 100, Some("toy"), None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::AccountNotFound("account not exists".to_string())
    );
}

#[tokio::test]
async fn spend_insufficient_funds_leaves_no_trace() {
    let engine = engine_with_db().await;
    engine
        .grant(FAMILY, CHILD, STARS, 500, None, None)
        .await
        .unwrap();

    let err = engine
        .spend(FAMILY, CHILD, STARS, 1000, Some("too much"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    assert_eq!(engine.balance(CHILD, STARS).await.unwrap(), 500);
    let txs = engine
        .list_transactions(CHILD, Some(STARS), None, None)
        .await
        .unwrap();
    assert_eq!(txs.len(), 1);
}

#[tokio::test]
async fn idempotent_replay_returns_original_id_and_current_balance() {
    let engine = engine_with_db().await;

    let first = engine
        .grant(FAMILY, CHILD, STARS, 1000, Some("init"), Some("k1"))
        .await
        .unwrap();
    assert_eq!(first.new_balance, 1000);

    // Same key: same transaction, no second credit.
    let replay = engine
        .grant(FAMILY, CHILD, STARS, 1000, Some("init"), Some("k1"))
        .await
        .unwrap();
    assert_eq!(replay.transaction_id, first.transaction_id);
    assert_eq!(replay.new_balance, 1000);

    let spent = engine
        .spend(FAMILY, CHILD, STARS, 500, Some("use"), Some("k2"))
        .await
        .unwrap();
    assert_eq!(spent.new_balance, 500);

    let err = engine
        .spend(FAMILY, CHILD, STARS, 1000, Some("overuse"), Some("k3"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert_eq!(engine.balance(CHILD, STARS).await.unwrap(), 500);

    // Replaying the original grant now reports the balance as it is today,
    // not as it was at the original write.
    let late_replay = engine
        .grant(FAMILY, CHILD, STARS, 1000, Some("init"), Some("k1"))
        .await
        .unwrap();
    assert_eq!(late_replay.transaction_id, first.transaction_id);
    assert_eq!(late_replay.new_balance, 500);

    let txs = engine
        .list_transactions(CHILD, Some(STARS), None, None)
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
}

#[tokio::test]
async fn empty_key_never_deduplicates() {
    let engine = engine_with_db().await;

    engine
        .grant(FAMILY, CHILD, STARS, 1000, None, Some(""))
        .await
        .unwrap();
    let second = engine
        .grant(FAMILY, CHILD, STARS, 1000, None, None)
        .await
        .unwrap();
    assert_eq!(second.new_balance, 2000);

    let txs = engine
        .list_transactions(CHILD, Some(STARS), None, None)
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
}

#[tokio::test]
async fn balance_equals_credits_minus_debits() {
    let engine = engine_with_db().await;

    for (kind, value, key) in [
        (TransactionKind::Credit, 1000, "g1"),
        (TransactionKind::Debit, 500, "s1"),
        (TransactionKind::Credit, 2000, "g2"),
        (TransactionKind::Debit, 300, "s2"),
    ] {
        match kind {
            TransactionKind::Credit => {
                engine
                    .grant(FAMILY, CHILD, STARS, value, None, Some(key))
                    .await
                    .unwrap();
            }
            TransactionKind::Debit => {
                engine
                    .spend(FAMILY, CHILD, STARS, value, None, Some(key))
                    .await
                    .unwrap();
            }
        }
    }

    let txs = engine
        .list_transactions(CHILD, Some(STARS), None, None)
        .await
        .unwrap();
    let ledger_sum: i64 = txs
        .iter()
        .map(|tx| match tx.kind {
            TransactionKind::Credit => tx.value,
            TransactionKind::Debit => -tx.value,
        })
        .sum();

    assert_eq!(ledger_sum, 2200);
    assert_eq!(engine.balance(CHILD, STARS).await.unwrap(), ledger_sum);
}

#[tokio::test]
async fn concurrent_grants_lose_no_updates() {
    let engine = Arc::new(engine_with_db().await);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let engine = engine.clone();
        tasks.spawn(async move {
            engine
                .grant(FAMILY, CHILD, STARS, 5, None, None)
                .await
                .unwrap()
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap();
    }

    assert_eq!(engine.balance(CHILD, STARS).await.unwrap(), 40);
    let txs = engine
        .list_transactions(CHILD, Some(STARS), None, None)
        .await
        .unwrap();
    assert_eq!(txs.len(), 8);
}

#[tokio::test]
async fn concurrent_spends_never_overdraw() {
    let engine = Arc::new(engine_with_db().await);
    engine
        .grant(FAMILY, CHILD, STARS, 100, None, None)
        .await
        .unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..5 {
        let engine = engine.clone();
        tasks.spawn(async move { engine.spend(FAMILY, CHILD, STARS, 30, None, None).await });
    }

    let mut succeeded = 0;
    let mut rejected = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => succeeded += 1,
            Err(EngineError::InsufficientFunds(_)) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    // 100 covers exactly three spends of 30; the rest must bounce.
    assert_eq!(succeeded, 3);
    assert_eq!(rejected, 2);
    assert_eq!(engine.balance(CHILD, STARS).await.unwrap(), 10);
}

#[tokio::test]
async fn concurrent_same_key_writes_once() {
    let engine = Arc::new(engine_with_db().await);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..4 {
        let engine = engine.clone();
        tasks.spawn(async move {
            engine
                .grant(FAMILY, CHILD, STARS, 1000, Some("init"), Some("shared-key"))
                .await
                .unwrap()
        });
    }

    let mut ids = Vec::new();
    while let Some(result) = tasks.join_next().await {
        ids.push(result.unwrap().transaction_id);
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 1, "all callers must observe one transaction");
    assert_eq!(engine.balance(CHILD, STARS).await.unwrap(), 1000);
    let txs = engine
        .list_transactions(CHILD, Some(STARS), None, None)
        .await
        .unwrap();
    assert_eq!(txs.len(), 1);
}
