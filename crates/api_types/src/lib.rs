use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod reward_type {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum UnitKind {
        Money,
        Time,
        Points,
        Custom,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RewardTypeNew {
        pub family_id: i64,
        pub name: String,
        pub unit_kind: UnitKind,
        pub unit_label: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RewardTypeCreated {
        pub id: i64,
    }
}

pub mod reward {
    use super::*;

    /// Request body for granting a reward (credit).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GrantNew {
        pub family_id: i64,
        pub child_id: i64,
        pub reward_type_id: i64,
        /// Must be > 0.
        pub value: i64,
        pub note: Option<String>,
        /// Optional idempotency key for safely retrying the same request.
        pub idempotency_key: Option<String>,
    }

    /// Request body for spending a reward (debit). Same shape as a grant.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendNew {
        pub family_id: i64,
        pub child_id: i64,
        pub reward_type_id: i64,
        /// Must be > 0.
        pub value: i64,
        pub note: Option<String>,
        /// Optional idempotency key for safely retrying the same request.
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptView {
        pub transaction_id: i64,
        pub new_balance: i64,
    }
}

pub mod balance {
    use super::*;

    /// Query parameters for a balance read.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceGet {
        pub child_id: i64,
        pub reward_type_id: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub balance: i64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Credit,
        Debit,
    }

    /// Query parameters for listing a child's transactions.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub child_id: i64,
        pub reward_type_id: Option<i64>,
        /// Defaults to 20 when absent or non-positive.
        pub limit: Option<i64>,
        /// Pagination cursor: only entries with id below this are returned.
        ///
        /// Newest → older pagination; pass the oldest id seen so far.
        pub before_id: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub account_id: i64,
        pub kind: TransactionKind,
        pub value: i64,
        pub note: Option<String>,
        pub created_by: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    /// Request body for adjusting a committed transaction's value/note.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionAdjust {
        /// Must be >= 0 when present.
        pub new_value: Option<i64>,
        pub new_note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionAdjusted {
        pub id: i64,
    }
}
