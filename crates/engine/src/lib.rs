pub use accounts::Account;
pub use error::EngineError;
pub use ops::{AdjustMode, Engine, EngineBuilder, Receipt};
pub use reward_types::{RewardType, UnitKind};
pub use transactions::{Transaction, TransactionKind};

mod accounts;
mod error;
mod ops;
mod reward_types;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
