use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod accounts;
mod reward_types;
mod rewards;
mod transactions;

pub use rewards::Receipt;
pub use transactions::AdjustMode;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger engine.
///
/// One instance per database; every call opens its own transaction, so a
/// single engine can serve concurrent callers. The connection is injected at
/// build time and never reached through globals.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn require_id(value: i64, label: &str) -> ResultEngine<()> {
    if value <= 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be a positive id"
        )));
    }
    Ok(())
}

fn require_positive_value(value: i64) -> ResultEngine<()> {
    if value <= 0 {
        return Err(EngineError::InvalidAmount("value must be > 0".to_string()));
    }
    Ok(())
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
