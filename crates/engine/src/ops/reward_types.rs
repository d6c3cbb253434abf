use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, RewardType, UnitKind, reward_types};

use super::{Engine, normalize_optional_text, normalize_required_name, require_id, with_tx};

impl Engine {
    /// Registers a reward type for a family.
    ///
    /// Names are unique per family; a duplicate surfaces as `ExistingKey`.
    pub async fn new_reward_type(
        &self,
        family_id: i64,
        name: &str,
        unit_kind: UnitKind,
        unit_label: Option<&str>,
    ) -> ResultEngine<RewardType> {
        require_id(family_id, "family_id")?;
        let name = normalize_required_name(name, "reward type")?;
        let unit_label = normalize_optional_text(unit_label);

        with_tx!(self, |db_tx| {
            let row = reward_types::ActiveModel {
                id: ActiveValue::NotSet,
                family_id: ActiveValue::Set(family_id),
                name: ActiveValue::Set(name.clone()),
                unit_kind: ActiveValue::Set(unit_kind.as_str().to_string()),
                unit_label: ActiveValue::Set(unit_label.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            };
            match row.insert(&db_tx).await {
                Ok(model) => Ok(RewardType::try_from(model)?),
                Err(err) => {
                    let existing = reward_types::Entity::find()
                        .filter(reward_types::Column::FamilyId.eq(family_id))
                        .filter(reward_types::Column::Name.eq(name.clone()))
                        .one(&db_tx)
                        .await?;
                    if existing.is_some() {
                        Err(EngineError::ExistingKey(name.clone()))
                    } else {
                        Err(err.into())
                    }
                }
            }
        })
    }
}
