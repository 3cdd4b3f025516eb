use super::{entity_keys, fetch_targets, group_by, Related, Target};
use crate::{Db, Entity, Result};

/// The owner's `foreign_key` references one target entity.
#[derive(Debug, Clone)]
pub struct BelongsTo {
    pub(super) target: Target,

    /// Column on the owner holding the target's key
    pub foreign_key: String,

    /// Column on the target; its primary key when unset
    pub owner_key: Option<String>,
}

impl BelongsTo {
    pub fn new(target: Target, foreign_key: impl Into<String>) -> Self {
        Self {
            target,
            foreign_key: foreign_key.into(),
            owner_key: None,
        }
    }

    pub fn owner_key(mut self, column: impl Into<String>) -> Self {
        self.owner_key = Some(column.into());
        self
    }

    pub(super) async fn load(&self, db: &Db, entities: &mut [Entity], name: &str) -> Result<()> {
        let target = (self.target)();
        let owner_key = self
            .owner_key
            .clone()
            .unwrap_or_else(|| target.primary_key().to_string());

        let keys = entity_keys(entities, &self.foreign_key);
        let related = fetch_targets(db, target, &owner_key, keys).await?;
        let owners = group_by(related, &owner_key);

        for entity in entities {
            let owner = owners
                .get(&entity.get(&self.foreign_key).to_key())
                .and_then(|group| group.first().cloned());
            entity.set_relation(name, Related::One(owner));
        }

        Ok(())
    }
}
