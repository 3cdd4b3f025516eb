use super::{entity_keys, fetch_targets, group_by, Related, Target};
use crate::{model::Definition, Db, Entity, Result};

/// The owner's key is referenced by `foreign_key` on many target entities.
#[derive(Debug, Clone)]
pub struct HasMany {
    pub(super) target: Target,

    /// Column on the target holding the owner's key
    pub foreign_key: String,

    /// Column on the owner; its primary key when unset
    pub local_key: Option<String>,
}

impl HasMany {
    pub fn new(target: Target, foreign_key: impl Into<String>) -> Self {
        Self {
            target,
            foreign_key: foreign_key.into(),
            local_key: None,
        }
    }

    pub fn local_key(mut self, column: impl Into<String>) -> Self {
        self.local_key = Some(column.into());
        self
    }

    pub(super) async fn load(
        &self,
        db: &Db,
        owner: &Definition,
        entities: &mut [Entity],
        name: &str,
    ) -> Result<()> {
        let local_key = self.local_key.as_deref().unwrap_or(owner.primary_key());

        let keys = entity_keys(entities, local_key);
        let related = fetch_targets(db, (self.target)(), &self.foreign_key, keys).await?;
        let groups = group_by(related, &self.foreign_key);

        for entity in entities {
            let children = groups
                .get(&entity.get(local_key).to_key())
                .cloned()
                .unwrap_or_default();
            entity.set_relation(name, Related::Many(children));
        }

        Ok(())
    }
}
