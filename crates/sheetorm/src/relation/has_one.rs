use super::{entity_keys, fetch_targets, group_by, Related, Target};
use crate::{model::Definition, Db, Entity, Result};

/// Like [`HasMany`](super::HasMany), attaching a single match. When several
/// rows share the key, the one stored last wins.
#[derive(Debug, Clone)]
pub struct HasOne {
    pub(super) target: Target,
    pub foreign_key: String,
    pub local_key: Option<String>,
}

impl HasOne {
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
            let child = groups
                .get(&entity.get(local_key).to_key())
                .and_then(|group| group.last().cloned());
            entity.set_relation(name, Related::One(child));
        }

        Ok(())
    }
}
