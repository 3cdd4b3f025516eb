use super::{entity_keys, fetch_targets, group_by, record_keys, Related, Target};
use crate::{model::Definition, Db, Entity, Result};

use sheetorm_core::stmt::record;

/// Join table of a [`ManyToMany`] relation.
#[derive(Debug, Clone)]
pub struct Pivot {
    pub table: String,

    /// Pivot column referencing the owner
    pub foreign_key: String,

    /// Pivot column referencing the target
    pub related_key: String,
}

/// Owner and target entities joined through a pivot table.
#[derive(Debug, Clone)]
pub struct ManyToMany {
    pub(super) target: Target,
    pub pivot: Pivot,

    /// Column on the owner referenced by the pivot; its primary key when
    /// unset
    pub local_key: Option<String>,

    /// Column on the target referenced by the pivot; its primary key when
    /// unset
    pub owner_key: Option<String>,
}

impl Pivot {
    pub fn new(
        table: impl Into<String>,
        foreign_key: impl Into<String>,
        related_key: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            foreign_key: foreign_key.into(),
            related_key: related_key.into(),
        }
    }
}

impl ManyToMany {
    pub fn new(target: Target, pivot: Pivot) -> Self {
        Self {
            target,
            pivot,
            local_key: None,
            owner_key: None,
        }
    }

    pub fn local_key(mut self, column: impl Into<String>) -> Self {
        self.local_key = Some(column.into());
        self
    }

    pub fn owner_key(mut self, column: impl Into<String>) -> Self {
        self.owner_key = Some(column.into());
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

        let links = if keys.is_empty() {
            vec![]
        } else {
            db.table(&self.pivot.table)
                .filter_in(&self.pivot.foreign_key, keys)
                .get()
                .await?
        };

        let target = (self.target)();
        let owner_key = self
            .owner_key
            .clone()
            .unwrap_or_else(|| target.primary_key().to_string());

        let related_keys = record_keys(&links, &self.pivot.related_key);
        let related = fetch_targets(db, target, &owner_key, related_keys).await?;
        let related = group_by(related, &owner_key);

        for entity in entities {
            let key = entity.get(local_key).to_key();

            let children = links
                .iter()
                .filter(|link| record::get(link, &self.pivot.foreign_key).to_key() == key)
                .filter_map(|link| {
                    related
                        .get(&record::get(link, &self.pivot.related_key).to_key())
                        .and_then(|group| group.first().cloned())
                })
                .collect();

            entity.set_relation(name, Related::Many(children));
        }

        Ok(())
    }
}
