use super::{Definition, HookKind};
use crate::{relation, relation::Related, Db, Error, Result};

use chrono::Utc;
use indexmap::{IndexMap, IndexSet};
use sheetorm_core::stmt::{record, Record, Value};
use std::{fmt, sync::Arc};

/// A row of a model's table, with change tracking and lifecycle operations.
///
/// An entity is either new (never saved), persisted, or removed (hard
/// deleted). A removed entity can no longer be saved, deleted, restored or
/// refreshed.
#[derive(Clone)]
pub struct Entity {
    definition: Arc<Definition>,
    db: Db,

    /// Current values
    attributes: Record,

    /// Values as of the last load or save
    original: Record,

    /// Attributes changed since the last load or save
    dirty: IndexSet<String>,

    exists: bool,
    removed: bool,

    relations: IndexMap<String, Related>,
}

impl Entity {
    /// A new, unsaved entity.
    pub fn new(db: Db, definition: Arc<Definition>) -> Self {
        Self {
            definition,
            db,
            attributes: Record::new(),
            original: Record::new(),
            dirty: IndexSet::new(),
            exists: false,
            removed: false,
            relations: IndexMap::new(),
        }
    }

    /// A persisted entity built from a stored row.
    pub(crate) fn hydrate(db: Db, definition: Arc<Definition>, record: Record) -> Self {
        Self {
            original: record.clone(),
            attributes: record,
            exists: true,
            ..Self::new(db, definition)
        }
    }

    pub fn definition(&self) -> &Arc<Definition> {
        &self.definition
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Assigns every value of `record`.
    ///
    /// On a new entity the values also become the original values. On a
    /// persisted entity, an attribute that now differs from its original
    /// value is marked dirty. Setting it back does not clear the mark.
    pub fn fill(&mut self, record: Record) -> &mut Self {
        for (column, value) in record {
            self.set(column, value);
        }
        self
    }

    /// Same as [`Entity::fill`].
    pub fn merge(&mut self, record: Record) -> &mut Self {
        self.fill(record)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let column = column.into();
        let value = value.into();

        if !self.exists {
            self.original.insert(column.clone(), value.clone());
        } else if record::get(&self.original, &column) != &value {
            self.dirty.insert(column.clone());
        }

        self.attributes.insert(column, value);
        self
    }

    /// The attribute's value, `Null` when unset.
    pub fn get(&self, column: &str) -> &Value {
        record::get(&self.attributes, column)
    }

    /// The attribute converted to `T`, `None` when unset or null.
    pub fn get_as<T>(&self, column: &str) -> Result<Option<T>>
    where
        T: TryFrom<Value, Error = Error>,
    {
        match self.get(column) {
            Value::Null => Ok(None),
            value => T::try_from(value.clone()).map(Some),
        }
    }

    pub fn attributes(&self) -> &Record {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Record {
        &mut self.attributes
    }

    pub fn original(&self) -> &Record {
        &self.original
    }

    /// Current values of the dirty attributes.
    pub fn dirty(&self) -> Record {
        self.dirty
            .iter()
            .map(|column| (column.clone(), self.get(column).clone()))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_new(&self) -> bool {
        !self.exists
    }

    pub fn is_persisted(&self) -> bool {
        self.exists
    }

    /// `true` when the model uses soft deletes and this entity carries a
    /// deletion timestamp.
    pub fn is_trashed(&self) -> bool {
        self.definition.soft_deletes() && !self.get(self.definition.deleted_at_column()).is_empty()
    }

    /// The primary key value.
    pub fn id(&self) -> &Value {
        self.get(self.definition.primary_key())
    }

    /// Persists the entity, creating or updating it depending on whether it
    /// exists.
    ///
    /// Hooks run in this order: before-create or before-update, before-save,
    /// persistence, after-create or after-update, after-save.
    pub async fn save(&mut self) -> Result<()> {
        self.ensure_not_removed("save")?;

        let definition = self.definition.clone();
        let persistence = self.db.persistence();

        if self.exists {
            definition.run_hooks(HookKind::BeforeUpdate, self).await?;
            definition.run_hooks(HookKind::BeforeSave, self).await?;
            tracing::debug!(model = definition.name(), id = %self.id(), "updating entity");
            persistence.perform_update(self).await?;
            definition.run_hooks(HookKind::AfterUpdate, self).await?;
        } else {
            definition.run_hooks(HookKind::BeforeCreate, self).await?;
            definition.run_hooks(HookKind::BeforeSave, self).await?;
            tracing::debug!(model = definition.name(), "creating entity");
            persistence.perform_create(self).await?;
            definition.run_hooks(HookKind::AfterCreate, self).await?;
        }

        definition.run_hooks(HookKind::AfterSave, self).await?;

        self.exists = true;
        self.original = self.attributes.clone();
        self.dirty.clear();

        Ok(())
    }

    /// Deletes the entity. Soft-deletable models get a deletion timestamp and
    /// are saved; other models have their row removed.
    pub async fn delete(&mut self) -> Result<()> {
        self.ensure_not_removed("delete")?;
        if !self.exists {
            return Err(Error::invalid_operation(format!(
                "cannot delete an unsaved {}",
                self.definition.name()
            )));
        }

        let definition = self.definition.clone();
        definition.run_hooks(HookKind::BeforeDelete, self).await?;

        if definition.soft_deletes() {
            self.set(definition.deleted_at_column(), Utc::now());
            self.save().await?;
        } else {
            self.perform_delete().await?;
        }

        definition.run_hooks(HookKind::AfterDelete, self).await
    }

    /// Removes the row even when the model uses soft deletes. No hooks run.
    pub async fn force_delete(&mut self) -> Result<()> {
        self.ensure_not_removed("delete")?;
        self.perform_delete().await
    }

    /// Clears the deletion timestamp and saves.
    pub async fn restore(&mut self) -> Result<()> {
        self.ensure_not_removed("restore")?;
        if !self.definition.soft_deletes() {
            return Err(Error::invalid_operation(format!(
                "{} does not use soft deletes",
                self.definition.name()
            )));
        }

        let column = self.definition.deleted_at_column().to_string();
        self.set(column, Value::Null);
        self.save().await
    }

    /// Reloads the attributes from the table, including trashed rows. Loaded
    /// relations are kept.
    pub async fn refresh(&mut self) -> Result<()> {
        self.ensure_not_removed("refresh")?;

        let id = self.id().clone();
        if !self.exists || !id.is_truthy() {
            return Err(Error::invalid_operation(format!(
                "cannot refresh an unsaved {}",
                self.definition.name()
            )));
        }

        let fresh = self
            .db
            .model_query(self.definition.clone())
            .with_trashed()
            .filter_eq(self.definition.primary_key(), id.clone())
            .fetch_entities()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::model_not_found(self.definition.name(), &id))?;

        self.attributes = fresh.attributes;
        self.original = fresh.original;
        self.dirty.clear();

        Ok(())
    }

    /// Loads one relation into this entity.
    pub async fn load(&mut self, relation: &str) -> Result<&mut Self> {
        let definition = self.definition.clone();
        let db = self.db.clone();

        relation::load(&db, &definition, std::slice::from_mut(self), relation).await?;
        Ok(self)
    }

    pub fn relation(&self, name: &str) -> Option<&Related> {
        self.relations.get(name)
    }

    pub fn has_relation(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    pub fn set_relation(&mut self, name: impl Into<String>, related: Related) {
        self.relations.insert(name.into(), related);
    }

    pub fn relations(&self) -> &IndexMap<String, Related> {
        &self.relations
    }

    /// Attributes as JSON, without hidden columns, followed by the loaded
    /// relations.
    pub fn serialize(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();

        for (column, value) in &self.attributes {
            if !self.definition.is_hidden(column) {
                object.insert(column.clone(), value.to_json());
            }
        }

        for (name, related) in &self.relations {
            object.insert(name.clone(), related.to_json());
        }

        serde_json::Value::Object(object)
    }

    async fn perform_delete(&mut self) -> Result<()> {
        tracing::debug!(model = self.definition.name(), id = %self.id(), "deleting entity");

        let persistence = self.db.persistence();
        persistence.perform_delete(self).await?;

        self.exists = false;
        self.removed = true;
        Ok(())
    }

    fn ensure_not_removed(&self, operation: &str) -> Result<()> {
        if self.removed {
            return Err(Error::invalid_operation(format!(
                "cannot {operation} a deleted {}",
                self.definition.name()
            )));
        }
        Ok(())
    }
}

impl serde::Serialize for Entity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let value = Entity::serialize(self);
        serde::Serialize::serialize(&value, serializer)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("model", &self.definition.name())
            .field("attributes", &self.attributes)
            .field("dirty", &self.dirty)
            .field("exists", &self.exists)
            .field("removed", &self.removed)
            .field("relations", &self.relations.keys().collect::<Vec<_>>())
            .finish()
    }
}
