use super::Entity;
use crate::{Error, Result, Validator};

use async_trait::async_trait;
use chrono::Utc;
use sheetorm_core::stmt::{record, Query, Record, Value};

/// Writes entities to storage. [`Entity::save`], [`Entity::delete`] and
/// friends go through the implementation registered on the `Db`.
#[async_trait]
pub trait Persistence: Send + Sync + 'static {
    /// Stores a new entity. Values assigned by storage, such as an allocated
    /// primary key, are written back into the entity.
    async fn perform_create(&self, entity: &mut Entity) -> Result<()>;

    async fn perform_update(&self, entity: &mut Entity) -> Result<()>;

    async fn perform_delete(&self, entity: &mut Entity) -> Result<()>;
}

/// Stores each entity as a row of its model's table.
#[derive(Debug, Default, Clone, Copy)]
pub struct TablePersistence;

#[async_trait]
impl Persistence for TablePersistence {
    async fn perform_create(&self, entity: &mut Entity) -> Result<()> {
        stamp(entity, true);

        let db = entity.db().clone();
        let table = entity.definition().table().to_string();

        if let Some(schema) = db.schema(&table).cloned() {
            let existing = if schema.has_unique_rule() {
                Some(db.select(&Query::new(&table)).await?)
            } else {
                None
            };

            Validator::new(&schema).validate(entity.attributes(), existing.as_deref())?;
        }

        let written = db.insert(&table, entity.attributes().clone()).await?;
        entity.attributes_mut().extend(written);

        Ok(())
    }

    async fn perform_update(&self, entity: &mut Entity) -> Result<()> {
        let id = own_id(entity, "update")?;
        stamp(entity, false);

        let db = entity.db().clone();
        let definition = entity.definition().clone();
        let table = definition.table();
        let primary_key = definition.primary_key();

        if let Some(schema) = db.schema(table).cloned() {
            let existing = if schema.has_unique_rule() {
                let rows: Vec<Record> = db
                    .select(&Query::new(table))
                    .await?
                    .into_iter()
                    .filter(|row| !record::get(row, primary_key).loose_eq(&id))
                    .collect();
                Some(rows)
            } else {
                None
            };

            Validator::new(&schema).validate(entity.attributes(), existing.as_deref())?;
        }

        let affected = db
            .table(table)
            .filter_eq(primary_key, id.clone())
            .update(entity.attributes().clone())
            .await?;

        if affected == 0 {
            return Err(Error::model_not_found(definition.name(), id));
        }

        Ok(())
    }

    async fn perform_delete(&self, entity: &mut Entity) -> Result<()> {
        let id = own_id(entity, "delete")?;
        let definition = entity.definition().clone();

        let affected = entity
            .db()
            .table(definition.table())
            .filter_eq(definition.primary_key(), id.clone())
            .delete()
            .await?;

        if affected == 0 {
            return Err(Error::model_not_found(definition.name(), id));
        }

        Ok(())
    }
}

fn own_id(entity: &Entity, operation: &str) -> Result<Value> {
    let id = entity.id();
    if id.is_empty() {
        return Err(Error::invalid_operation(format!(
            "cannot {operation} a {} without a primary key",
            entity.definition().name()
        )));
    }
    Ok(id.clone())
}

/// Writes the current time into timestamp columns. On create, auto-create
/// columns are only filled when empty.
fn stamp(entity: &mut Entity, creating: bool) {
    let definition = entity.definition().clone();
    let schema = entity.db().schema(definition.table()).cloned();
    let now = Value::from(Utc::now());

    let mut create_columns = vec![];
    let mut update_columns = vec![];

    for (name, meta) in definition.columns() {
        if meta.auto_create {
            create_columns.push(name.to_string());
        }
        if meta.auto_update {
            update_columns.push(name.to_string());
        }
    }

    if let Some(schema) = &schema {
        for (name, column) in schema.columns() {
            if column.auto_create && !create_columns.iter().any(|c| c == name) {
                create_columns.push(name.to_string());
            }
            if column.auto_update && !update_columns.iter().any(|c| c == name) {
                update_columns.push(name.to_string());
            }
        }
    }

    if creating {
        for column in create_columns {
            if entity.get(&column).is_empty() {
                entity.set(column, now.clone());
            }
        }
    }

    for column in update_columns {
        entity.set(column, now.clone());
    }
}
