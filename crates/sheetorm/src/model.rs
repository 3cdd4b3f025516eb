mod definition;
pub use definition::{ColumnMeta, Definition, DefinitionBuilder, Scope};

mod entity;
pub use entity::Entity;

mod hook;
pub use hook::{Hook, HookKind};

mod persistence;
pub use persistence::{Persistence, TablePersistence};

mod query;
pub use query::ModelQuery;

use crate::{Db, Error, Result};

use sheetorm_core::stmt::{Record, Value};
use std::sync::Arc;

/// A type with a registered model definition.
///
/// ```
/// use sheetorm::{model::Definition, Model};
/// use std::sync::{Arc, OnceLock};
///
/// struct User;
///
/// impl Model for User {
///     fn definition() -> Arc<Definition> {
///         static DEFINITION: OnceLock<Arc<Definition>> = OnceLock::new();
///         DEFINITION
///             .get_or_init(|| Definition::builder("User", "users").soft_deletes().build())
///             .clone()
///     }
/// }
/// ```
pub trait Model {
    fn definition() -> Arc<Definition>;
}

impl Db {
    /// Starts an entity query for `M`.
    pub fn query<M: Model>(&self) -> ModelQuery {
        ModelQuery::new(self.clone(), M::definition())
    }

    /// Starts an entity query for a definition that has no `Model` type.
    pub fn model_query(&self, definition: Arc<Definition>) -> ModelQuery {
        ModelQuery::new(self.clone(), definition)
    }

    /// A new, unsaved entity of `M`.
    pub fn new_entity<M: Model>(&self) -> Entity {
        Entity::new(self.clone(), M::definition())
    }

    pub async fn all<M: Model>(&self) -> Result<Vec<Entity>> {
        self.query::<M>().get().await
    }

    /// Finds an entity by primary key.
    pub async fn find<M: Model>(&self, id: impl Into<Value>) -> Result<Option<Entity>> {
        let definition = M::definition();
        let primary_key = definition.primary_key().to_string();

        self.model_query(definition)
            .filter_eq(primary_key, id)
            .first()
            .await
    }

    /// Like [`Db::find`], failing with a not-found error naming the model and
    /// id.
    pub async fn find_or_fail<M: Model>(&self, id: impl Into<Value>) -> Result<Entity> {
        let id = id.into();

        match self.find::<M>(id.clone()).await? {
            Some(entity) => Ok(entity),
            None => Err(Error::model_not_found(M::definition().name(), id)),
        }
    }

    pub async fn find_by<M: Model>(
        &self,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Entity>> {
        self.query::<M>().filter_eq(column, value).first().await
    }

    /// Fills a new entity with `record` and saves it.
    pub async fn create<M: Model>(&self, record: Record) -> Result<Entity> {
        let mut entity = self.new_entity::<M>();
        entity.fill(record);
        entity.save().await?;
        Ok(entity)
    }

    /// Creates each record in turn. Records created before a failure stay
    /// created.
    pub async fn create_many<M: Model>(&self, records: Vec<Record>) -> Result<Vec<Entity>> {
        let mut entities = Vec::with_capacity(records.len());

        for record in records {
            entities.push(self.create::<M>(record).await?);
        }

        Ok(entities)
    }
}
