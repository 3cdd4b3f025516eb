use super::{Definition, Entity};
use crate::{query::query_methods, relation, Db, Error, Page, Result};

use sheetorm_core::stmt::Query;
use std::{fmt, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trashed {
    Exclude,
    Include,
    Only,
}

/// Fluent query returning entities of one model.
///
/// Models with soft deletes only see rows without a deletion timestamp
/// unless [`with_trashed`](Self::with_trashed) or
/// [`only_trashed`](Self::only_trashed) is used.
#[derive(Clone)]
pub struct ModelQuery {
    db: Db,
    definition: Arc<Definition>,
    query: Query,

    /// Relations to load with the results
    preloads: Vec<String>,

    trashed: Trashed,
}

impl ModelQuery {
    pub(crate) fn new(db: Db, definition: Arc<Definition>) -> Self {
        let query = Query::new(definition.table());

        Self {
            db,
            definition,
            query,
            preloads: vec![],
            trashed: Trashed::Exclude,
        }
    }

    query_methods!();

    /// Applies the named scope of the model.
    pub fn scope(self, name: &str) -> Result<Self> {
        let Some(scope) = self.definition.scope(name).cloned() else {
            return Err(Error::invalid_operation(format!(
                "model `{}` has no scope `{name}`",
                self.definition.name()
            )));
        };

        Ok(scope(self))
    }

    /// Loads `relation` for every result, with one query per relation.
    pub fn preload(mut self, relation: impl Into<String>) -> Self {
        self.preloads.push(relation.into());
        self
    }

    pub fn with_trashed(mut self) -> Self {
        self.trashed = Trashed::Include;
        self
    }

    pub fn only_trashed(mut self) -> Self {
        self.trashed = Trashed::Only;
        self
    }

    pub fn definition(&self) -> &Arc<Definition> {
        &self.definition
    }

    pub async fn get(&self) -> Result<Vec<Entity>> {
        let mut entities = self.fetch_entities().await?;
        self.eager_load(&mut entities).await?;
        Ok(entities)
    }

    pub async fn first(&self) -> Result<Option<Entity>> {
        let mut query = self.constrained();
        query.limit = Some(1);

        let mut entities = self.hydrate(self.db.select(&query).await?);
        self.eager_load(&mut entities).await?;

        Ok(entities.into_iter().next())
    }

    pub async fn paginate(&self, page: usize, per_page: usize) -> Result<Page<Entity>> {
        let records = self.db.paginate(&self.constrained(), page, per_page).await?;
        let mut page = records.map(|record| {
            Entity::hydrate(self.db.clone(), self.definition.clone(), record)
        });

        self.eager_load(&mut page.items).await?;
        Ok(page)
    }

    /// Paginates with the configured page size.
    pub async fn paginate_default(&self, page: usize) -> Result<Page<Entity>> {
        let per_page = self.db.config().pagination.per_page;
        self.paginate(page, per_page).await
    }

    pub async fn count(&self) -> Result<usize> {
        self.db.count(&self.constrained()).await
    }

    /// Results serialized as a JSON array.
    pub async fn to_json(&self) -> Result<serde_json::Value> {
        let entities = self.get().await?;
        Ok(entities.iter().map(Entity::serialize).collect())
    }

    /// The first result serialized, `null` when there is none.
    pub async fn first_to_json(&self) -> Result<serde_json::Value> {
        Ok(self
            .first()
            .await?
            .map(|entity| entity.serialize())
            .unwrap_or(serde_json::Value::Null))
    }

    /// A page serialized as `{ "data": [...], "meta": {...} }`.
    pub async fn paginate_to_json(&self, page: usize, per_page: usize) -> Result<serde_json::Value> {
        let page = self.paginate(page, per_page).await?;
        Ok(serde_json::to_value(&page)?)
    }

    /// Results without eager loading.
    pub(crate) async fn fetch_entities(&self) -> Result<Vec<Entity>> {
        let records = self.db.select(&self.constrained()).await?;
        Ok(self.hydrate(records))
    }

    /// A copy of the query with the soft-delete constraint appended.
    fn constrained(&self) -> Query {
        let mut query = self.query.clone();

        if self.definition.soft_deletes() {
            let column = self.definition.deleted_at_column();
            match self.trashed {
                Trashed::Exclude => {
                    query.filter.filter_null(column);
                }
                Trashed::Only => {
                    query.filter.filter_not_null(column);
                }
                Trashed::Include => {}
            }
        }

        query
    }

    fn hydrate(&self, records: Vec<sheetorm_core::stmt::Record>) -> Vec<Entity> {
        records
            .into_iter()
            .map(|record| Entity::hydrate(self.db.clone(), self.definition.clone(), record))
            .collect()
    }

    async fn eager_load(&self, entities: &mut [Entity]) -> Result<()> {
        for name in &self.preloads {
            relation::load(&self.db, &self.definition, entities, name).await?;
        }

        Ok(())
    }
}

impl fmt::Debug for ModelQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelQuery")
            .field("model", &self.definition.name())
            .field("query", &self.query)
            .field("preloads", &self.preloads)
            .field("trashed", &self.trashed)
            .finish()
    }
}
