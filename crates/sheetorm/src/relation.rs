mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::HasMany;

mod has_one;
pub use has_one::HasOne;

mod many_to_many;
pub use many_to_many::{ManyToMany, Pivot};

use crate::{model::Definition, Db, Entity, Error, Result};

use indexmap::IndexMap;
use sheetorm_core::stmt::{record, Record, Value};
use std::{collections::HashSet, sync::Arc};

/// Resolves the definition of a related model.
///
/// A function rather than a value so that models can refer to each other
/// before either definition is built.
pub type Target = fn() -> Arc<Definition>;

/// How two models are associated.
#[derive(Debug, Clone)]
pub enum Relation {
    HasMany(HasMany),
    HasOne(HasOne),
    BelongsTo(BelongsTo),
    ManyToMany(ManyToMany),
}

/// A loaded relation of an entity.
#[derive(Debug, Clone)]
pub enum Related {
    One(Option<Entity>),
    Many(Vec<Entity>),
}

impl Relation {
    /// Definition of the related model.
    pub fn target(&self) -> Arc<Definition> {
        match self {
            Self::HasMany(relation) => (relation.target)(),
            Self::HasOne(relation) => (relation.target)(),
            Self::BelongsTo(relation) => (relation.target)(),
            Self::ManyToMany(relation) => (relation.target)(),
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Self::HasMany(_) | Self::ManyToMany(_))
    }
}

impl Related {
    pub fn as_one(&self) -> Option<&Entity> {
        match self {
            Self::One(entity) => entity.as_ref(),
            Self::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> &[Entity] {
        match self {
            Self::One(_) => &[],
            Self::Many(entities) => entities,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::One(Some(entity)) => entity.serialize(),
            Self::One(None) => serde_json::Value::Null,
            Self::Many(entities) => entities.iter().map(Entity::serialize).collect(),
        }
    }
}

/// Loads relation `name` of `definition` into every entity, issuing one
/// query per table involved regardless of how many entities are passed.
pub(crate) async fn load(
    db: &Db,
    definition: &Definition,
    entities: &mut [Entity],
    name: &str,
) -> Result<()> {
    let Some(relation) = definition.relation(name) else {
        return Err(Error::invalid_operation(format!(
            "model `{}` has no relation `{name}`",
            definition.name()
        )));
    };

    tracing::debug!(
        model = definition.name(),
        relation = name,
        entities = entities.len(),
        "loading relation"
    );

    match relation {
        Relation::HasMany(relation) => relation.load(db, definition, entities, name).await,
        Relation::HasOne(relation) => relation.load(db, definition, entities, name).await,
        Relation::BelongsTo(relation) => relation.load(db, entities, name).await,
        Relation::ManyToMany(relation) => relation.load(db, definition, entities, name).await,
    }
}

/// Distinct truthy values of `column`, in first-seen order.
fn collect_keys<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
    let mut seen = HashSet::new();

    values
        .into_iter()
        .filter(|value| value.is_truthy() && seen.insert(value.to_key()))
        .cloned()
        .collect()
}

fn entity_keys(entities: &[Entity], column: &str) -> Vec<Value> {
    collect_keys(entities.iter().map(|entity| entity.get(column)))
}

fn record_keys(rows: &[Record], column: &str) -> Vec<Value> {
    collect_keys(rows.iter().map(|row| record::get(row, column)))
}

/// Entities of `target` whose `column` holds one of `keys`. No query is
/// issued when `keys` is empty.
async fn fetch_targets(
    db: &Db,
    target: Arc<Definition>,
    column: &str,
    keys: Vec<Value>,
) -> Result<Vec<Entity>> {
    if keys.is_empty() {
        return Ok(vec![]);
    }

    db.model_query(target)
        .filter_in(column, keys)
        .fetch_entities()
        .await
}

/// Groups entities by the key text of `column`, keeping fetch order.
fn group_by(entities: Vec<Entity>, column: &str) -> IndexMap<String, Vec<Entity>> {
    let mut groups: IndexMap<String, Vec<Entity>> = IndexMap::new();

    for entity in entities {
        groups
            .entry(entity.get(column).to_key())
            .or_default()
            .push(entity);
    }

    groups
}

impl From<HasMany> for Relation {
    fn from(value: HasMany) -> Self {
        Self::HasMany(value)
    }
}

impl From<HasOne> for Relation {
    fn from(value: HasOne) -> Self {
        Self::HasOne(value)
    }
}

impl From<BelongsTo> for Relation {
    fn from(value: BelongsTo) -> Self {
        Self::BelongsTo(value)
    }
}

impl From<ManyToMany> for Relation {
    fn from(value: ManyToMany) -> Self {
        Self::ManyToMany(value)
    }
}
