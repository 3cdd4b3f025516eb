use super::{hook::FnHook, Entity, Hook, HookKind, ModelQuery};
use crate::{
    relation::{BelongsTo, HasMany, HasOne, ManyToMany, Relation, Target},
    Error, Result,
};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// A named query refinement, applied with [`ModelQuery::scope`].
pub type Scope = Arc<dyn Fn(ModelQuery) -> ModelQuery + Send + Sync>;

/// Model-level flags of a column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMeta {
    pub primary: bool,

    /// Stamped with the current time when the entity is created
    pub auto_create: bool,

    /// Stamped with the current time on every write
    pub auto_update: bool,
}

impl ColumnMeta {
    pub fn primary() -> Self {
        Self {
            primary: true,
            ..Self::default()
        }
    }

    pub fn auto_create() -> Self {
        Self {
            auto_create: true,
            ..Self::default()
        }
    }

    pub fn auto_update() -> Self {
        Self {
            auto_update: true,
            ..Self::default()
        }
    }
}

/// Everything the engine knows about a model: its table, columns, hooks,
/// scopes and relations.
///
/// Built once with [`Definition::builder`] and shared as `Arc<Definition>`.
pub struct Definition {
    name: String,
    table: String,
    columns: IndexMap<String, ColumnMeta>,
    primary_key: String,
    soft_deletes: bool,
    deleted_at: String,
    hidden: Vec<String>,
    hooks: Vec<(HookKind, Arc<dyn Hook>)>,
    scopes: IndexMap<String, Scope>,
    relations: IndexMap<String, Relation>,
}

pub struct DefinitionBuilder {
    definition: Definition,
}

impl Definition {
    pub fn builder(name: impl Into<String>, table: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder {
            definition: Definition {
                name: name.into(),
                table: table.into(),
                columns: IndexMap::new(),
                primary_key: "id".to_string(),
                soft_deletes: false,
                deleted_at: "deleted_at".to_string(),
                hidden: vec![],
                hooks: vec![],
                scopes: IndexMap::new(),
                relations: IndexMap::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The column registered as primary, `"id"` otherwise.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Checks that at most one column is flagged primary.
    pub fn verify(&self) -> Result<()> {
        let primary: Vec<&str> = self
            .columns
            .iter()
            .filter(|(_, meta)| meta.primary)
            .map(|(name, _)| name.as_str())
            .collect();

        if primary.len() > 1 {
            return Err(Error::invalid_schema(format!(
                "model `{}` has more than one primary column: {}",
                self.name,
                primary.join(", ")
            )));
        }

        Ok(())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnMeta)> {
        self.columns.iter().map(|(name, meta)| (name.as_str(), meta))
    }

    pub fn soft_deletes(&self) -> bool {
        self.soft_deletes
    }

    /// Column holding the deletion timestamp of soft-deleted entities.
    pub fn deleted_at_column(&self) -> &str {
        &self.deleted_at
    }

    pub fn is_hidden(&self, column: &str) -> bool {
        self.hidden.iter().any(|hidden| hidden == column)
    }

    pub fn scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.relations.iter().map(|(name, relation)| (name.as_str(), relation))
    }

    /// Runs the hooks registered for `kind`, in registration order. The first
    /// failure stops the run.
    pub async fn run_hooks(&self, kind: HookKind, entity: &mut Entity) -> Result<()> {
        for (_, hook) in self.hooks.iter().filter(|(k, _)| *k == kind) {
            tracing::debug!(model = %self.name, hook = ?kind, "running hook");
            hook.call(entity).await?;
        }

        Ok(())
    }
}

impl DefinitionBuilder {
    /// Registers a column. The first column flagged primary becomes the
    /// primary key; flagging a second one fails [`Definition::verify`].
    pub fn column(mut self, name: impl Into<String>, meta: ColumnMeta) -> Self {
        let name = name.into();
        if meta.primary && !self.definition.columns.values().any(|meta| meta.primary) {
            self.definition.primary_key = name.clone();
        }
        self.definition.columns.insert(name, meta);
        self
    }

    pub fn primary_key(self, name: impl Into<String>) -> Self {
        self.column(name, ColumnMeta::primary())
    }

    /// Registers `created_at` and `updated_at` timestamp columns.
    pub fn timestamps(self) -> Self {
        self.column("created_at", ColumnMeta::auto_create())
            .column("updated_at", ColumnMeta::auto_update())
    }

    /// Deleting marks entities with a timestamp instead of removing rows.
    pub fn soft_deletes(mut self) -> Self {
        self.definition.soft_deletes = true;
        self
    }

    pub fn deleted_at_column(mut self, column: impl Into<String>) -> Self {
        self.definition.deleted_at = column.into();
        self
    }

    /// Columns left out of [`Entity::serialize`].
    pub fn hidden<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.definition
            .hidden
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn hook(mut self, kind: HookKind, hook: impl Hook) -> Self {
        self.definition.hooks.push((kind, Arc::new(hook)));
        self
    }

    /// Registers a synchronous hook.
    pub fn on<F>(self, kind: HookKind, f: F) -> Self
    where
        F: Fn(&mut Entity) -> Result<()> + Send + Sync + 'static,
    {
        self.hook(kind, FnHook(f))
    }

    pub fn scope<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ModelQuery) -> ModelQuery + Send + Sync + 'static,
    {
        self.definition.scopes.insert(name.into(), Arc::new(f));
        self
    }

    pub fn relation(mut self, name: impl Into<String>, relation: impl Into<Relation>) -> Self {
        self.definition.relations.insert(name.into(), relation.into());
        self
    }

    /// Entities of `target` whose `foreign_key` holds this entity's key.
    pub fn has_many(self, name: impl Into<String>, target: Target, foreign_key: &str) -> Self {
        self.relation(name, HasMany::new(target, foreign_key))
    }

    /// Like [`has_many`](Self::has_many), keeping the first match only.
    pub fn has_one(self, name: impl Into<String>, target: Target, foreign_key: &str) -> Self {
        self.relation(name, HasOne::new(target, foreign_key))
    }

    /// The `target` entity referenced by this entity's `foreign_key`.
    pub fn belongs_to(self, name: impl Into<String>, target: Target, foreign_key: &str) -> Self {
        self.relation(name, BelongsTo::new(target, foreign_key))
    }

    pub fn many_to_many(self, name: impl Into<String>, relation: ManyToMany) -> Self {
        self.relation(name, relation)
    }

    pub fn build(self) -> Arc<Definition> {
        Arc::new(self.definition)
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("soft_deletes", &self.soft_deletes)
            .field("hooks", &self.hooks.len())
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .field("relations", &self.relations.keys().collect::<Vec<_>>())
            .finish()
    }
}
