use super::{cache::Cache, Db, Shared};
use crate::{
    model::{Definition, Persistence, TablePersistence},
    Config, Error, Model, Result,
};

use sheetorm_core::{
    driver::{AllowAll, PermissionGate},
    Driver, Schema, Schemas,
};
use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    schemas: Vec<Schema>,

    /// Registered model definitions, checked against the schemas on build
    models: Vec<Arc<Definition>>,

    config: Config,

    gate: Option<Arc<dyn PermissionGate>>,

    persistence: Option<Arc<dyn Persistence>>,
}

impl Builder {
    /// Adds a table schema.
    pub fn schema(&mut self, schema: Schema) -> &mut Self {
        self.schemas.push(schema);
        self
    }

    /// Registers a model. Building fails if its table has no schema.
    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.models.push(M::definition());
        self
    }

    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Sets the gate consulted before every read and write. Defaults to
    /// [`AllowAll`].
    pub fn permission_gate(&mut self, gate: impl PermissionGate) -> &mut Self {
        self.gate = Some(Arc::new(gate));
        self
    }

    /// Replaces the default [`TablePersistence`] used by entities.
    pub fn persistence(&mut self, persistence: impl Persistence) -> &mut Self {
        self.persistence = Some(Arc::new(persistence));
        self
    }

    pub async fn build(&mut self, mut driver: impl Driver) -> Result<Db> {
        let mut schemas = Schemas::new();

        for schema in &self.schemas {
            let table = schema.table.clone();
            if schemas.insert(table.clone(), Arc::new(schema.clone())).is_some() {
                return Err(Error::invalid_schema(format!(
                    "table `{table}` is registered twice"
                )));
            }
        }

        for definition in &self.models {
            definition.verify()?;

            if !schemas.contains_key(definition.table()) {
                return Err(Error::invalid_schema(format!(
                    "model `{}` uses table `{}`, which has no schema",
                    definition.name(),
                    definition.table()
                )));
            }
        }

        driver.register_schema(&schemas).await?;

        tracing::debug!(tables = schemas.len(), "database ready");

        Ok(Db {
            shared: Arc::new(Shared {
                driver: Arc::new(driver),
                schemas,
                config: self.config.clone(),
                gate: self.gate.clone().unwrap_or_else(|| Arc::new(AllowAll) as Arc<dyn PermissionGate>),
                persistence: self
                    .persistence
                    .clone()
                    .unwrap_or_else(|| Arc::new(TablePersistence) as Arc<dyn Persistence>),
                cache: Cache::default(),
            }),
        })
    }
}
