mod column;
pub use column::{Column, ColumnType};

pub mod coerce;

mod rule;
pub use rule::{Rule, RuleKind};

use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Schemas of every registered table, keyed by table name.
pub type Schemas = IndexMap<String, Arc<Schema>>;

/// Ordered column definitions of one table.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Name of the table (sheet) the schema describes
    pub table: String,

    columns: IndexMap<String, Column>,
}

impl Schema {
    /// Builds a schema. Fails if more than one column is declared primary.
    pub fn new<K, I>(table: impl Into<String>, columns: I) -> Result<Schema>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Column)>,
    {
        let table = table.into();
        let columns: IndexMap<String, Column> = columns
            .into_iter()
            .map(|(name, column)| (name.into(), column))
            .collect();

        let primary: Vec<_> = columns
            .iter()
            .filter(|(_, column)| column.primary)
            .map(|(name, _)| name.as_str())
            .collect();

        if primary.len() > 1 {
            return Err(Error::invalid_schema(format!(
                "table `{table}` declares more than one primary key: {}",
                primary.join(", ")
            )));
        }

        Ok(Schema { table, columns })
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = (&str, &Column)> {
        self.columns
            .iter()
            .map(|(name, column)| (name.as_str(), column))
    }

    pub fn column_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// The primary column, if one is declared.
    pub fn primary_key(&self) -> Option<(&str, &Column)> {
        self.columns().find(|(_, column)| column.primary)
    }

    /// The primary column if it is auto-incremented.
    pub fn auto_increment_key(&self) -> Option<&str> {
        self.primary_key()
            .filter(|(_, column)| column.auto_increment)
            .map(|(name, _)| name)
    }

    pub fn has_unique_rule(&self) -> bool {
        self.columns.values().any(Column::has_unique_rule)
    }
}
