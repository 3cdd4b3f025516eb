use super::{order_by, Direction, Filter, OrderBy, Record};
use crate::Result;

use serde::Serialize;
use std::time::Duration;

/// Everything a read needs: the table, the predicate and the
/// transformations applied to the matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,

    /// Projected columns. `None` returns every column.
    pub select: Option<Vec<String>>,

    pub filter: Filter,

    pub order_by: Vec<OrderBy>,

    pub limit: Option<usize>,

    pub offset: Option<usize>,

    /// Opts this query into the result cache even when caching is disabled
    /// globally.
    pub cache: bool,

    /// Overrides the configured cache TTL for this query.
    pub cache_ttl: Option<Duration>,
}

#[derive(Serialize)]
struct Fingerprint<'a> {
    #[serde(rename = "where")]
    filter: &'a Filter,
    order_by: &'a [OrderBy],
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: None,
            filter: Filter::new(),
            order_by: vec![],
            limit: None,
            offset: None,
            cache: false,
            cache_ttl: None,
        }
    }

    pub fn order_by(&mut self, column: impl Into<String>, direction: impl Into<Direction>) {
        self.order_by.push(OrderBy {
            column: column.into(),
            direction: direction.into(),
        });
    }

    /// Prefix shared by every cache key of `table`.
    pub fn cache_prefix(table: &str) -> String {
        format!("{table}:")
    }

    /// Cache key of this query: the table plus the predicate and sort keys.
    /// Limit, offset and projection are not part of the key; they are
    /// re-applied to every read.
    pub fn fingerprint(&self) -> Result<String> {
        let shape = serde_json::to_string(&Fingerprint {
            filter: &self.filter,
            order_by: &self.order_by,
        })?;

        Ok(format!("{}{shape}", Self::cache_prefix(&self.table)))
    }

    /// Filters and sorts `rows`, ignoring limit, offset and projection.
    pub fn matching(&self, rows: Vec<Record>) -> Vec<Record> {
        let mut rows: Vec<_> = rows
            .into_iter()
            .filter(|row| self.filter.matches(row))
            .collect();
        order_by::sort(&mut rows, &self.order_by);
        rows
    }

    /// Applies offset, limit and projection to already matched rows.
    pub fn window(&self, rows: Vec<Record>) -> Vec<Record> {
        let rows = rows
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX));

        match &self.select {
            Some(columns) => rows
                .map(|row| super::record::project(&row, columns))
                .collect(),
            None => rows.collect(),
        }
    }
}
