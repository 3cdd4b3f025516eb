use crate::{Db, Page, Result};

use sheetorm_core::stmt::{Query, Record};

/// Generates the fluent methods shared by every query builder. The target
/// type must have a `query: Query` field.
macro_rules! query_methods {
    () => {
        /// Restricts the returned columns.
        pub fn select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
            self.query.select = Some(columns.into_iter().map(Into::into).collect());
            self
        }

        pub fn filter(
            mut self,
            column: impl Into<String>,
            operator: impl Into<sheetorm_core::stmt::Operator>,
            value: impl Into<sheetorm_core::stmt::Value>,
        ) -> Self {
            self.query.filter.filter(column, operator, value);
            self
        }

        pub fn or_filter(
            mut self,
            column: impl Into<String>,
            operator: impl Into<sheetorm_core::stmt::Operator>,
            value: impl Into<sheetorm_core::stmt::Value>,
        ) -> Self {
            self.query.filter.or_filter(column, operator, value);
            self
        }

        /// Equality, or a null test for the literals `"NULL"` and `"NOT NULL"`.
        pub fn filter_by(
            mut self,
            column: impl Into<String>,
            value: impl Into<sheetorm_core::stmt::Value>,
        ) -> Self {
            self.query.filter.filter_by(column, value);
            self
        }

        pub fn filter_eq(
            mut self,
            column: impl Into<String>,
            value: impl Into<sheetorm_core::stmt::Value>,
        ) -> Self {
            self.query.filter.filter_eq(column, value);
            self
        }

        pub fn filter_in<T: Into<sheetorm_core::stmt::Value>>(
            mut self,
            column: impl Into<String>,
            values: impl IntoIterator<Item = T>,
        ) -> Self {
            self.query.filter.filter_in(column, values);
            self
        }

        pub fn filter_not_in<T: Into<sheetorm_core::stmt::Value>>(
            mut self,
            column: impl Into<String>,
            values: impl IntoIterator<Item = T>,
        ) -> Self {
            self.query.filter.filter_not_in(column, values);
            self
        }

        pub fn filter_null(mut self, column: impl Into<String>) -> Self {
            self.query.filter.filter_null(column);
            self
        }

        pub fn filter_not_null(mut self, column: impl Into<String>) -> Self {
            self.query.filter.filter_not_null(column);
            self
        }

        pub fn filter_between(
            mut self,
            column: impl Into<String>,
            low: impl Into<sheetorm_core::stmt::Value>,
            high: impl Into<sheetorm_core::stmt::Value>,
        ) -> Self {
            self.query.filter.filter_between(column, low, high);
            self
        }

        pub fn filter_not_between(
            mut self,
            column: impl Into<String>,
            low: impl Into<sheetorm_core::stmt::Value>,
            high: impl Into<sheetorm_core::stmt::Value>,
        ) -> Self {
            self.query.filter.filter_not_between(column, low, high);
            self
        }

        pub fn order_by(
            mut self,
            column: impl Into<String>,
            direction: impl Into<sheetorm_core::stmt::Direction>,
        ) -> Self {
            self.query.order_by(column, direction);
            self
        }

        pub fn limit(mut self, limit: usize) -> Self {
            self.query.limit = Some(limit);
            self
        }

        pub fn offset(mut self, offset: usize) -> Self {
            self.query.offset = Some(offset);
            self
        }

        /// Serves this query from the result cache when a fresh snapshot
        /// exists.
        pub fn cache(mut self) -> Self {
            self.query.cache = true;
            self
        }

        /// Caches this query with its own time-to-live.
        pub fn cache_ttl(mut self, ttl: std::time::Duration) -> Self {
            self.query.cache = true;
            self.query.cache_ttl = Some(ttl);
            self
        }

        pub fn query(&self) -> &sheetorm_core::stmt::Query {
            &self.query
        }
    };
}

pub(crate) use query_methods;

/// Fluent query over a raw table.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    db: Db,
    query: Query,
}

impl QueryBuilder {
    pub(crate) fn new(db: Db, query: Query) -> Self {
        Self { db, query }
    }

    query_methods!();

    pub fn into_query(self) -> Query {
        self.query
    }

    pub async fn get(&self) -> Result<Vec<Record>> {
        self.db.select(&self.query).await
    }

    pub async fn first(&self) -> Result<Option<Record>> {
        let mut query = self.query.clone();
        query.limit = Some(1);
        Ok(self.db.select(&query).await?.into_iter().next())
    }

    pub async fn paginate(&self, page: usize, per_page: usize) -> Result<Page<Record>> {
        self.db.paginate(&self.query, page, per_page).await
    }

    pub async fn count(&self) -> Result<usize> {
        self.db.count(&self.query).await
    }

    /// Merges `patch` into every matching row.
    pub async fn update(&self, patch: Record) -> Result<u64> {
        self.db.update(&self.query, patch).await
    }

    pub async fn delete(&self) -> Result<u64> {
        self.db.delete(&self.query).await
    }

    pub async fn insert(&self, record: Record) -> Result<Record> {
        self.db.insert(&self.query.table, record).await
    }

    pub async fn insert_many(&self, records: Vec<Record>) -> Result<Vec<Record>> {
        self.db.insert_many(&self.query.table, records).await
    }
}
