mod builder;
pub use builder::Builder;

mod cache;
use cache::Cache;

use crate::{model::Persistence, Config, Error, Page, PageMeta, QueryBuilder, Result};

use sheetorm_core::{
    driver::{
        operation::{AppendRows, DeleteRows, FetchTable, MaxNumericValue, RowUpdate, UpdateRows},
        Operation, PermissionGate,
    },
    schema::Schemas,
    stmt::{Query, Record},
    Driver, Schema,
};
use std::sync::Arc;

/// Shared state between all `Db` clones.
pub(crate) struct Shared {
    driver: Arc<dyn Driver>,
    schemas: Schemas,
    config: Config,
    gate: Arc<dyn PermissionGate>,
    persistence: Arc<dyn Persistence>,
    cache: Cache,
}

/// A handle to a sheet-backed database.
///
/// Cloning is cheap and every clone shares the same result cache, so a
/// mutation through one handle is visible to reads through any other.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

#[derive(Clone, Copy)]
enum Access {
    Read,
    Write,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Starts a raw query against `table`.
    pub fn table(&self, table: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(self.clone(), Query::new(table))
    }

    /// Returns the rows matching `query`, after ordering, offset, limit and
    /// projection.
    ///
    /// The full table snapshot comes from the cache when the query opts in
    /// (or caching is enabled globally) and a fresh entry exists; otherwise it
    /// is fetched from the driver.
    pub async fn select(&self, query: &Query) -> Result<Vec<Record>> {
        self.log_query("select", query);
        let rows = self.matching(query).await?;
        Ok(query.window(rows))
    }

    /// Returns one page of the rows matching `query`. Limit and offset are
    /// ignored.
    pub async fn paginate(
        &self,
        query: &Query,
        page: usize,
        per_page: usize,
    ) -> Result<Page<Record>> {
        if page == 0 {
            return Err(Error::invalid_argument("page numbers start at 1"));
        }

        let max_per_page = self.shared.config.pagination.max_per_page;
        if per_page == 0 || per_page > max_per_page {
            return Err(Error::invalid_argument(format!(
                "per_page must be between 1 and {max_per_page}, got {per_page}"
            )));
        }

        let end = (page - 1)
            .checked_mul(per_page)
            .and_then(|start| start.checked_add(per_page));
        if end.is_none() {
            return Err(Error::invalid_argument(format!(
                "page {page} is out of range for {per_page} rows per page"
            )));
        }

        self.log_query("paginate", query);

        let mut unbounded = query.clone();
        unbounded.limit = None;
        unbounded.offset = None;

        let rows = self.matching(&unbounded).await?;
        let meta = PageMeta::new(rows.len(), page, per_page);

        let items = rows
            .into_iter()
            .skip(meta.range().start)
            .take(meta.range().len())
            .collect();

        Ok(Page::new(unbounded.window(items), meta))
    }

    /// Number of rows `select` would return.
    ///
    /// The store has no server-side counting, so this reads and filters the
    /// whole table.
    pub async fn count(&self, query: &Query) -> Result<usize> {
        Ok(self.select(query).await?.len())
    }

    /// Appends one record and returns it as written, including an allocated
    /// primary key.
    pub async fn insert(&self, table: &str, record: Record) -> Result<Record> {
        let mut records = self.insert_many(table, vec![record]).await?;
        records
            .pop()
            .ok_or_else(|| Error::query_failed(table, "insert"))
    }

    /// Appends records in one batch.
    ///
    /// When the table's primary key is auto-incremented, the records get
    /// `max + 1`, `max + 2`, ... in input order, where `max` is the largest
    /// key currently stored.
    pub async fn insert_many(&self, table: &str, mut records: Vec<Record>) -> Result<Vec<Record>> {
        self.ensure(Access::Write, table, "insert").await?;

        if let Some(key) = self.schema(table).and_then(|schema| schema.auto_increment_key()) {
            let max = self
                .exec(
                    "insert",
                    MaxNumericValue {
                        table: table.to_string(),
                        column: key.to_string(),
                    },
                )
                .await?
                .into_number()?;

            tracing::debug!(table, column = key, max, count = records.len(), "allocating ids");

            for (i, record) in records.iter_mut().enumerate() {
                record.insert(key.to_string(), (max + 1.0 + i as f64).into());
            }
        }

        let res = self
            .exec(
                "insert",
                AppendRows {
                    table: table.to_string(),
                    rows: records.clone(),
                },
            )
            .await;

        // A failed append may still have written part of the batch
        self.shared.cache.invalidate(table);
        res?;

        Ok(records)
    }

    /// Merges `patch` into every row matching the query's filter and returns
    /// the number of rows changed.
    ///
    /// Row positions come from a fresh fetch made by this call. A concurrent
    /// mutation of the same table can shift rows between that fetch and the
    /// write; no lock spans the two.
    pub async fn update(&self, query: &Query, patch: Record) -> Result<u64> {
        self.log_query("update", query);
        self.ensure(Access::Write, &query.table, "update").await?;

        let rows = self.fetch(&query.table, "update").await?;

        let updates: Vec<_> = rows
            .into_iter()
            .enumerate()
            .filter(|(_, row)| query.filter.matches(row))
            .map(|(index, mut row)| {
                row.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
                RowUpdate {
                    row: index + 2,
                    record: row,
                }
            })
            .collect();

        let affected = updates.len() as u64;

        if !updates.is_empty() {
            let res = self
                .exec(
                    "update",
                    UpdateRows {
                        table: query.table.clone(),
                        updates,
                    },
                )
                .await;

            self.shared.cache.invalidate(&query.table);
            res?;
        }

        Ok(affected)
    }

    /// Deletes every row matching the query's filter and returns how many
    /// were removed.
    ///
    /// Like [`Db::update`], row positions are computed against this call's
    /// own fetch.
    pub async fn delete(&self, query: &Query) -> Result<u64> {
        self.log_query("delete", query);
        self.ensure(Access::Write, &query.table, "delete").await?;

        let rows: Vec<usize> = self
            .fetch(&query.table, "delete")
            .await?
            .iter()
            .enumerate()
            .filter(|(_, row)| query.filter.matches(row))
            .map(|(index, _)| index + 2)
            .collect();

        let affected = rows.len() as u64;

        if !rows.is_empty() {
            let res = self
                .exec(
                    "delete",
                    DeleteRows {
                        table: query.table.clone(),
                        rows,
                    },
                )
                .await;

            self.shared.cache.invalidate(&query.table);
            res?;
        }

        Ok(affected)
    }

    pub fn clear_cache(&self) {
        self.shared.cache.clear();
    }

    pub fn clear_table_cache(&self, table: &str) {
        self.shared.cache.invalidate(table);
    }

    /// Keys of the live cache entries, sorted.
    pub fn cache_keys(&self) -> Vec<String> {
        self.shared.cache.keys()
    }

    pub fn schema(&self, table: &str) -> Option<&Arc<Schema>> {
        self.shared.schemas.get(table)
    }

    pub fn schemas(&self) -> &Schemas {
        &self.shared.schemas
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    pub(crate) fn persistence(&self) -> Arc<dyn Persistence> {
        self.shared.persistence.clone()
    }

    /// Filtered and sorted rows, before the window is applied.
    async fn matching(&self, query: &Query) -> Result<Vec<Record>> {
        let rows = self.snapshot(query).await?;
        let total = rows.len();

        let rows = query.matching(rows);
        tracing::trace!(table = %query.table, total, matched = rows.len(), "filtered rows");

        Ok(rows)
    }

    async fn snapshot(&self, query: &Query) -> Result<Vec<Record>> {
        let use_cache = query.cache || self.shared.config.cache.enabled;

        if !use_cache {
            self.ensure(Access::Read, &query.table, "select").await?;
            return self.fetch(&query.table, "select").await;
        }

        let key = query.fingerprint()?;
        let ttl = query
            .cache_ttl
            .unwrap_or_else(|| self.shared.config.cache.ttl());

        if let Some(rows) = self.shared.cache.get(&key, ttl) {
            tracing::debug!(%key, "cache hit");
            return Ok(rows.as_ref().clone());
        }

        tracing::debug!(%key, "cache miss");

        let seen = self.shared.cache.generation(&query.table);

        self.ensure(Access::Read, &query.table, "select").await?;
        let rows = self.fetch(&query.table, "select").await?;
        self.shared
            .cache
            .insert(&query.table, key, seen, rows.clone());

        Ok(rows)
    }

    async fn fetch(&self, table: &str, operation: &'static str) -> Result<Vec<Record>> {
        self.exec(
            operation,
            FetchTable {
                table: table.to_string(),
            },
        )
        .await?
        .into_records()
    }

    async fn exec(
        &self,
        operation: &'static str,
        op: impl Into<Operation>,
    ) -> Result<sheetorm_core::driver::Rows> {
        let op = op.into();
        let table = op.table().to_string();

        tracing::debug!(table = %table, op = op.name(), "driver exec");

        self.shared
            .driver
            .exec(op)
            .await
            .map(|response| response.rows)
            .map_err(|err| wrap(err, &table, operation))
    }

    async fn ensure(&self, access: Access, table: &str, operation: &'static str) -> Result<()> {
        let gate = &self.shared.gate;

        let res = match access {
            Access::Read => gate.ensure_readable(table).await,
            Access::Write => gate.ensure_writable(table).await,
        };

        res.map_err(|err| wrap(err, table, operation))
    }

    fn log_query(&self, operation: &'static str, query: &Query) {
        if self.shared.config.debug {
            tracing::info!(
                operation,
                table = %query.table,
                filter = ?query.filter.clauses(),
                order_by = ?query.order_by,
                limit = ?query.limit,
                offset = ?query.offset,
                "executing query"
            );
        }
    }
}

/// Adds table and operation context to a failure. Authentication-required
/// errors are returned untouched so callers can resolve them and retry.
fn wrap(err: Error, table: &str, operation: &'static str) -> Error {
    if err.is_authentication_required() {
        err
    } else {
        err.context(Error::query_failed(table, operation))
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("driver", &self.shared.driver)
            .field("tables", &self.shared.schemas.keys().collect::<Vec<_>>())
            .field("config", &self.shared.config)
            .finish()
    }
}
