use sheetorm_core::stmt::{Query, Record};

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

/// Full-table snapshots keyed by query fingerprint.
///
/// The lock is only held for map operations, never across an `.await`.
#[derive(Debug, Default)]
pub(super) struct Cache {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,

    /// Bumped for a table each time it is invalidated
    generations: HashMap<String, u64>,

    /// Bumped by `clear`
    epoch: u64,
}

#[derive(Debug)]
struct Entry {
    rows: Arc<Vec<Record>>,
    taken: Instant,
}

/// Invalidation state of one table, captured before a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Generation {
    epoch: u64,
    table: u64,
}

impl Inner {
    fn generation(&self, table: &str) -> Generation {
        Generation {
            epoch: self.epoch,
            table: self.generations.get(table).copied().unwrap_or(0),
        }
    }
}

impl Cache {
    /// Returns the snapshot stored under `key` if it is younger than `ttl`.
    /// A stale entry is removed.
    pub(super) fn get(&self, key: &str, ttl: Duration) -> Option<Arc<Vec<Record>>> {
        let mut inner = self.lock();

        let entry = inner.entries.get(key)?;
        if entry.taken.elapsed() < ttl {
            return Some(entry.rows.clone());
        }

        tracing::debug!(%key, "cache entry expired");
        inner.entries.remove(key);
        None
    }

    pub(super) fn generation(&self, table: &str) -> Generation {
        self.lock().generation(table)
    }

    /// Stores a snapshot of `table` fetched after `seen` was captured. The
    /// snapshot is dropped if the table was invalidated in between.
    pub(super) fn insert(&self, table: &str, key: String, seen: Generation, rows: Vec<Record>) {
        let mut inner = self.lock();

        if inner.generation(table) != seen {
            tracing::debug!(%key, "table invalidated during fetch; not caching");
            return;
        }

        tracing::debug!(%key, rows = rows.len(), "cache store");

        inner.entries.insert(
            key,
            Entry {
                rows: Arc::new(rows),
                taken: Instant::now(),
            },
        );
    }

    /// Removes every entry of `table`.
    pub(super) fn invalidate(&self, table: &str) {
        let prefix = Query::cache_prefix(table);

        let mut inner = self.lock();
        *inner.generations.entry(table.to_string()).or_default() += 1;

        let before = inner.entries.len();
        inner.entries.retain(|key, _| !key.starts_with(&prefix));

        tracing::debug!(
            table,
            removed = before - inner.entries.len(),
            "cache invalidated"
        );
    }

    pub(super) fn clear(&self) {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.entries.clear();
    }

    pub(super) fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.lock().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
