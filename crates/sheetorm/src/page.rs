use serde::Serialize;
use std::ops::Deref;

/// A page of results from a paginated query.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items in this page
    #[serde(rename = "data")]
    pub items: Vec<T>,

    pub meta: PageMeta,
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// Number of rows matching the query
    pub total: usize,

    pub per_page: usize,

    /// 1-based page number
    pub current_page: usize,

    /// `ceil(total / per_page)`; `0` when nothing matched
    pub last_page: usize,

    /// 1-based position of the first row of the page. Past the end of the
    /// result set this is larger than `total`.
    pub from: usize,

    /// 1-based position of the last row of the page
    pub to: usize,
}

impl PageMeta {
    pub(crate) fn new(total: usize, page: usize, per_page: usize) -> Self {
        let start = page.saturating_sub(1).saturating_mul(per_page);

        Self {
            total,
            per_page,
            current_page: page,
            last_page: total.div_ceil(per_page),
            from: start.saturating_add(1),
            to: total.min(start.saturating_add(per_page)),
        }
    }

    /// Range of the page within the full result set.
    pub(crate) fn range(&self) -> std::ops::Range<usize> {
        let start = (self.from - 1).min(self.total);
        start..self.to.max(start)
    }
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self { items, meta }
    }

    /// Returns true if there is a next page available
    pub fn has_next(&self) -> bool {
        self.meta.current_page < self.meta.last_page
    }

    /// Returns true if there is a previous page available
    pub fn has_prev(&self) -> bool {
        self.meta.current_page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

// Allow using pages like a regular slice for ergonomics.
impl<T> Deref for Page<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}
