use super::{record, Record};

use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    pub fn cmp_records(&self, a: &Record, b: &Record) -> Ordering {
        let ord = record::get(a, &self.column).sort_cmp(record::get(b, &self.column));

        match self.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    }
}

impl Direction {
    /// Parses `"asc"` / `"desc"` (any case); anything else is ascending.
    pub fn parse(literal: &str) -> Direction {
        if literal.trim().eq_ignore_ascii_case("desc") {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }
}

impl From<&str> for Direction {
    fn from(src: &str) -> Self {
        Self::parse(src)
    }
}

/// Stable multi-key sort. Later keys break ties left by earlier ones and the
/// input order breaks the rest.
pub fn sort(records: &mut [Record], keys: &[OrderBy]) {
    if keys.is_empty() {
        return;
    }

    records.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.cmp_records(a, b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}
