use super::*;
use crate::stmt::Record;

#[derive(Debug, Clone)]
pub struct AppendRows {
    pub table: String,

    /// Rows to append, in order. Columns missing from a record are written
    /// as empty cells.
    pub rows: Vec<Record>,
}

impl From<AppendRows> for Operation {
    fn from(value: AppendRows) -> Self {
        Self::AppendRows(value)
    }
}
