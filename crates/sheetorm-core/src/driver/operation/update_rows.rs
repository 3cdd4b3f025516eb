use super::*;
use crate::stmt::Record;

#[derive(Debug, Clone)]
pub struct UpdateRows {
    pub table: String,
    pub updates: Vec<RowUpdate>,
}

/// Full replacement of one stored row.
#[derive(Debug, Clone)]
pub struct RowUpdate {
    /// 1-based row index in the store
    pub row: usize,

    pub record: Record,
}

impl From<UpdateRows> for Operation {
    fn from(value: UpdateRows) -> Self {
        Self::UpdateRows(value)
    }
}
