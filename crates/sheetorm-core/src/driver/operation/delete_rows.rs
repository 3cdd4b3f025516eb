use super::*;

#[derive(Debug, Clone)]
pub struct DeleteRows {
    pub table: String,

    /// 1-based row indices in the store
    pub rows: Vec<usize>,
}

impl From<DeleteRows> for Operation {
    fn from(value: DeleteRows) -> Self {
        Self::DeleteRows(value)
    }
}
