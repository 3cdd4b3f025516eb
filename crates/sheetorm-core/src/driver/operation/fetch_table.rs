use super::*;

#[derive(Debug, Clone)]
pub struct FetchTable {
    pub table: String,
}

impl From<FetchTable> for Operation {
    fn from(value: FetchTable) -> Self {
        Self::FetchTable(value)
    }
}
