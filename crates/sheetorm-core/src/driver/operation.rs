mod append_rows;
pub use append_rows::AppendRows;

mod delete_rows;
pub use delete_rows::DeleteRows;

mod fetch_table;
pub use fetch_table::FetchTable;

mod max_numeric_value;
pub use max_numeric_value::MaxNumericValue;

mod update_rows;
pub use update_rows::{RowUpdate, UpdateRows};

#[derive(Debug, Clone)]
pub enum Operation {
    /// Read every data row of a table
    FetchTable(FetchTable),

    /// Append rows after the last data row
    AppendRows(AppendRows),

    /// Overwrite rows in place, in one batch
    UpdateRows(UpdateRows),

    /// Remove rows, in one batch
    DeleteRows(DeleteRows),

    /// Largest numeric value held in a column
    MaxNumericValue(MaxNumericValue),
}

impl Operation {
    /// Name of the table the operation targets.
    pub fn table(&self) -> &str {
        match self {
            Self::FetchTable(op) => &op.table,
            Self::AppendRows(op) => &op.table,
            Self::UpdateRows(op) => &op.table,
            Self::DeleteRows(op) => &op.table,
            Self::MaxNumericValue(op) => &op.table,
        }
    }

    /// Short name used in logs and error context.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchTable(_) => "fetch_table",
            Self::AppendRows(_) => "append_rows",
            Self::UpdateRows(_) => "update_rows",
            Self::DeleteRows(_) => "delete_rows",
            Self::MaxNumericValue(_) => "max_numeric_value",
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Self::FetchTable(_) | Self::MaxNumericValue(_))
    }
}
