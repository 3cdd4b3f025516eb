use super::Error;

/// Context attached to driver failures during select/insert/update/delete.
#[derive(Debug)]
pub(super) struct QueryFailed {
    table: Box<str>,
    operation: &'static str,
}

impl std::error::Error for QueryFailed {}

impl core::fmt::Display for QueryFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "query failed: table={} operation={}",
            self.table, self.operation
        )
    }
}

impl Error {
    /// Creates a query-layer error naming the table and operation.
    ///
    /// Usually attached with [`Error::context`] around the driver error.
    pub fn query_failed(table: impl Into<String>, operation: &'static str) -> Error {
        Error::from(super::ErrorKind::QueryFailed(QueryFailed {
            table: table.into().into(),
            operation,
        }))
    }

    /// Returns `true` if this error is, or wraps, a query-layer error.
    pub fn is_query_failed(&self) -> bool {
        self.find_kind(|kind| matches!(kind, super::ErrorKind::QueryFailed(_)).then_some(()))
            .is_some()
    }
}
