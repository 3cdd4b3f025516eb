use crate::logging_driver::DriverOp;
use sheetorm_core::driver::Operation;
use std::sync::{Arc, Mutex, MutexGuard};

/// Operations executed through a [`LoggingDriver`](crate::LoggingDriver).
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops().is_empty()
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops()
            .iter()
            .filter(|op| predicate(&op.operation))
            .count()
    }

    /// Number of full-table reads of `table`
    pub fn fetches(&self, table: &str) -> usize {
        self.count(|op| matches!(op, Operation::FetchTable(_)) && op.table() == table)
    }

    /// Number of reads of any table
    pub fn total_fetches(&self) -> usize {
        self.count(Operation::is_read)
    }

    pub fn has_append(&self, table: &str) -> bool {
        self.count(|op| matches!(op, Operation::AppendRows(_)) && op.table() == table) > 0
    }

    /// Names of the logged operations, in order
    pub fn names(&self) -> Vec<&'static str> {
        self.ops().iter().map(|op| op.operation.name()).collect()
    }

    pub fn clear(&self) {
        self.ops().clear();
    }

    fn ops(&self) -> MutexGuard<'_, Vec<DriverOp>> {
        self.ops.lock().expect("ops log lock poisoned")
    }
}
