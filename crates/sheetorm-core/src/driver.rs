mod permission;
pub use permission::{AllowAll, PermissionGate};

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::Schemas};

use std::fmt::Debug;

/// Storage adapter for a row-addressed, string-typed table store.
///
/// Row indices are 1-based and row 1 holds the headers, so the first data
/// row is row 2.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Register the table schemas with the driver.
    async fn register_schema(&mut self, schemas: &Schemas) -> crate::Result<()>;

    /// Execute a storage operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;
}
