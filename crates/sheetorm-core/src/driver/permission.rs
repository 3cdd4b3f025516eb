use crate::{async_trait, Result};

use std::fmt::Debug;

/// Decides whether the current caller may read or write a table.
///
/// Implementations return `Error::permission_denied` for hard failures and
/// `Error::authentication_required` when an interactive escalation could
/// grant access. The latter reaches the caller unchanged, so the same
/// operation can be retried once access is granted.
#[async_trait]
pub trait PermissionGate: Debug + Send + Sync + 'static {
    async fn ensure_readable(&self, table: &str) -> Result<()>;

    async fn ensure_writable(&self, table: &str) -> Result<()>;
}

/// Gate that allows everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

#[async_trait]
impl PermissionGate for AllowAll {
    async fn ensure_readable(&self, _table: &str) -> Result<()> {
        Ok(())
    }

    async fn ensure_writable(&self, _table: &str) -> Result<()> {
        Ok(())
    }
}
