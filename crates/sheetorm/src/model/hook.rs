use super::Entity;
use crate::Result;

use async_trait::async_trait;

/// Lifecycle points at which hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    BeforeCreate,
    AfterCreate,
    BeforeUpdate,
    AfterUpdate,
    BeforeSave,
    AfterSave,
    BeforeDelete,
    AfterDelete,
}

/// Code run around an entity's persistence.
///
/// An error aborts the operation and is returned to the caller. Steps that
/// already completed are not rolled back.
#[async_trait]
pub trait Hook: Send + Sync + 'static {
    async fn call(&self, entity: &mut Entity) -> Result<()>;
}

/// Adapts a synchronous closure.
pub(super) struct FnHook<F>(pub(super) F);

#[async_trait]
impl<F> Hook for FnHook<F>
where
    F: Fn(&mut Entity) -> Result<()> + Send + Sync + 'static,
{
    async fn call(&self, entity: &mut Entity) -> Result<()> {
        (self.0)(entity)
    }
}
