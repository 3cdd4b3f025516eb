use sheetorm_core::{async_trait, driver::PermissionGate, Error, Result};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

/// A permission gate that allows reads but requires a sign-in before the
/// first write, like a store that only grants read scope up front.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGate {
    granted: Arc<AtomicBool>,

    /// Writes refused so far
    refusals: Arc<AtomicUsize>,
}

impl ScriptedGate {
    pub const MODE: &'static str = "write";

    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the user completing the sign-in.
    pub fn grant(&self) {
        self.granted.store(true, Ordering::SeqCst);
    }

    pub fn refusals(&self) -> usize {
        self.refusals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionGate for ScriptedGate {
    async fn ensure_readable(&self, _table: &str) -> Result<()> {
        Ok(())
    }

    async fn ensure_writable(&self, _table: &str) -> Result<()> {
        if self.granted.load(Ordering::SeqCst) {
            return Ok(());
        }

        self.refusals.fetch_add(1, Ordering::SeqCst);
        Err(Error::authentication_required(Self::MODE, true))
    }
}
