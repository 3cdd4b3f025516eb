use crate::{fixtures, ExecLog, LoggingDriver};
use sheetorm::{db::Builder, Db};
use sheetorm_driver_memory::MemoryDriver;
use tracing_subscriber::EnvFilter;

/// A database over the memory driver, with every driver operation logged.
pub struct DbTest {
    pub db: Db,

    /// Shares its sheets with the driver inside `db`
    pub driver: MemoryDriver,

    log: ExecLog,
}

impl DbTest {
    pub fn log(&self) -> &ExecLog {
        &self.log
    }
}

/// Sets up the fixture tables and models.
pub async fn setup() -> DbTest {
    setup_with(fixtures::builder()).await
}

pub async fn setup_with(mut builder: Builder) -> DbTest {
    init_tracing();

    let driver = MemoryDriver::new();
    let logging = LoggingDriver::new(driver.clone());
    let log = logging.log();

    let db = builder
        .build(logging)
        .await
        .expect("failed to build the test database");

    DbTest { db, driver, log }
}

/// Honors `RUST_LOG`. Only the first call installs the subscriber.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
