use sheetorm_core::{
    async_trait,
    driver::{Driver, Operation, Response},
    err, Result, Schemas,
};

/// Wraps a driver whose appends reach storage but report an error, as when
/// the connection drops after the store has applied the write.
#[derive(Debug)]
pub struct FailingAppend {
    inner: Box<dyn Driver>,
}

impl FailingAppend {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
        }
    }
}

#[async_trait]
impl Driver for FailingAppend {
    async fn register_schema(&mut self, schemas: &Schemas) -> Result<()> {
        self.inner.register_schema(schemas).await
    }

    async fn exec(&self, operation: Operation) -> Result<Response> {
        let append = matches!(operation, Operation::AppendRows(_));
        let res = self.inner.exec(operation).await?;

        if append {
            return Err(err!("connection reset after append"));
        }

        Ok(res)
    }
}
