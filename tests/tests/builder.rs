use sheetorm::{model::ColumnMeta, model::Definition, Model};
use sheetorm_driver_memory::MemoryDriver;
use std::sync::Arc;
use tests::{assert_err, fixtures};

struct TwoKeys;

impl Model for TwoKeys {
    fn definition() -> Arc<Definition> {
        Definition::builder("TwoKeys", "users")
            .primary_key("id")
            .column("email", ColumnMeta::primary())
            .build()
    }
}

#[tokio::test]
async fn model_with_two_primary_columns_is_rejected() {
    let err = assert_err!(
        fixtures::builder()
            .register::<TwoKeys>()
            .build(MemoryDriver::new())
            .await,
        is_invalid_schema
    );
    assert!(err.to_string().contains("TwoKeys"), "{err}");
}

#[tokio::test]
async fn duplicate_table_is_rejected() {
    assert_err!(
        fixtures::builder()
            .schema(fixtures::users())
            .build(MemoryDriver::new())
            .await,
        is_invalid_schema
    );
}
