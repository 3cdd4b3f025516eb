use sheetorm::{
    async_trait, err, model::Definition, record, Column, Db, Entity, Hook, HookKind, Result,
    Schema, Value,
};
use std::sync::{Arc, Mutex};
use tests::{assert_eq, assert_err, assert_ok, setup_with};

type Calls = Arc<Mutex<Vec<String>>>;

fn notes() -> Schema {
    Schema::new(
        "notes",
        [
            ("id", Column::id()),
            ("body", Column::string().required()),
            ("slug", Column::string().nullable()),
            ("deleted_at", Column::date_time().nullable()),
        ],
    )
    .unwrap()
}

async fn db() -> tests::DbTest {
    let mut builder = Db::builder();
    builder.schema(notes());
    setup_with(builder).await
}

/// Records every lifecycle point it is registered for.
fn recording(calls: &Calls, soft_deletes: bool) -> Arc<Definition> {
    let mut builder = Definition::builder("Note", "notes");
    if soft_deletes {
        builder = builder.soft_deletes();
    }

    for kind in [
        HookKind::BeforeCreate,
        HookKind::AfterCreate,
        HookKind::BeforeUpdate,
        HookKind::AfterUpdate,
        HookKind::BeforeSave,
        HookKind::AfterSave,
        HookKind::BeforeDelete,
        HookKind::AfterDelete,
    ] {
        let calls = calls.clone();
        builder = builder.on(kind, move |_| {
            calls.lock().unwrap().push(format!("{kind:?}"));
            Ok(())
        });
    }

    builder.build()
}

fn take(calls: &Calls) -> Vec<String> {
    std::mem::take(&mut *calls.lock().unwrap())
}

#[tokio::test]
async fn save_and_delete_order() {
    let test = db().await;
    let calls = Calls::default();
    let definition = recording(&calls, false);

    let mut note = Entity::new(test.db.clone(), definition);
    note.set("body", "hello");

    assert_ok!(note.save().await);
    assert_eq!(
        take(&calls),
        ["BeforeCreate", "BeforeSave", "AfterCreate", "AfterSave"]
    );

    note.set("body", "again");
    assert_ok!(note.save().await);
    assert_eq!(
        take(&calls),
        ["BeforeUpdate", "BeforeSave", "AfterUpdate", "AfterSave"]
    );

    assert_ok!(note.delete().await);
    assert_eq!(take(&calls), ["BeforeDelete", "AfterDelete"]);
}

#[tokio::test]
async fn soft_delete_runs_update_hooks_inside_delete() {
    let test = db().await;
    let calls = Calls::default();
    let definition = recording(&calls, true);

    let mut note = Entity::new(test.db.clone(), definition);
    note.set("body", "hello");
    assert_ok!(note.save().await);
    take(&calls);

    assert_ok!(note.delete().await);
    assert_eq!(
        take(&calls),
        [
            "BeforeDelete",
            "BeforeUpdate",
            "BeforeSave",
            "AfterUpdate",
            "AfterSave",
            "AfterDelete"
        ]
    );
}

#[tokio::test]
async fn failing_hook_aborts_without_rollback() {
    let test = db().await;

    let definition = Definition::builder("Note", "notes")
        .on(HookKind::AfterCreate, |_| Err(err!("after create failed")))
        .build();

    let mut note = Entity::new(test.db.clone(), definition);
    note.set("body", "kept");

    let err = assert_err!(note.save().await);
    assert_eq!(err.to_string(), "after create failed");

    // The row was written before the hook failed.
    assert_eq!(assert_ok!(test.db.table("notes").count().await), 1);
    assert!(note.is_new());
}

#[tokio::test]
async fn failing_before_hook_skips_the_write() {
    let test = db().await;

    let definition = Definition::builder("Note", "notes")
        .on(HookKind::BeforeSave, |note| {
            if note.get("body").to_key().is_empty() {
                return Err(err!("body must not be blank"));
            }
            Ok(())
        })
        .build();

    let mut note = Entity::new(test.db.clone(), definition);
    assert_err!(note.save().await);
    assert!(test.log().is_empty());
}

struct Slugify;

#[async_trait]
impl Hook for Slugify {
    async fn call(&self, entity: &mut Entity) -> Result<()> {
        let slug = entity.get("body").to_key().to_lowercase().replace(' ', "-");
        entity.set("slug", slug);
        Ok(())
    }
}

#[tokio::test]
async fn hooks_can_change_attributes() {
    let test = db().await;

    let definition = Definition::builder("Note", "notes")
        .hook(HookKind::BeforeSave, Slugify)
        .build();

    let mut note = Entity::new(test.db.clone(), definition.clone());
    note.set("body", "Hello World");
    assert_ok!(note.save().await);

    let stored = assert_ok!(test.db.model_query(definition).first().await).unwrap();
    assert_eq!(stored.get("slug"), &Value::from("hello-world"));
}
