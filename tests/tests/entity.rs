use sheetorm::{record, Value};
use tests::{
    assert_eq, assert_err, assert_ok,
    fixtures::{Post, User},
    setup,
};

#[tokio::test]
async fn dirty_tracking() {
    let test = setup().await;

    let mut post = test.db.new_entity::<Post>();
    post.fill(record! { "title" => "draft", "views" => 1 });
    assert!(!post.is_dirty());
    assert!(post.is_new());

    assert_ok!(post.save().await);
    assert!(post.is_persisted());

    post.fill(record! { "title" => "draft", "views" => 2 });
    assert_eq!(post.dirty(), record! { "views" => 2 });

    assert_ok!(post.save().await);
    assert!(!post.is_dirty());

    let stored = assert_ok!(test.db.find_or_fail::<Post>(post.id().clone()).await);
    assert_eq!(stored.get("views"), &Value::from(2));
    assert!(!stored.is_dirty());
}

#[tokio::test]
async fn create_fills_defaults_and_timestamps() {
    let test = setup().await;

    let user = assert_ok!(
        test.db
            .create::<User>(record! { "name" => "Al", "email" => " A@X.com " })
            .await
    );

    assert_eq!(user.get("email"), &Value::from("a@x.com"));
    assert!(user.get("created_at").as_date_time().is_some());
    assert_eq!(user.get("created_at"), user.get("updated_at"));

    let stored = assert_ok!(test.db.find_or_fail::<User>(1).await);
    // The store keeps millisecond precision.
    assert_eq!(stored.get("created_at").to_key(), user.get("created_at").to_key());
    assert!(stored.get("deleted_at").is_null());

    let post = assert_ok!(test.db.create::<Post>(record! { "title" => "t" }).await);
    let stored = assert_ok!(test.db.find_or_fail::<Post>(post.id().clone()).await);
    assert_eq!(stored.get("views"), &Value::from(0));
}

#[tokio::test]
async fn find_or_fail_names_model_and_id() {
    let test = setup().await;

    let err = assert_err!(test.db.find_or_fail::<Post>(42).await, is_model_not_found);
    assert_eq!(err.to_string(), "Post with id 42 not found");
}

#[tokio::test]
async fn find_by_and_create_many() {
    let test = setup().await;

    let posts = assert_ok!(
        test.db
            .create_many::<Post>(vec![
                record! { "title" => "a" },
                record! { "title" => "b" },
                record! { "title" => "c" },
            ])
            .await
    );
    assert_eq!(
        posts.iter().map(|p| p.id().clone()).collect::<Vec<_>>(),
        [Value::from(1), Value::from(2), Value::from(3)]
    );

    let b = assert_ok!(test.db.find_by::<Post>("title", "b").await).unwrap();
    assert_eq!(b.id(), &Value::from(2));
    assert_eq!(assert_ok!(test.db.all::<Post>().await).len(), 3);
}

#[tokio::test]
async fn get_as_reads_typed_values() {
    let test = setup().await;
    let post = assert_ok!(test.db.create::<Post>(record! { "title" => "t", "views" => 12 }).await);

    assert_eq!(assert_ok!(post.get_as::<i64>("views")), Some(12));
    assert_eq!(assert_ok!(post.get_as::<String>("title")), Some("t".to_string()));
    assert_eq!(assert_ok!(post.get_as::<f64>("user_id")), None);
    assert_err!(post.get_as::<bool>("title"), is_type_conversion);
}

#[tokio::test]
async fn update_of_a_vanished_row_is_not_found() {
    let test = setup().await;

    let mut post = assert_ok!(test.db.create::<Post>(record! { "title" => "t" }).await);
    assert_ok!(test.db.table("posts").delete().await);

    post.set("title", "u");
    assert_err!(post.save().await, is_model_not_found);
}
