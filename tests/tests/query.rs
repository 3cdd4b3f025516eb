use sheetorm::{record, Operator, Value};
use tests::{
    assert_eq, assert_err, assert_ok,
    fixtures::{Post, User},
    setup, DbTest,
};

async fn seed_posts() -> DbTest {
    let test = setup().await;
    assert_ok!(
        test.db
            .insert_many(
                "posts",
                vec![
                    record! { "title" => "alpha", "views" => 10, "user_id" => 1 },
                    record! { "title" => "beta", "views" => 150, "user_id" => 2 },
                    record! { "title" => "gamma", "views" => 300 },
                    record! { "title" => "delta", "views" => 40, "user_id" => 1 },
                ],
            )
            .await
    );
    test
}

fn titles(rows: &[sheetorm::Record]) -> Vec<String> {
    rows.iter().map(|row| row["title"].to_key()).collect()
}

#[tokio::test]
async fn clauses_fold_left_to_right() {
    let test = seed_posts().await;

    // (views > 100 OR title = alpha) AND user_id = 1
    let rows = assert_ok!(
        test.db
            .table("posts")
            .filter("views", ">", 100)
            .or_filter("title", "=", "alpha")
            .filter("user_id", "=", 1)
            .order_by("id", "asc")
            .get()
            .await
    );

    assert_eq!(titles(&rows), ["alpha"]);
}

#[tokio::test]
async fn equality_coerces_but_in_does_not() {
    let test = seed_posts().await;

    let rows = assert_ok!(test.db.table("posts").filter_eq("views", "150").get().await);
    assert_eq!(titles(&rows), ["beta"]);

    let rows = assert_ok!(test.db.table("posts").filter_in("views", ["150"]).get().await);
    assert!(rows.is_empty());

    let rows = assert_ok!(
        test.db
            .table("posts")
            .filter_in("views", [10, 40])
            .order_by("views", "desc")
            .get()
            .await
    );
    assert_eq!(titles(&rows), ["delta", "alpha"]);
}

#[tokio::test]
async fn null_tests_and_ranges() {
    let test = seed_posts().await;
    let db = &test.db;

    let rows = assert_ok!(db.table("posts").filter_by("user_id", "NULL").get().await);
    assert_eq!(titles(&rows), ["gamma"]);

    let rows = assert_ok!(db.table("posts").filter_not_null("user_id").count().await);
    assert_eq!(rows, 3);

    let rows = assert_ok!(
        db.table("posts")
            .filter_between("views", 40, 150)
            .order_by("views", "asc")
            .get()
            .await
    );
    assert_eq!(titles(&rows), ["delta", "beta"]);

    let rows = assert_ok!(
        db.table("posts")
            .filter("views", Operator::NotBetween, Value::from(vec![40, 150]))
            .order_by("title", "asc")
            .get()
            .await
    );
    assert_eq!(titles(&rows), ["alpha", "gamma"]);
}

#[tokio::test]
async fn nulls_sort_first() {
    let test = seed_posts().await;

    let rows = assert_ok!(
        test.db
            .table("posts")
            .order_by("user_id", "asc")
            .order_by("views", "desc")
            .get()
            .await
    );

    assert_eq!(titles(&rows), ["gamma", "delta", "alpha", "beta"]);
}

#[tokio::test]
async fn select_projects_columns() {
    let test = seed_posts().await;

    let row = assert_ok!(test.db.table("posts").select(["title"]).first().await).unwrap();
    assert_eq!(row, record! { "title" => "alpha" });
}

#[tokio::test]
async fn scopes() {
    let test = seed_posts().await;

    let popular = assert_ok!(assert_ok!(test.db.query::<Post>().scope("popular")).get().await);
    assert_eq!(
        popular.iter().map(|p| p.get("title").to_key()).collect::<Vec<_>>(),
        ["gamma", "beta"]
    );

    assert_err!(test.db.query::<Post>().scope("nope"), is_invalid_operation);

    assert_ok!(test.db.create::<User>(record! { "name" => "Kid", "email" => "k@x.com", "age" => 9 }).await);
    assert_ok!(test.db.create::<User>(record! { "name" => "Old", "email" => "o@x.com", "age" => 40 }).await);

    let adults = assert_ok!(assert_ok!(test.db.query::<User>().scope("adults")).count().await);
    assert_eq!(adults, 1);
}

#[tokio::test]
async fn raw_update_merges_patch() {
    let test = seed_posts().await;

    let updated = assert_ok!(
        test.db
            .table("posts")
            .filter_eq("user_id", 1)
            .update(record! { "views" => 0 })
            .await
    );
    assert_eq!(updated, 2);

    let alpha = assert_ok!(test.db.table("posts").filter_eq("title", "alpha").first().await).unwrap();
    assert_eq!(alpha["views"], Value::from(0));
    assert_eq!(alpha["user_id"], Value::from(1));
}
