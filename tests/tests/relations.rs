use sheetorm::{record, Value};
use tests::{
    assert_eq, assert_err, assert_ok,
    fixtures::{Post, User},
    setup, DbTest,
};

/// Two users, ten posts alternating between them, two comments and two tags
/// on every post.
async fn seed() -> DbTest {
    let test = setup().await;
    let driver = &test.driver;

    assert_ok!(driver.seed(
        "users",
        [
            record! { "id" => 1, "name" => "Al", "email" => "a@x.com", "password" => "hunter2" },
            record! { "id" => 2, "name" => "Bo", "email" => "b@x.com" },
        ],
    ));
    assert_ok!(driver.seed(
        "profiles",
        [record! { "id" => 1, "user_id" => 2, "bio" => "hi" }]
    ));
    assert_ok!(driver.seed(
        "posts",
        (1..=10).map(|i| record! { "id" => i, "user_id" => 2 - i % 2, "title" => format!("post {i}") }),
    ));
    assert_ok!(driver.seed(
        "comments",
        (1..=20).map(|i| record! { "id" => i, "post_id" => (i + 1) / 2, "body" => format!("comment {i}") }),
    ));
    assert_ok!(driver.seed(
        "tags",
        [
            record! { "id" => 1, "name" => "rust" },
            record! { "id" => 2, "name" => "sheets" },
            record! { "id" => 3, "name" => "orm" },
        ],
    ));
    assert_ok!(driver.seed(
        "post_tags",
        (1..=10).flat_map(|post| {
            [
                record! { "post_id" => post, "tag_id" => 3 },
                record! { "post_id" => post, "tag_id" => 1 + post % 2 },
            ]
        }),
    ));

    test.log().clear();
    test
}

fn names(entities: &[sheetorm::Entity], column: &str) -> Vec<String> {
    entities.iter().map(|e| e.get(column).to_key()).collect()
}

#[tokio::test]
async fn has_many_and_has_one_without_n_plus_one() {
    let test = seed().await;

    let users = assert_ok!(
        test.db
            .query::<User>()
            .preload("posts")
            .preload("profile")
            .get()
            .await
    );

    assert_eq!(test.log().fetches("users"), 1);
    assert_eq!(test.log().fetches("posts"), 1);
    assert_eq!(test.log().fetches("profiles"), 1);
    assert_eq!(test.log().len(), 3);

    let al_posts = users[0].relation("posts").unwrap().as_many();
    assert_eq!(
        names(al_posts, "title"),
        ["post 1", "post 3", "post 5", "post 7", "post 9"]
    );
    assert!(users[0].relation("profile").unwrap().as_one().is_none());

    let bo_profile = users[1].relation("profile").unwrap().as_one().unwrap();
    assert_eq!(bo_profile.get("bio"), &Value::from("hi"));
}

#[tokio::test]
async fn belongs_to_and_many_to_many_without_n_plus_one() {
    let test = seed().await;

    let posts = assert_ok!(
        test.db
            .query::<Post>()
            .preload("author")
            .preload("comments")
            .preload("tags")
            .get()
            .await
    );
    assert_eq!(posts.len(), 10);

    assert_eq!(test.log().total_fetches(), 5);
    for table in ["posts", "users", "comments", "post_tags", "tags"] {
        assert_eq!(test.log().fetches(table), 1, "{table}");
    }

    let first = &posts[0];
    let author = first.relation("author").unwrap().as_one().unwrap();
    assert_eq!(author.get("name"), &Value::from("Al"));
    assert_eq!(
        names(first.relation("comments").unwrap().as_many(), "body"),
        ["comment 1", "comment 2"]
    );

    // Pivot order, not tag order.
    assert_eq!(
        names(first.relation("tags").unwrap().as_many(), "name"),
        ["orm", "sheets"]
    );
    assert_eq!(
        names(posts[1].relation("tags").unwrap().as_many(), "name"),
        ["orm", "rust"]
    );
}

#[tokio::test]
async fn trashed_targets_are_not_loaded() {
    let test = seed().await;

    let mut al = assert_ok!(test.db.find_or_fail::<User>(1).await);
    assert_ok!(al.delete().await);

    let post = assert_ok!(test.db.query::<Post>().preload("author").first().await).unwrap();
    assert!(post.has_relation("author"));
    assert!(post.relation("author").unwrap().as_one().is_none());
}

#[tokio::test]
async fn lazy_load_uses_the_same_loader() {
    let test = seed().await;

    let mut post = assert_ok!(test.db.find_or_fail::<Post>(2).await);
    assert!(!post.has_relation("comments"));

    assert_ok!(post.load("comments").await);
    assert_eq!(
        names(post.relation("comments").unwrap().as_many(), "body"),
        ["comment 3", "comment 4"]
    );

    assert_err!(post.load("likes").await, is_invalid_operation);
    assert_err!(
        test.db.query::<Post>().preload("likes").get().await,
        is_invalid_operation
    );
}

#[tokio::test]
async fn serialization_includes_relations_and_hides_columns() {
    let test = seed().await;

    let json = assert_ok!(
        test.db
            .query::<User>()
            .filter_eq("id", 1)
            .preload("profile")
            .first_to_json()
            .await
    );

    assert_eq!(json["name"], "Al");
    assert!(json.get("password").is_none());
    assert!(json["profile"].is_null());

    let all = assert_ok!(test.db.query::<Post>().preload("author").to_json().await);
    assert_eq!(all.as_array().unwrap().len(), 10);
    assert_eq!(all[1]["author"]["email"], "b@x.com");
}

#[tokio::test]
async fn empty_results_issue_no_relation_queries() {
    let test = seed().await;

    let posts = assert_ok!(
        test.db
            .query::<Post>()
            .filter_eq("title", "missing")
            .preload("comments")
            .preload("tags")
            .get()
            .await
    );

    assert!(posts.is_empty());
    assert_eq!(test.log().names(), ["fetch_table"]);
}

#[tokio::test]
async fn has_one_keeps_the_row_stored_last() {
    let test = seed().await;
    assert_ok!(test.driver.seed(
        "profiles",
        [record! { "id" => 2, "user_id" => 2, "bio" => "newer" }]
    ));

    let bo = assert_ok!(test.db.query::<User>().filter_eq("id", 2).preload("profile").first().await);
    let profile = bo.unwrap().relation("profile").unwrap().as_one().unwrap().clone();
    assert_eq!(profile.get("bio"), &Value::from("newer"));
}
