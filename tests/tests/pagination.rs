use sheetorm::{record, Config, PaginationConfig, Value};
use tests::{assert_eq, assert_err, assert_ok, fixtures, fixtures::Post, setup, setup_with};

async fn seed_posts(test: &tests::DbTest, n: usize) {
    let posts = (1..=n)
        .map(|i| record! { "title" => format!("post {i}"), "views" => i })
        .collect();
    assert_ok!(test.db.insert_many("posts", posts).await);
}

#[tokio::test]
async fn posts_scenario() {
    let test = setup().await;
    seed_posts(&test, 25).await;

    let page = assert_ok!(test.db.table("posts").paginate(2, 10).await);

    assert_eq!(page.len(), 10);
    assert_eq!(page.meta.total, 25);
    assert_eq!(page.meta.last_page, 3);
    assert_eq!(page.meta.from, 11);
    assert_eq!(page.meta.to, 20);
    assert!(page.has_next());
    assert!(page.has_prev());
    assert_eq!(page[0]["id"], Value::from(11));
}

#[tokio::test]
async fn last_page_is_partial() {
    let test = setup().await;
    seed_posts(&test, 25).await;

    let page = assert_ok!(test.db.query::<Post>().paginate(3, 10).await);
    assert_eq!(page.len(), 5);
    assert_eq!(page.meta.to, 25);
    assert!(!page.has_next());
}

#[tokio::test]
async fn paginate_ignores_limit_and_offset() {
    let test = setup().await;
    seed_posts(&test, 12).await;

    let page = assert_ok!(
        test.db
            .table("posts")
            .limit(2)
            .offset(5)
            .order_by("views", "desc")
            .paginate(1, 10)
            .await
    );

    assert_eq!(page.len(), 10);
    assert_eq!(page[0]["views"], Value::from(12));
}

#[tokio::test]
async fn default_page_size_comes_from_config() {
    let mut builder = fixtures::builder();
    builder.config(Config::default().pagination(PaginationConfig {
        per_page: 4,
        max_per_page: 8,
    }));
    let test = setup_with(builder).await;
    seed_posts(&test, 9).await;

    let page = assert_ok!(test.db.query::<Post>().paginate_default(3).await);
    assert_eq!(page.len(), 1);
    assert_eq!(page.meta.last_page, 3);

    assert_err!(
        test.db.query::<Post>().paginate(1, 9).await,
        is_invalid_argument
    );
}

#[tokio::test]
async fn paginate_to_json_shape() {
    let test = setup().await;
    seed_posts(&test, 3).await;

    let json = assert_ok!(test.db.query::<Post>().paginate_to_json(1, 2).await);

    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"][0]["title"], "post 1");
    assert_eq!(json["meta"]["total"], 3);
    assert_eq!(json["meta"]["last_page"], 2);
}

#[tokio::test]
async fn page_beyond_addressable_rows_is_rejected() {
    let test = setup().await;
    seed_posts(&test, 3).await;

    assert_err!(
        test.db.table("posts").paginate(usize::MAX, 10).await,
        is_invalid_argument
    );

    let page = assert_ok!(test.db.table("posts").paginate(usize::MAX / 10, 10).await);
    assert!(page.is_empty());
    assert!(!page.has_next());
}
