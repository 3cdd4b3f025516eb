use sheetorm::{record, CacheConfig, Config, Value};
use std::time::Duration;
use sheetorm_driver_memory::MemoryDriver;
use tests::{
    assert_eq, assert_err, assert_ok, fixtures, fixtures::Post, setup, setup_with, FailingAppend,
    HeldFetch,
};

async fn cached_setup() -> tests::DbTest {
    let mut builder = fixtures::builder();
    builder.config(Config::default().cache(CacheConfig::enabled()));
    setup_with(builder).await
}

fn has_key_for(test: &tests::DbTest, table: &str) -> bool {
    let prefix = format!("{table}:");
    test.db.cache_keys().iter().any(|key| key.starts_with(&prefix))
}

#[tokio::test]
async fn repeated_reads_hit_the_cache() {
    let test = cached_setup().await;
    assert_ok!(test.db.insert("posts", record! { "title" => "a" }).await);

    let query = test.db.table("posts").filter("views", ">=", 0);
    assert_eq!(assert_ok!(query.count().await), 1);
    assert_eq!(assert_ok!(query.count().await), 1);

    assert_eq!(test.log().fetches("posts"), 1);
}

#[tokio::test]
async fn mutations_drop_every_entry_of_the_table() {
    let test = cached_setup().await;
    let db = &test.db;

    assert_ok!(db.insert_many("posts", vec![record! { "title" => "a" }, record! { "title" => "b" }]).await);
    assert_ok!(db.insert("comments", record! { "post_id" => 1, "body" => "hi" }).await);

    assert_ok!(db.table("posts").get().await);
    assert_ok!(db.table("posts").filter_eq("title", "a").order_by("id", "desc").get().await);
    assert_ok!(db.table("comments").get().await);
    assert!(has_key_for(&test, "posts"));

    assert_ok!(db.table("posts").filter_eq("title", "a").update(record! { "views" => 5 }).await);
    assert!(!has_key_for(&test, "posts"));
    assert!(has_key_for(&test, "comments"));

    let rows = assert_ok!(db.table("posts").filter_eq("title", "a").get().await);
    assert_eq!(rows[0]["views"], Value::from(5));
    assert!(has_key_for(&test, "posts"));

    assert_ok!(db.table("posts").filter_eq("title", "b").delete().await);
    assert!(!has_key_for(&test, "posts"));
    assert_eq!(assert_ok!(db.table("posts").count().await), 1);

    let mut post = assert_ok!(db.find_or_fail::<Post>(1).await);
    post.set("title", "renamed");
    assert_ok!(post.save().await);
    assert!(!has_key_for(&test, "posts"));
}

#[tokio::test]
async fn per_query_opt_in() {
    let test = setup().await;
    assert_ok!(test.db.insert("posts", record! { "title" => "a" }).await);

    assert_ok!(test.db.table("posts").get().await);
    assert!(test.db.cache_keys().is_empty());

    let cached = test.db.table("posts").cache_ttl(Duration::from_secs(60));
    assert_ok!(cached.get().await);
    assert_ok!(cached.get().await);

    assert_eq!(test.db.cache_keys().len(), 1);
    assert_eq!(test.log().fetches("posts"), 2);

    test.db.clear_table_cache("posts");
    assert!(test.db.cache_keys().is_empty());
}

#[tokio::test]
async fn clones_share_one_cache() {
    let test = cached_setup().await;
    let other = test.db.clone();

    assert_ok!(test.db.table("posts").get().await);
    assert_ok!(other.insert("posts", record! { "title" => "new" }).await);

    assert_eq!(assert_ok!(test.db.table("posts").count().await), 1);
}

#[tokio::test]
async fn read_overlapping_a_write_is_not_cached() {
    let (driver, fetched, release) = HeldFetch::new(MemoryDriver::new());

    let db = assert_ok!(
        fixtures::builder()
            .config(Config::default().cache(CacheConfig::enabled()))
            .build(driver)
            .await
    );

    let reader = tokio::spawn({
        let db = db.clone();
        async move { db.table("posts").count().await }
    });

    // The reader has read the empty table but not yet returned
    assert_ok!(fetched.await);
    assert_ok!(db.insert("posts", record! { "title" => "a" }).await);
    let _ = release.send(());

    assert_eq!(assert_ok!(assert_ok!(reader.await)), 0);
    assert!(db.cache_keys().is_empty());

    assert_eq!(assert_ok!(db.table("posts").count().await), 1);
}

#[tokio::test]
async fn failed_insert_still_invalidates() {
    let driver = MemoryDriver::new();

    let db = assert_ok!(
        fixtures::builder()
            .config(Config::default().cache(CacheConfig::enabled()))
            .build(FailingAppend::new(driver.clone()))
            .await
    );

    assert_eq!(assert_ok!(db.table("posts").count().await), 0);
    assert_eq!(db.cache_keys().len(), 1);

    assert_err!(
        db.insert("posts", record! { "title" => "a" }).await,
        is_query_failed
    );
    assert!(db.cache_keys().is_empty());

    assert_eq!(assert_ok!(db.table("posts").count().await), 1);
}
