use sheetorm::{Db, Entity, ModelQuery, QueryBuilder};

fn assert_sync_send<T: Send + Sync>() {}

#[test]
fn handles_are_sync_send() {
    assert_sync_send::<Db>();
    assert_sync_send::<Entity>();
    assert_sync_send::<ModelQuery>();
    assert_sync_send::<QueryBuilder>();
}

#[tokio::test]
async fn futures_are_send() {
    let test = tests::setup().await;

    let handle = tokio::spawn(async move {
        test.db
            .query::<tests::fixtures::Post>()
            .preload("comments")
            .get()
            .await
            .map(|posts| posts.len())
    });

    assert_eq!(handle.await.unwrap().unwrap(), 0);
}
