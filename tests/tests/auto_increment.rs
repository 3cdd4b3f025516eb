use sheetorm::{record, Value};
use tests::{assert_eq, assert_ok, setup};

#[tokio::test]
async fn ids_continue_after_the_current_maximum() {
    let test = setup().await;
    assert_ok!(test.driver.seed(
        "tags",
        [
            record! { "id" => 7, "name" => "a" },
            record! { "id" => 41, "name" => "b" },
            record! { "id" => 3, "name" => "c" },
        ],
    ));

    let rows = assert_ok!(
        test.db
            .insert_many(
                "tags",
                vec![
                    record! { "name" => "x" },
                    record! { "name" => "y" },
                    record! { "name" => "z" },
                ],
            )
            .await
    );

    let ids: Vec<_> = rows.iter().map(|row| row["id"].clone()).collect();
    assert_eq!(ids, [Value::from(42), Value::from(43), Value::from(44)]);

    let stored = assert_ok!(test.db.table("tags").filter_eq("name", "y").first().await);
    assert_eq!(stored.unwrap()["id"], Value::from(43));
}

#[tokio::test]
async fn empty_table_starts_at_one() {
    let test = setup().await;

    let row = assert_ok!(test.db.insert("tags", record! { "name" => "first" }).await);
    assert_eq!(row["id"], Value::from(1));
}

#[tokio::test]
async fn caller_supplied_ids_are_replaced() {
    let test = setup().await;

    let row = assert_ok!(test.db.insert("tags", record! { "id" => 99, "name" => "x" }).await);
    assert_eq!(row["id"], Value::from(1));
}
