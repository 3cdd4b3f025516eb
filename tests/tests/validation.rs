use sheetorm::{record, Value};
use tests::{assert_eq, assert_err, assert_ok, fixtures::User, setup};

#[tokio::test]
async fn users_scenario() {
    let test = setup().await;
    let db = &test.db;

    let al = assert_ok!(db.create::<User>(record! { "name" => "Al", "email" => "a@x.com" }).await);
    assert_eq!(al.id(), &Value::from(1));

    let err = assert_err!(
        db.create::<User>(record! { "name" => "Bo", "email" => "a@x.com" }).await,
        is_validation
    );
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.get("email").unwrap(), ["email must be unique"]);
    assert!(!errors.contains("name"));

    let err = assert_err!(db.create::<User>(record! { "name" => "A" }).await, is_validation);
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.get("name").unwrap(), ["Must be at least 2 characters"]);
    assert_eq!(errors.get("email").unwrap(), ["email is required"]);
}

#[tokio::test]
async fn validation_happens_before_the_write() {
    let test = setup().await;

    assert_err!(
        test.db
            .create::<User>(record! { "name" => "Al", "email" => "not an email" })
            .await,
        is_validation
    );

    assert!(!test.log().has_append("users"));
    assert_eq!(test.driver.cells("users").unwrap().len(), 1);
}

#[tokio::test]
async fn updating_keeps_own_email() {
    let test = setup().await;
    let db = &test.db;

    let mut al = assert_ok!(db.create::<User>(record! { "name" => "Al", "email" => "a@x.com" }).await);
    assert_ok!(db.create::<User>(record! { "name" => "Bo", "email" => "b@x.com" }).await);

    al.set("name", "Alan");
    assert_ok!(al.save().await);

    al.set("email", "b@x.com");
    let err = assert_err!(al.save().await, is_validation);
    assert!(err.validation_errors().unwrap().contains("email"));
}

#[tokio::test]
async fn type_errors_stop_rule_checks() {
    let test = setup().await;

    let err = assert_err!(
        test.db
            .create::<User>(record! { "name" => "Cy", "email" => "c@x.com", "age" => "old" })
            .await,
        is_validation
    );

    assert_eq!(
        err.validation_errors().unwrap().get("age").unwrap(),
        ["Must be a number"]
    );
}
