use sheaf::{driver::Operation, Document, ModelDef, ReferenceDef, State};
use tests::{assert_stored, models, tests, DbTest};

fn user() -> ModelDef {
    ModelDef::new("User").reference(ReferenceDef::one("profile", "Profile").orphan_removal())
}

fn profile() -> ModelDef {
    ModelDef::new("Profile")
}

async fn failed_delete_keeps_baseline_and_retries(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    let u1 = db
        .persist(Document::new("User").with_id("u1").with_reference("profile", p1.id()))
        .unwrap();
    db.flush().await.unwrap();

    db.set_one(&u1, "profile", None).unwrap();
    db.set_field(&u1, "name", "alice").unwrap();

    test.setup().memory().fail_next(Operation::is_delete);

    let err = db.flush().await.unwrap_err();
    assert!(err.is_persistence_failure());
    assert!(err.root().is_driver_operation_failed());
    assert_eq!(err.acknowledged_operations(), Some(1));
    assert_eq!(
        err.to_string(),
        "persistence failure: `delete Profile(p1)` failed after 1 acknowledged operation: \
         injected failure on `delete Profile(p1)`"
    );

    // The update reached the store, but nothing was marked as flushed.
    assert_eq!(db.state(&p1), Some(State::Managed));
    assert_eq!(db.reference(&u1, "profile").unwrap(), None);
    assert_stored!(test, p1);

    test.log().clear();
    let result = db.flush().await.unwrap();
    assert_eq!(
        test.log().describe(db.schema()),
        ["update User(u1)", "delete Profile(p1)"]
    );
    assert_eq!(result.orphaned, [p1.clone()]);
    assert_stored!(test, !p1);

    assert!(db.flush().await.unwrap().is_empty());
}

async fn failed_insert_keeps_documents_new(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    let u1 = db
        .persist(Document::new("User").with_id("u1").with_reference("profile", p1.id()))
        .unwrap();

    test.setup()
        .memory()
        .fail_next(|op| matches!(op, Operation::Insert(insert) if insert.document.model() == "User"));

    let err = db.flush().await.unwrap_err();
    assert_eq!(err.acknowledged_operations(), Some(1));
    assert_eq!(db.state(&p1), Some(State::New));
    assert_eq!(db.state(&u1), Some(State::New));

    // Inserts are upserts, so resubmitting `p1` is harmless.
    let result = db.flush().await.unwrap();
    assert_eq!(result.inserted, [p1.clone(), u1.clone()]);
    assert_eq!(db.state(&u1), Some(State::Managed));
    assert_eq!(test.setup().memory().len(), 2);
}

tests!(
    failed_delete_keeps_baseline_and_retries,
    failed_insert_keeps_documents_new,
);
