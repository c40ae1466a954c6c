use pretty_assertions::assert_eq;
use sheaf::{driver::Operation, Document, Id, ModelDef, ReferenceDef, Value};
use tests::{models, tests, DbTest};

fn user() -> ModelDef {
    ModelDef::new("User")
        .reference(ReferenceDef::one("profile", "Profile").orphan_removal())
        .reference(ReferenceDef::many("profile_many", "Profile").orphan_removal())
}

fn profile() -> ModelDef {
    ModelDef::new("Profile")
}

async fn second_flush_writes_nothing(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    let p2 = db.persist(Document::new("Profile").with_id("p2")).unwrap();
    db.persist(
        Document::new("User")
            .with_id("u1")
            .with("name", "alice")
            .with_reference("profile", p1.id())
            .with_references("profile_many", [p2.id()]),
    )
    .unwrap();

    let result = db.flush().await.unwrap();
    assert_eq!(result.inserted.len(), 3);
    assert_eq!(test.log().count(Operation::is_insert), 3);

    test.log().clear();
    let result = db.flush().await.unwrap();
    assert!(result.is_empty());
    assert_eq!(test.log().writes(), 0);
}

async fn loaded_documents_are_clean(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    db.persist(
        Document::new("User")
            .with_id("u1")
            .with("name", "alice")
            .with_reference("profile", p1.id()),
    )
    .unwrap();
    db.flush().await.unwrap();
    db.clear();

    test.log().clear();
    let u1 = db.find("User", "u1").await.unwrap().unwrap();
    db.find("Profile", "p1").await.unwrap().unwrap();
    assert_eq!(test.log().count(Operation::is_find_by_id), 2);

    test.log().clear();
    assert!(db.flush().await.unwrap().is_empty());
    assert!(test.log().is_empty());

    // Setting a field to its current value is no change either.
    db.set_field(&u1, "name", "alice").unwrap();
    assert!(db.flush().await.unwrap().is_empty());
}

async fn update_names_changed_fields(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    let u1 = db
        .persist(Document::new("User").with_id("u1").with("name", "alice").with("age", 30))
        .unwrap();
    db.flush().await.unwrap();

    db.set_field(&u1, "age", 31).unwrap();
    db.collection(&u1, "profile_many").unwrap().add(&p1).unwrap();

    test.log().clear();
    db.flush().await.unwrap();

    let (op, _) = test.log().pop().expect("Expected update operation");
    let Operation::Update(update) = op else {
        panic!("expected update, got {op:?}");
    };
    assert_eq!(update.changed, ["age", "profile_many"]);
    assert_eq!(
        update.document,
        Document::new("User")
            .with_id("u1")
            .with("name", "alice")
            .with("age", 31)
            .with("profile", None::<Id>)
            .with_references("profile_many", [p1.id()])
    );
    assert!(test.log().is_empty());

    db.clear();
    let u1 = db.find("User", "u1").await.unwrap().unwrap();
    assert_eq!(db.get(&u1).unwrap().get("age"), Some(&Value::I64(31)));
}

async fn removing_unflushed_document_writes_nothing(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    db.remove(&p1).unwrap();
    assert!(!db.is_managed(&p1));

    test.log().clear();
    assert!(db.flush().await.unwrap().is_empty());
    assert!(test.log().is_empty());
}

tests!(
    second_flush_writes_nothing,
    loaded_documents_are_clean,
    update_names_changed_fields,
    removing_unflushed_document_writes_nothing,
);
