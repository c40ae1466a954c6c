use sheaf::{Document, Id, ModelDef, ReferenceDef, State};
use tests::{models, tests, DbTest};

fn user() -> ModelDef {
    ModelDef::new("User")
        .reference(ReferenceDef::one("profile", "Profile").orphan_removal())
        .reference(ReferenceDef::many("profile_many", "Profile"))
}

fn profile() -> ModelDef {
    ModelDef::new("Profile")
}

async fn persist_is_idempotent_for_equal_documents(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let alice = Document::new("User").with_id("u1").with("name", "alice");
    let first = db.persist(alice.clone()).unwrap();
    let second = db.persist(alice).unwrap();
    assert_eq!(first, second);
    assert_eq!(db.len(), 1);

    let err = db
        .persist(Document::new("User").with_id("u1").with("name", "bob"))
        .unwrap_err();
    assert!(err.is_identity_conflict());
    assert_eq!(
        err.to_string(),
        "identity conflict: another instance of `User` is already managed with id `u1`"
    );
    assert_eq!(db.get(&first).unwrap().get("name"), Some(&"alice".into()));
}

async fn find_returns_managed_instance(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let u1 = db
        .persist(Document::new("User").with_id("u1").with("name", "alice"))
        .unwrap();
    db.flush().await.unwrap();
    db.set_field(&u1, "name", "bob").unwrap();

    test.log().clear();
    let found = db.find("User", "u1").await.unwrap();
    assert_eq!(found, Some(u1.clone()));
    assert!(!test.log().has_find_by_id());

    // The unflushed edit is visible through the managed instance.
    assert_eq!(db.get(&u1).unwrap().get("name"), Some(&"bob".into()));
}

async fn removed_document_is_not_found(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let u1 = db.persist(Document::new("User").with_id("u1")).unwrap();
    db.flush().await.unwrap();
    db.remove(&u1).unwrap();

    assert_eq!(db.state(&u1), Some(State::Removed));
    assert_eq!(db.find("User", "u1").await.unwrap(), None);
    assert!(db.get(&u1).unwrap_err().is_record_not_found());

    // Persisting the same document again cancels the removal.
    db.persist(Document::new("User").with_id("u1")).unwrap();
    assert_eq!(db.state(&u1), Some(State::Managed));
    assert!(db.flush().await.unwrap().is_empty());
}

async fn clear_detaches_everything(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let u1 = db
        .persist(Document::new("User").with_id("u1").with("name", "alice"))
        .unwrap();
    db.flush().await.unwrap();
    db.set_field(&u1, "name", "bob").unwrap();

    db.clear();
    assert!(db.is_empty());
    assert!(db.get(&u1).unwrap_err().is_record_not_found());

    // Pending edits are discarded; the document is reloaded as stored.
    test.log().clear();
    let u1 = db.find("User", "u1").await.unwrap().unwrap();
    assert!(test.log().has_find_by_id());
    assert_eq!(db.get(&u1).unwrap().get("name"), Some(&"alice".into()));
    assert!(db.flush().await.unwrap().is_empty());
}

async fn generated_identities(test: &mut DbTest) {
    let mut builder = models!(user(), profile());
    builder.id_strategy(sheaf::db::IdStrategy::Sequential);
    let mut db = test.setup_db(builder).await;

    let p = db.persist(Document::new("Profile")).unwrap();
    let u = db.persist(Document::new("User").with_reference("profile", p.id())).unwrap();
    assert_eq!(p.id(), &Id::from("1"));
    assert_eq!(u.id(), &Id::from("2"));

    assert_eq!(db.get(&u).unwrap().id(), Some(u.id()));
    assert_eq!(db.reference(&u, "profile").unwrap(), Some(p));
}

async fn generated_identities_skip_managed_keys(test: &mut DbTest) {
    let mut builder = models!(user(), profile());
    builder.id_strategy(sheaf::db::IdStrategy::Sequential);
    let mut db = test.setup_db(builder).await;

    let explicit = db
        .persist(Document::new("Profile").with_id("1").with("name", "a"))
        .unwrap();
    let generated = db
        .persist(Document::new("Profile").with("name", "b"))
        .unwrap();
    assert_eq!(generated.id(), &Id::from("2"));

    let equal = db
        .persist(Document::new("Profile").with_id("3").with("name", "c"))
        .unwrap();
    let fresh = db
        .persist(Document::new("Profile").with("name", "c"))
        .unwrap();
    assert_ne!(fresh, equal);
    assert_eq!(fresh.id(), &Id::from("4"));
    assert_eq!(db.len(), 4);

    assert_eq!(db.get(&explicit).unwrap().get("name"), Some(&"a".into()));
    assert_eq!(db.get(&generated).unwrap().get("name"), Some(&"b".into()));
}

async fn configuration_errors(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(), profile())).await;

    let err = db.persist(Document::new("Avatar")).unwrap_err();
    assert!(err.is_unknown_model());

    let err = db
        .persist(Document::new("User").with_reference("avatar", &Id::from("a1")))
        .unwrap_err();
    assert!(err.is_unmapped_reference());
    assert!(db.is_empty());

    assert!(db.key("Avatar", "a1").unwrap_err().is_unknown_model());

    let ghost = db.key("User", "ghost").unwrap();
    assert_eq!(ghost.model(), db.schema().model_by_name("User").unwrap().id);
    assert_eq!(ghost.id(), &Id::from("ghost"));
    assert!(db.remove(&ghost).unwrap_err().is_record_not_found());
    assert!(db.collection(&ghost, "profile_many").unwrap_err().is_record_not_found());
}

tests!(
    persist_is_idempotent_for_equal_documents,
    find_returns_managed_instance,
    removed_document_is_not_found,
    clear_detaches_everything,
    generated_identities,
    generated_identities_skip_managed_keys,
    configuration_errors,
);
