use sheaf::{Document, ModelDef, ReferenceDef};
use tests::{assert_stored, models, tests, DbTest};

fn user(orphan_removal: bool) -> ModelDef {
    let mut profile = ReferenceDef::one("profile", "Profile");
    if orphan_removal {
        profile = profile.orphan_removal();
    }
    ModelDef::new("User").reference(profile)
}

fn profile() -> ModelDef {
    ModelDef::new("Profile")
}

async fn detached_target_is_deleted(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(true), profile())).await;

    let p1 = db
        .persist(Document::new("Profile").with_id("p1").with("name", "first"))
        .unwrap();
    let u1 = db
        .persist(Document::new("User").with_id("u1").with_reference("profile", p1.id()))
        .unwrap();
    db.flush().await.unwrap();

    let previous = db.set_one(&u1, "profile", None).unwrap();
    assert_eq!(previous, Some(p1.clone()));

    let result = db.flush().await.unwrap();
    assert_eq!(result.updated, [u1.clone()]);
    assert_eq!(result.orphaned, [p1.clone()]);
    assert_eq!(db.state(&p1), None);
    assert_stored!(test, !p1);

    assert_eq!(db.find("Profile", "p1").await.unwrap(), None);

    db.clear();
    let u1 = db.find("User", "u1").await.unwrap().unwrap();
    assert_eq!(db.reference(&u1, "profile").unwrap(), None);
}

async fn replaced_target_is_deleted(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(true), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    let u1 = db
        .persist(Document::new("User").with_id("u1").with_reference("profile", p1.id()))
        .unwrap();
    db.flush().await.unwrap();

    let p2 = db.persist(Document::new("Profile").with_id("p2")).unwrap();
    db.set_one(&u1, "profile", Some(&p2)).unwrap();

    test.log().clear();
    let result = db.flush().await.unwrap();

    assert_eq!(
        test.log().describe(db.schema()),
        ["insert Profile(p2)", "update User(u1)", "delete Profile(p1)"]
    );
    assert_eq!(result.orphaned, [p1.clone()]);
    assert_stored!(test, !p1);
    assert_stored!(test, p2);

    db.clear();
    let u1 = db.find("User", "u1").await.unwrap().unwrap();
    assert_eq!(db.reference(&u1, "profile").unwrap(), Some(p2));
}

async fn detached_target_survives_without_orphan_removal(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(false), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    let p2 = db.persist(Document::new("Profile").with_id("p2")).unwrap();
    let u1 = db
        .persist(Document::new("User").with_id("u1").with_reference("profile", p1.id()))
        .unwrap();
    db.flush().await.unwrap();

    db.set_one(&u1, "profile", Some(&p2)).unwrap();
    test.log().clear();
    let result = db.flush().await.unwrap();
    assert!(result.deleted.is_empty());
    assert!(test.log().has_update());
    assert!(!test.log().has_insert());
    assert!(!test.log().has_delete());

    db.set_one(&u1, "profile", None).unwrap();
    let result = db.flush().await.unwrap();
    assert!(result.deleted.is_empty());

    db.clear();
    assert!(db.find("Profile", "p1").await.unwrap().is_some());
    assert!(db.find("Profile", "p2").await.unwrap().is_some());
}

async fn target_moved_to_another_owner_survives(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(true), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    let u1 = db
        .persist(Document::new("User").with_id("u1").with_reference("profile", p1.id()))
        .unwrap();
    let u2 = db.persist(Document::new("User").with_id("u2")).unwrap();
    db.flush().await.unwrap();

    db.set_one(&u1, "profile", None).unwrap();
    db.set_one(&u2, "profile", Some(&p1)).unwrap();

    let result = db.flush().await.unwrap();
    assert_eq!(result.updated, [u1, u2.clone()]);
    assert!(result.orphaned.is_empty());
    assert_stored!(test, p1);

    assert_eq!(db.reference(&u2, "profile").unwrap(), Some(p1));
}

async fn removed_owner_takes_its_target(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(true), profile())).await;

    let p1 = db.persist(Document::new("Profile").with_id("p1")).unwrap();
    let u1 = db
        .persist(Document::new("User").with_id("u1").with_reference("profile", p1.id()))
        .unwrap();
    db.flush().await.unwrap();

    db.remove(&u1).unwrap();
    let result = db.flush().await.unwrap();

    assert_eq!(result.deleted, [u1.clone(), p1.clone()]);
    assert_eq!(result.orphaned, [p1.clone()]);
    assert!(db.is_empty());
    assert_stored!(test, !u1);
    assert_stored!(test, !p1);
}

async fn removed_owner_cascades_through_orphans(test: &mut DbTest) {
    let profile = ModelDef::new("Profile")
        .reference(ReferenceDef::one("avatar", "Avatar").orphan_removal());
    let mut db = test
        .setup_db(models!(user(true), profile, ModelDef::new("Avatar")))
        .await;

    let a1 = db.persist(Document::new("Avatar").with_id("a1")).unwrap();
    let p1 = db
        .persist(Document::new("Profile").with_id("p1").with_reference("avatar", a1.id()))
        .unwrap();
    let u1 = db
        .persist(Document::new("User").with_id("u1").with_reference("profile", p1.id()))
        .unwrap();
    db.flush().await.unwrap();

    db.remove(&u1).unwrap();
    let result = db.flush().await.unwrap();

    assert_eq!(result.deleted, [u1.clone(), p1.clone(), a1.clone()]);
    assert_eq!(result.orphaned, [p1.clone(), a1.clone()]);
    assert!(db.is_empty());
    assert_stored!(test, !u1);
    assert_stored!(test, !p1);
    assert_stored!(test, !a1);
}

async fn set_one_checks_target_model(test: &mut DbTest) {
    let mut db = test.setup_db(models!(user(true), profile())).await;

    let u1 = db.persist(Document::new("User").with_id("u1")).unwrap();
    let u2 = db.persist(Document::new("User").with_id("u2")).unwrap();

    let err = db.set_one(&u1, "profile", Some(&u2)).unwrap_err();
    assert!(err.is_invalid_reference_target());
    assert_eq!(
        err.to_string(),
        "invalid reference target: `User.profile` references `Profile`, got `User`"
    );

    let err = db.set_one(&u1, "avatar", None).unwrap_err();
    assert!(err.is_unmapped_reference());
}

tests!(
    detached_target_is_deleted,
    replaced_target_is_deleted,
    detached_target_survives_without_orphan_removal,
    target_moved_to_another_owner_survives,
    removed_owner_takes_its_target,
    removed_owner_cascades_through_orphans,
    set_one_checks_target_model,
);
