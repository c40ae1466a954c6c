use sheaf::{Db, Document, ModelDef, ReferenceDef};

fn builder() -> sheaf::db::Builder {
    let mut builder = Db::builder();
    builder
        .register(
            ModelDef::new("User")
                .reference(ReferenceDef::many("profile_many", "Profile").orphan_removal()),
        )
        .register(ModelDef::new("Profile"));
    builder
}

#[tokio::test]
async fn connect_memory_url() {
    let mut db = builder().connect("memory://").await.unwrap();

    let p1 = db.persist(Document::new("Profile")).unwrap();
    let u1 = db
        .persist(Document::new("User").with_references("profile_many", [p1.id()]))
        .unwrap();
    db.flush().await.unwrap();

    db.collection(&u1, "profile_many").unwrap().clear();
    let result = db.flush().await.unwrap();
    assert_eq!(result.orphaned, [p1]);
}

#[tokio::test]
async fn connect_rejects_unknown_scheme() {
    let err = builder().connect("postgresql://localhost/app").await.unwrap_err();
    assert!(err.is_invalid_connection_url());
}

#[tokio::test]
async fn build_rejects_invalid_schema() {
    let mut builder = Db::builder();
    builder.register(ModelDef::new("User").reference(ReferenceDef::one("profile", "Profile")));

    let err = builder.connect("memory://").await.unwrap_err();
    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: `User.profile` references unknown model `Profile`"
    );
}
