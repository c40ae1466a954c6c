mod builder;
pub use builder::Builder;

mod connect;

mod ids;
pub use ids::IdStrategy;
use ids::Ids;

use crate::{
    engine::{self, UnitOfWork},
    Collection, FlushResult, Key, State,
};

use sheaf_core::{
    driver::{operation::FindById, Driver},
    stmt::{Document, Id, Value},
    Error, Result, Schema,
};

use std::sync::Arc;

/// A session: the unit of work of one application task together with the
/// driver it flushes to.
///
/// Documents handed to [`persist`](Db::persist) or loaded by
/// [`find`](Db::find) are owned by the session and addressed by [`Key`].
/// Changes stay in memory until [`flush`](Db::flush).
pub struct Db {
    driver: Arc<dyn Driver>,
    ids: Ids,
    uow: UnitOfWork,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        self.uow.schema()
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.driver
    }

    /// Builds the key of a document of `model`.
    pub fn key(&self, model: &str, id: impl Into<Id>) -> Result<Key> {
        let model = self.schema().model_by_name(model)?;
        Ok(Key::new(model.id, id))
    }

    /// Makes `document` managed; it is inserted on the next flush.
    ///
    /// A document without an identity receives one from the configured
    /// [`IdStrategy`], skipping identities already managed by this session.
    /// References set on the document count as added.
    pub fn persist(&mut self, mut document: Document) -> Result<Key> {
        let model = self.schema().model_by_name(document.model())?.id;

        let key = match document.id() {
            Some(id) => Key::new(model, id.clone()),
            None => {
                let key = loop {
                    let key = Key::new(model, self.ids.generate());
                    if self.uow.state(&key).is_none() {
                        break key;
                    }
                };
                document.set_id(key.id.clone());
                key
            }
        };

        self.uow.register_new(key.clone(), document)?;
        Ok(key)
    }

    /// Schedules a managed document for deletion on the next flush.
    ///
    /// Targets of the document's orphan-removal references are deleted with
    /// it unless they are attached elsewhere.
    pub fn remove(&mut self, key: &Key) -> Result<()> {
        self.uow.remove(key)
    }

    /// Returns the current state of a managed document, references included.
    pub fn get(&self, key: &Key) -> Result<Document> {
        if self.uow.state(key) == Some(State::Removed) {
            return Err(Error::record_not_found(format!(
                "{} is scheduled for removal",
                key.display(self.schema())
            )));
        }

        self.uow.materialize(key)
    }

    /// Sets a plain field, returning its previous value.
    pub fn set_field(
        &mut self,
        key: &Key,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        self.uow.set_field(key, field, value.into())
    }

    /// Returns the current target of a single-valued reference.
    pub fn reference(&self, owner: &Key, field: &str) -> Result<Option<Key>> {
        let target = self.schema().reference(owner.model, field)?.target;
        let single = self.uow.single(owner, field)?;
        Ok(single.current().map(|id| Key::new(target, id)))
    }

    /// Points a single-valued reference at `target`, or empties it, returning
    /// the previous target.
    pub fn set_one(&mut self, owner: &Key, field: &str, target: Option<&Key>) -> Result<Option<Key>> {
        let schema = self.schema().clone();
        let reference = schema.reference(owner.model, field)?;

        if let Some(target) = target {
            if target.model != reference.target {
                return Err(Error::invalid_reference_target(
                    format!("{}.{}", schema.model(owner.model).name, reference.name),
                    &reference.target(&schema).name,
                    &schema.model(target.model).name,
                ));
            }
        }

        let previous = self
            .uow
            .single_mut(owner, field)?
            .set(target.map(|target| target.id.clone()));

        Ok(previous.map(|id| Key::new(reference.target, id)))
    }

    /// Returns the managed collection behind a collection-valued reference.
    pub fn collection(&mut self, owner: &Key, field: &str) -> Result<&mut Collection> {
        self.uow.collection_mut(owner, field)
    }

    /// Looks up a document by identity.
    ///
    /// A managed document is returned as is, without a driver round trip; a
    /// document scheduled for removal is reported missing. Otherwise the
    /// document is loaded and becomes managed.
    pub async fn find(&mut self, model: &str, id: impl Into<Id>) -> Result<Option<Key>> {
        let key = self.key(model, id)?;

        match self.uow.state(&key) {
            Some(State::Removed) => return Ok(None),
            Some(_) => return Ok(Some(key)),
            None => {}
        }

        let op = FindById {
            model: key.model,
            id: key.id.clone(),
        };

        let Some(document) = self
            .driver
            .exec(self.uow.schema(), op.into())
            .await?
            .into_document()?
        else {
            return Ok(None);
        };

        self.uow.register_loaded(key.clone(), document)?;
        Ok(Some(key))
    }

    /// Writes every pending change through the driver.
    ///
    /// On failure nothing is marked as flushed; calling `flush` again resubmits
    /// the same changes.
    pub async fn flush(&mut self) -> Result<FlushResult> {
        engine::flush(&mut self.uow, &*self.driver).await
    }

    /// Detaches every managed document and discards pending changes.
    pub fn clear(&mut self) {
        tracing::debug!(documents = self.uow.len(), "clearing session");
        self.uow.clear();
    }

    pub fn state(&self, key: &Key) -> Option<State> {
        self.uow.state(key)
    }

    pub fn is_managed(&self, key: &Key) -> bool {
        self.state(key).is_some()
    }

    /// Number of managed documents.
    pub fn len(&self) -> usize {
        self.uow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every stored document and detaches everything managed.
    pub async fn reset_db(&mut self) -> Result<()> {
        self.driver.reset_db(self.uow.schema()).await?;
        self.uow.clear();
        Ok(())
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("driver", &self.driver)
            .field("documents", &self.uow.len())
            .finish()
    }
}
