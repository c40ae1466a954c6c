//! The unit of work: the documents a session manages and the machinery that
//! turns their in-memory changes into driver operations.

mod changes;
mod flush;
pub use flush::FlushResult;
pub(crate) use flush::flush;

mod orphan;

mod registry;
pub use registry::State;
use registry::{Entry, Registry};

mod tracker;
use tracker::{Single, Slot, Tracker};

use crate::{Collection, Key};

use sheaf_core::{
    err,
    schema::{Cardinality, Model},
    stmt::{Document, Id, Value},
    Error, Result, Schema,
};

use std::sync::Arc;

pub(crate) struct UnitOfWork {
    schema: Arc<Schema>,
    registry: Registry,
    tracker: Tracker,
}

/// Reference values pulled out of a document, one entry per reference of the
/// model in declaration order. Single references hold zero or one identity.
type References = Vec<Vec<Id>>;

impl UnitOfWork {
    pub(crate) fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            registry: Registry::default(),
            tracker: Tracker::default(),
        }
    }

    pub(crate) fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Registers a document persisted by the application.
    ///
    /// Persisting a document equal to the managed instance with the same key is
    /// a no-op, and revives it if it was scheduled for removal. Any other
    /// document claiming a managed key is an identity conflict.
    pub(crate) fn register_new(&mut self, key: Key, document: Document) -> Result<()> {
        let model = self.schema.model(key.model);
        let (fields, references) = split(model, document)?;

        if let Some(entry) = self.registry.get_mut(&key) {
            if entry.document != fields || !self.tracker.current_matches(&key, &references) {
                return Err(Error::identity_conflict(&model.name, &key.id));
            }

            if entry.state == State::Removed {
                entry.state = State::Managed;
            }

            return Ok(());
        }

        let slots = model
            .references
            .iter()
            .zip(references)
            .map(|(reference, ids)| match reference.cardinality {
                Cardinality::One => Slot::One(Single::unsaved(ids.into_iter().next())),
                Cardinality::Many => Slot::Many(Collection::unsaved(
                    self.schema.clone(),
                    reference.id,
                    ids,
                )),
            })
            .collect();

        self.registry.insert(key.clone(), Entry::new(fields));
        self.tracker.track(key, slots);
        Ok(())
    }

    /// Registers a document loaded from the driver. Its current state is its
    /// baseline. An already managed key is left untouched.
    pub(crate) fn register_loaded(&mut self, key: Key, document: Document) -> Result<()> {
        if self.registry.contains(&key) {
            return Ok(());
        }

        let model = self.schema.model(key.model);
        let (fields, references) = split(model, document)?;

        let slots = model
            .references
            .iter()
            .zip(references)
            .map(|(reference, ids)| match reference.cardinality {
                Cardinality::One => Slot::One(Single::loaded(ids.into_iter().next())),
                Cardinality::Many => Slot::Many(Collection::loaded(
                    self.schema.clone(),
                    reference.id,
                    ids,
                )),
            })
            .collect();

        self.registry.insert(key.clone(), Entry::loaded(fields));
        self.tracker.track(key, slots);
        Ok(())
    }

    /// Schedules a managed document for deletion. A document that was never
    /// flushed is simply forgotten.
    pub(crate) fn remove(&mut self, key: &Key) -> Result<()> {
        let Some(state) = self.state(key) else {
            return Err(self.not_managed(key));
        };

        match state {
            State::New => self.forget(key),
            State::Managed => self.registry.set_state(key, State::Removed),
            State::Removed => {}
        }

        Ok(())
    }

    pub(crate) fn state(&self, key: &Key) -> Option<State> {
        self.registry.get(key).map(|entry| entry.state)
    }

    pub(crate) fn set_field(&mut self, key: &Key, field: &str, value: Value) -> Result<Option<Value>> {
        let model = self.schema.model(key.model);

        if model.reference(field).is_some() {
            return Err(err!(
                "`{}.{field}` is a reference; use `Db::set_one` or `Db::collection`",
                model.name
            ));
        }

        if value.is_reference() {
            return Err(Error::unmapped_reference(&model.name, field));
        }

        let Some(entry) = self.registry.get_mut(key) else {
            return Err(not_managed(&self.schema, key));
        };

        Ok(entry.document.set(field, value))
    }

    pub(crate) fn single_mut(&mut self, owner: &Key, field: &str) -> Result<&mut Single> {
        let model = self.schema.model(owner.model);
        let reference = self.schema.reference(owner.model, field)?;

        if !reference.is_one() {
            return Err(err!(
                "`{}.{field}` is a collection reference; use `Db::collection`",
                model.name
            ));
        }

        let index = reference.id.index;
        match self.tracker.slot_mut(owner, index) {
            Some(Slot::One(single)) => Ok(single),
            _ => Err(not_managed(&self.schema, owner)),
        }
    }

    pub(crate) fn single(&self, owner: &Key, field: &str) -> Result<&Single> {
        let reference = self.schema.reference(owner.model, field)?;

        match self.tracker.slot(owner, reference.id.index) {
            Some(Slot::One(single)) => Ok(single),
            Some(Slot::Many(_)) => Err(err!(
                "`{}.{field}` is a collection reference; use `Db::collection`",
                self.schema.model(owner.model).name
            )),
            None => Err(self.not_managed(owner)),
        }
    }

    pub(crate) fn collection_mut(&mut self, owner: &Key, field: &str) -> Result<&mut Collection> {
        let model = self.schema.model(owner.model);
        let reference = self.schema.reference(owner.model, field)?;

        if !reference.is_many() {
            return Err(err!(
                "`{}.{field}` is a single reference; use `Db::set_one`",
                model.name
            ));
        }

        let index = reference.id.index;
        match self.tracker.slot_mut(owner, index) {
            Some(Slot::Many(collection)) => Ok(collection),
            _ => Err(not_managed(&self.schema, owner)),
        }
    }

    /// Rebuilds the full document for `key`: its identity, its fields, then its
    /// references in declaration order.
    pub(crate) fn materialize(&self, key: &Key) -> Result<Document> {
        let Some(entry) = self.registry.get(key) else {
            return Err(self.not_managed(key));
        };

        let model = self.schema.model(key.model);
        let mut document = entry.document.clone();
        document.set_id(key.id.clone());

        for (reference, slot) in model.references.iter().zip(self.tracker.slots(key)) {
            let value = match slot {
                Slot::One(single) => Value::from(single.current().cloned()),
                Slot::Many(collection) => Value::ref_list(collection.iter()),
            };
            document.set(reference.name.clone(), value);
        }

        Ok(document)
    }

    /// Makes the current state of `key` its new baseline.
    pub(crate) fn commit(&mut self, key: &Key) {
        self.registry.commit(key);
        self.tracker.commit(key);
    }

    pub(crate) fn forget(&mut self, key: &Key) {
        self.registry.forget(key);
        self.tracker.forget(key);
    }

    /// Detaches every document.
    pub(crate) fn clear(&mut self) {
        self.registry.clear();
        self.tracker.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.len()
    }

    fn not_managed(&self, key: &Key) -> Error {
        not_managed(&self.schema, key)
    }
}

fn not_managed(schema: &Schema, key: &Key) -> Error {
    Error::record_not_found(format!("{} is not managed", key.display(schema)))
}

/// Separates a document's reference values from its plain fields.
///
/// A reference-valued field without a descriptor is an unmapped reference.
fn split(model: &Model, mut document: Document) -> Result<(Document, References)> {
    let mut references = Vec::with_capacity(model.references.len());

    for reference in &model.references {
        let value = document.remove(&reference.name).unwrap_or_default();

        let ids = match (reference.cardinality, value) {
            (_, Value::Null) => vec![],
            (Cardinality::One, Value::Ref(id)) => vec![id],
            (Cardinality::Many, Value::List(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Ref(id) => Ok(id),
                    other => Err(err!(
                        "`{}.{}` holds a non-reference element: {other:?}",
                        model.name,
                        reference.name
                    )),
                })
                .collect::<Result<_>>()?,
            (cardinality, other) => {
                return Err(err!(
                    "`{}.{}` expects {}, got {other:?}",
                    model.name,
                    reference.name,
                    match cardinality {
                        Cardinality::One => "a reference",
                        Cardinality::Many => "a list of references",
                    }
                ))
            }
        };

        references.push(ids);
    }

    if let Some((name, _)) = document.fields().find(|(_, value)| value.is_reference()) {
        return Err(Error::unmapped_reference(&model.name, name));
    }

    Ok((document, references))
}
