use crate::Key;

use indexmap::IndexSet;
use sheaf_core::{schema::ReferenceId, stmt::Id, Error, Result, Schema};

use std::{fmt, sync::Arc};

/// A collection-valued reference managed by the unit of work.
///
/// Besides the current ordered elements, the collection remembers its state as
/// of the last flush (the baseline) and which elements were inserted into or
/// removed from it since. The flush diff is computed from this bookkeeping, so
/// `clear()` followed by `add()` yields "baseline removed, new element added"
/// rather than a blind replacement, and removing then re-adding an element is
/// no change at all.
#[derive(Clone)]
pub struct Collection {
    schema: Arc<Schema>,
    reference: ReferenceId,

    /// Elements as of the last flush or load
    baseline: IndexSet<Id>,

    /// Current elements, in insertion order
    items: IndexSet<Id>,

    /// Current elements that are not part of the baseline
    inserted: IndexSet<Id>,

    /// Baseline elements that are no longer present
    removed: IndexSet<Id>,
}

/// Net change of a collection relative to its baseline.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct CollectionDiff {
    pub(crate) added: Vec<Id>,
    pub(crate) removed: Vec<Id>,
}

impl Collection {
    /// A collection loaded from the store: the baseline is its content.
    pub(crate) fn loaded(schema: Arc<Schema>, reference: ReferenceId, ids: Vec<Id>) -> Self {
        let items: IndexSet<Id> = ids.into_iter().collect();
        Self {
            schema,
            reference,
            baseline: items.clone(),
            items,
            inserted: IndexSet::new(),
            removed: IndexSet::new(),
        }
    }

    /// A collection on a new document: the baseline is empty and every element
    /// counts as inserted.
    pub(crate) fn unsaved(schema: Arc<Schema>, reference: ReferenceId, ids: Vec<Id>) -> Self {
        let items: IndexSet<Id> = ids.into_iter().collect();
        Self {
            schema,
            reference,
            baseline: IndexSet::new(),
            inserted: items.clone(),
            items,
            removed: IndexSet::new(),
        }
    }

    /// Adds `target` at the end of the collection.
    ///
    /// Returns `false` if it was already present. Adding back an element that
    /// was removed since the last flush restores it.
    pub fn add(&mut self, target: &Key) -> Result<bool> {
        let reference = self.schema.reference_by_id(self.reference);
        if target.model != reference.target {
            let owner = self.schema.model(self.reference.model);
            return Err(Error::invalid_reference_target(
                format!("{}.{}", owner.name, reference.name),
                &reference.target(&self.schema).name,
                &self.schema.model(target.model).name,
            ));
        }

        if !self.items.insert(target.id.clone()) {
            return Ok(false);
        }

        if !self.removed.shift_remove(&target.id) {
            self.inserted.insert(target.id.clone());
        }

        Ok(true)
    }

    /// Removes `target` from the collection, returning `false` if it was not
    /// present.
    pub fn remove_element(&mut self, target: &Key) -> bool {
        if target.model != self.schema.reference_by_id(self.reference).target {
            return false;
        }

        if !self.items.shift_remove(&target.id) {
            return false;
        }

        if !self.inserted.shift_remove(&target.id) {
            self.removed.insert(target.id.clone());
        }

        true
    }

    /// Removes every element. Every baseline element is now removed; anything
    /// inserted since the baseline is forgotten.
    pub fn clear(&mut self) {
        self.items.clear();
        self.inserted.clear();
        self.removed = self.baseline.clone();
    }

    pub fn contains(&self, target: &Key) -> bool {
        target.model == self.schema.reference_by_id(self.reference).target
            && self.items.contains(&target.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &Id> + '_ {
        self.items.iter()
    }

    /// Elements added since the last flush.
    pub fn inserted(&self) -> impl Iterator<Item = &Id> + '_ {
        self.inserted.iter()
    }

    /// Baseline elements removed since the last flush.
    pub fn removed(&self) -> impl Iterator<Item = &Id> + '_ {
        self.removed.iter()
    }

    /// Returns `true` if the collection differs from its baseline.
    pub fn is_dirty(&self) -> bool {
        !self.inserted.is_empty() || !self.removed.is_empty()
    }

    /// `Removed = baseline − (current − inserted)`, `Added = inserted`.
    pub(crate) fn diff(&self) -> CollectionDiff {
        let removed: Vec<Id> = self
            .baseline
            .iter()
            .filter(|id| !self.items.contains(*id) || self.inserted.contains(*id))
            .cloned()
            .collect();

        debug_assert!(
            removed.len() == self.removed.len()
                && removed.iter().all(|id| self.removed.contains(id)),
            "collection bookkeeping out of sync; baseline={:?} removed={:?}",
            self.baseline,
            self.removed
        );

        CollectionDiff {
            added: self.inserted.iter().cloned().collect(),
            removed,
        }
    }

    /// Elements as of the last flush.
    pub(crate) fn baseline(&self) -> impl Iterator<Item = &Id> + '_ {
        self.baseline.iter()
    }

    /// Makes the current content the new baseline.
    pub(crate) fn commit(&mut self) {
        self.baseline = self.items.clone();
        self.inserted.clear();
        self.removed.clear();
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("reference", &self.reference)
            .field("items", &self.items)
            .field("inserted", &self.inserted)
            .field("removed", &self.removed)
            .finish()
    }
}
