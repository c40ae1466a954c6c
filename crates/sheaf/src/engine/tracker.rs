use crate::{Collection, Key};

use indexmap::IndexMap;
use sheaf_core::stmt::Id;

/// Reference state of every managed owner: one slot per reference declared by
/// the owner's model, in declaration order.
#[derive(Debug, Default)]
pub(super) struct Tracker {
    owners: IndexMap<Key, Vec<Slot>>,
}

#[derive(Debug)]
pub(super) enum Slot {
    One(Single),
    Many(Collection),
}

/// A single-valued reference with its baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Single {
    baseline: Option<Id>,
    current: Option<Id>,
}

impl Tracker {
    pub(super) fn track(&mut self, owner: Key, slots: Vec<Slot>) {
        self.owners.insert(owner, slots);
    }

    pub(super) fn slots(&self, owner: &Key) -> &[Slot] {
        self.owners.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(super) fn slot(&self, owner: &Key, index: usize) -> Option<&Slot> {
        self.owners.get(owner)?.get(index)
    }

    pub(super) fn slot_mut(&mut self, owner: &Key, index: usize) -> Option<&mut Slot> {
        self.owners.get_mut(owner)?.get_mut(index)
    }

    /// Returns `true` if the current references of `owner` are exactly
    /// `references`.
    pub(super) fn current_matches(&self, owner: &Key, references: &[Vec<Id>]) -> bool {
        let slots = self.slots(owner);

        slots.len() == references.len()
            && slots.iter().zip(references).all(|(slot, ids)| match slot {
                Slot::One(single) => single.current.iter().eq(ids.iter()),
                Slot::Many(collection) => collection.iter().eq(ids.iter()),
            })
    }

    pub(super) fn commit(&mut self, owner: &Key) {
        for slot in self.owners.get_mut(owner).into_iter().flatten() {
            match slot {
                Slot::One(single) => single.commit(),
                Slot::Many(collection) => collection.commit(),
            }
        }
    }

    pub(super) fn forget(&mut self, owner: &Key) {
        self.owners.shift_remove(owner);
    }

    pub(super) fn clear(&mut self) {
        self.owners.clear();
    }
}

impl Single {
    pub(super) fn unsaved(current: Option<Id>) -> Self {
        Self {
            baseline: None,
            current,
        }
    }

    pub(super) fn loaded(current: Option<Id>) -> Self {
        Self {
            baseline: current.clone(),
            current,
        }
    }

    pub(crate) fn current(&self) -> Option<&Id> {
        self.current.as_ref()
    }

    pub(super) fn baseline(&self) -> Option<&Id> {
        self.baseline.as_ref()
    }

    /// Points the reference at `target`, returning the previous target.
    pub(crate) fn set(&mut self, target: Option<Id>) -> Option<Id> {
        std::mem::replace(&mut self.current, target)
    }

    pub(super) fn is_dirty(&self) -> bool {
        self.baseline != self.current
    }

    fn commit(&mut self) {
        self.baseline = self.current.clone();
    }
}
