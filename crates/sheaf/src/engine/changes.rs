use super::{Registry, Slot, State, Tracker};
use crate::Key;

use indexmap::IndexSet;
use sheaf_core::{schema::ReferenceId, stmt::Id, Schema};

/// Everything a flush has to write, derived from the unit of work without
/// mutating it.
#[derive(Debug, Default, PartialEq)]
pub(super) struct ChangeSet {
    /// Documents persisted since the last flush
    pub(super) inserts: Vec<Key>,

    /// Managed documents whose fields or references changed, with the names
    /// of the changed fields
    pub(super) updates: Vec<(Key, Vec<String>)>,

    /// Documents explicitly removed by the application
    pub(super) removals: Vec<Key>,

    /// Reference edges that changed, in owner then declaration order
    pub(super) references: Vec<ReferenceChange>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum ReferenceChange {
    /// A single-valued reference now points elsewhere; either side may be
    /// empty.
    Replaced {
        owner: Key,
        reference: ReferenceId,
        old: Option<Id>,
        new: Option<Id>,
    },

    /// Elements added to a collection since its baseline
    Added {
        owner: Key,
        reference: ReferenceId,
        ids: Vec<Id>,
    },

    /// Baseline elements no longer in a collection
    Removed {
        owner: Key,
        reference: ReferenceId,
        ids: Vec<Id>,
    },
}

impl ChangeSet {
    pub(super) fn is_empty(&self) -> bool {
        self.inserts.is_empty()
            && self.updates.is_empty()
            && self.removals.is_empty()
            && self.references.is_empty()
    }
}

/// Computes the change set of the unit of work.
///
/// Owners are visited in registration order and references in declaration
/// order, so the same unit of work always yields the same change set.
///
/// Managed documents in `orphaned` are about to be deleted as orphans. They
/// are handled like removed owners, except that they are not listed in
/// `removals`.
pub(super) fn compute(
    schema: &Schema,
    registry: &Registry,
    tracker: &Tracker,
    orphaned: &IndexSet<Key>,
) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (key, entry) in registry.iter() {
        let model = schema.model(key.model);
        let slots = model.references.iter().zip(tracker.slots(key));

        if entry.state == State::Removed || orphaned.contains(key) {
            // The owner goes away: every baseline target is detached.
            for (reference, slot) in slots {
                match slot {
                    Slot::One(single) => {
                        if let Some(old) = single.baseline() {
                            changes.references.push(ReferenceChange::Replaced {
                                owner: key.clone(),
                                reference: reference.id,
                                old: Some(old.clone()),
                                new: None,
                            });
                        }
                    }
                    Slot::Many(collection) => {
                        let ids: Vec<Id> = collection.baseline().cloned().collect();
                        if !ids.is_empty() {
                            changes.references.push(ReferenceChange::Removed {
                                owner: key.clone(),
                                reference: reference.id,
                                ids,
                            });
                        }
                    }
                }
            }

            if entry.state == State::Removed {
                changes.removals.push(key.clone());
            }
            continue;
        }

        let mut changed = entry.changed_fields();

        for (reference, slot) in slots {
            match slot {
                Slot::One(single) if single.is_dirty() => {
                    changes.references.push(ReferenceChange::Replaced {
                        owner: key.clone(),
                        reference: reference.id,
                        old: single.baseline().cloned(),
                        new: single.current().cloned(),
                    });
                    changed.push(reference.name.clone());
                }
                Slot::One(_) => {}
                Slot::Many(collection) => {
                    let diff = collection.diff();

                    if diff.added.is_empty() && diff.removed.is_empty() {
                        continue;
                    }

                    if !diff.removed.is_empty() {
                        changes.references.push(ReferenceChange::Removed {
                            owner: key.clone(),
                            reference: reference.id,
                            ids: diff.removed,
                        });
                    }

                    if !diff.added.is_empty() {
                        changes.references.push(ReferenceChange::Added {
                            owner: key.clone(),
                            reference: reference.id,
                            ids: diff.added,
                        });
                    }

                    changed.push(reference.name.clone());
                }
            }
        }

        match entry.state {
            State::New => changes.inserts.push(key.clone()),
            State::Managed if !changed.is_empty() => changes.updates.push((key.clone(), changed)),
            _ => {}
        }
    }

    changes
}
