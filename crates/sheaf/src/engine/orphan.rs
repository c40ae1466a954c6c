use super::changes::{ChangeSet, ReferenceChange};
use crate::Key;

use indexmap::IndexSet;
use sheaf_core::Schema;

use std::collections::HashSet;

/// Returns the documents to delete as orphans, in the order they were
/// detached.
///
/// A target is an orphan when a reference with orphan removal let go of it
/// and no reference in the same change set picked it up again. Only edges
/// visible in the change set count: a target still referenced by a document
/// outside the unit of work is deleted all the same.
pub(super) fn schedule(schema: &Schema, changes: &ChangeSet) -> IndexSet<Key> {
    let mut detached = IndexSet::new();
    let mut attached = HashSet::new();

    for change in &changes.references {
        match change {
            ReferenceChange::Replaced {
                reference, old, new, ..
            } => {
                let reference = schema.reference_by_id(*reference);

                if let Some(new) = new {
                    attached.insert(Key::new(reference.target, new));
                }

                if let (true, Some(old)) = (reference.orphan_removal, old) {
                    detached.insert(Key::new(reference.target, old));
                }
            }
            ReferenceChange::Added { reference, ids, .. } => {
                let reference = schema.reference_by_id(*reference);
                attached.extend(ids.iter().map(|id| Key::new(reference.target, id)));
            }
            ReferenceChange::Removed { reference, ids, .. } => {
                let reference = schema.reference_by_id(*reference);

                if reference.orphan_removal {
                    detached.extend(ids.iter().map(|id| Key::new(reference.target, id)));
                }
            }
        }
    }

    detached.retain(|key| !attached.contains(key));
    detached
}
