use crate::Key;

use indexmap::IndexMap;
use sheaf_core::stmt::Document;

/// Lifecycle state of a managed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Persisted by the application, not yet flushed
    New,

    /// Flushed or loaded; changes are diffed against the baseline
    Managed,

    /// Scheduled for deletion on the next flush
    Removed,
}

/// The documents managed by a unit of work, in registration order.
#[derive(Debug, Default)]
pub(super) struct Registry {
    entries: IndexMap<Key, Entry>,
}

#[derive(Debug)]
pub(super) struct Entry {
    /// Current plain fields. Reference fields are held by the tracker.
    pub(super) document: Document,

    /// Plain fields as of the last flush or load; `None` until first flushed.
    pub(super) original: Option<Document>,

    pub(super) state: State,
}

impl Registry {
    pub(super) fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub(super) fn get(&self, key: &Key) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub(super) fn get_mut(&mut self, key: &Key) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    pub(super) fn insert(&mut self, key: Key, entry: Entry) {
        tracing::trace!(?key, state = ?entry.state, "registering document");
        let prev = self.entries.insert(key, entry);
        debug_assert!(prev.is_none(), "document registered twice");
    }

    pub(super) fn set_state(&mut self, key: &Key, state: State) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.state = state;
        }
    }

    /// Makes the current fields the baseline and promotes new documents.
    pub(super) fn commit(&mut self, key: &Key) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.original = Some(entry.document.clone());
            if entry.state == State::New {
                entry.state = State::Managed;
            }
        }
    }

    pub(super) fn forget(&mut self, key: &Key) -> Option<Entry> {
        tracing::trace!(?key, "forgetting document");
        self.entries.shift_remove(key)
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in registration order.
    pub(super) fn iter(&self) -> impl Iterator<Item = (&Key, &Entry)> + '_ {
        self.entries.iter()
    }
}

impl Entry {
    /// A document persisted by the application: zero baseline.
    pub(super) fn new(document: Document) -> Self {
        Self {
            document,
            original: None,
            state: State::New,
        }
    }

    /// A document loaded from the store: its current state is the baseline.
    pub(super) fn loaded(document: Document) -> Self {
        Self {
            original: Some(document.clone()),
            document,
            state: State::Managed,
        }
    }

    /// Names of plain fields that differ from the baseline, in current field
    /// order followed by fields that were removed.
    pub(super) fn changed_fields(&self) -> Vec<String> {
        let current = self.document.fields();

        let Some(original) = &self.original else {
            return current.map(|(name, _)| name.to_string()).collect();
        };

        let mut changed: Vec<String> = current
            .filter(|(name, value)| original.get(name) != Some(*value))
            .map(|(name, _)| name.to_string())
            .collect();

        changed.extend(
            original
                .fields()
                .filter(|(name, _)| self.document.get(name).is_none())
                .map(|(name, _)| name.to_string()),
        );

        changed
    }
}
