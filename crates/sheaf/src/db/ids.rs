use sheaf_core::stmt::Id;

/// How [`Db::persist`](super::Db::persist) assigns an identity to a document
/// that does not carry one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// Random v4 UUIDs, rendered without hyphens
    #[default]
    Uuid,

    /// `1`, `2`, `3`, ... per session. Deterministic; meant for tests.
    ///
    /// The counter starts over in every session and only skips identities
    /// the session manages. Since inserts are upserts, a generated identity
    /// can overwrite a document stored by an earlier session.
    Sequential,
}

#[derive(Debug)]
pub(crate) struct Ids {
    strategy: IdStrategy,
    next: u64,
}

impl Ids {
    pub(crate) fn new(strategy: IdStrategy) -> Self {
        Self { strategy, next: 1 }
    }

    pub(crate) fn generate(&mut self) -> Id {
        match self.strategy {
            IdStrategy::Uuid => Id::new_v4(),
            IdStrategy::Sequential => {
                let id = self.next;
                self.next += 1;
                Id::from(id.to_string())
            }
        }
    }
}
