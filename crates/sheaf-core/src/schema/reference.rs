use super::{Model, ModelId, Schema};
use std::fmt;

/// Describes one reference field: where it points, how many targets it holds,
/// and whether detached targets are deleted.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Uniquely identifies the reference within the schema.
    pub id: ReferenceId,

    /// Field name on the owning document
    pub name: String,

    /// Referenced model
    pub target: ModelId,

    pub cardinality: Cardinality,

    /// When set, a target detached from this field is deleted on flush.
    pub orphan_removal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceId {
    pub model: ModelId,
    pub index: usize,
}

impl Reference {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    pub fn is_one(&self) -> bool {
        self.cardinality == Cardinality::One
    }

    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}

impl fmt::Debug for ReferenceId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ReferenceId({}/{})", self.model.0, self.index)
    }
}
