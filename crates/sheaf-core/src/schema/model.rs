use super::{Reference, ReferenceId};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: String,

    /// Reference fields declared by the model, in declaration order
    pub references: Vec<Reference>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn reference(&self, name: &str) -> Option<&Reference> {
        self.references.iter().find(|reference| reference.name == name)
    }

    /// Returns `true` if any reference of this model removes orphans.
    pub fn has_orphan_removal(&self) -> bool {
        self.references.iter().any(|reference| reference.orphan_removal)
    }
}

impl ModelId {
    /// Create a `ReferenceId` representing the current model's reference at index `index`.
    pub const fn reference(self, index: usize) -> ReferenceId {
        ReferenceId { model: self, index }
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
