use sheaf_core::{schema::ModelId, stmt::Id, Schema};
use std::fmt;

/// Identifies a document within a unit of work: its model and its identity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub(crate) model: ModelId,
    pub(crate) id: Id,
}

impl Key {
    pub(crate) fn new(model: ModelId, id: impl Into<Id>) -> Self {
        Self {
            model,
            id: id.into(),
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Renders the key as `Model(id)` using the schema's model names.
    pub(crate) fn display<'a>(&'a self, schema: &'a Schema) -> impl fmt::Display + 'a {
        DisplayKey { key: self, schema }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({}/{})", self.model.0, self.id)
    }
}

struct DisplayKey<'a> {
    key: &'a Key,
    schema: &'a Schema,
}

impl fmt::Display for DisplayKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.schema.model(self.key.model).name, self.key.id)
    }
}
