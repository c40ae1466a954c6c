use super::Operation;
use crate::{schema::ModelId, stmt::Id};

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    /// Model of the deleted document
    pub model: ModelId,

    /// Identity of the deleted document
    pub id: Id,
}

impl From<Delete> for Operation {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
