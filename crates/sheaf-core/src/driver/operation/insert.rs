use super::Operation;
use crate::{schema::ModelId, stmt::Document};

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Model of the inserted document
    pub model: ModelId,

    /// Full document, identity set, references encoded as `Value::Ref`
    pub document: Document,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
