use super::Operation;
use crate::{schema::ModelId, stmt::Document};

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Model of the updated document
    pub model: ModelId,

    /// Full current state of the document
    pub document: Document,

    /// Names of the fields that differ from the stored state. A field that was
    /// removed from the document is listed and absent from `document`.
    pub changed: Vec<String>,
}

impl From<Update> for Operation {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
