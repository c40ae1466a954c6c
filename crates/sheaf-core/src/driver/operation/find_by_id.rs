use super::Operation;
use crate::{schema::ModelId, stmt::Id};

#[derive(Debug, Clone, PartialEq)]
pub struct FindById {
    pub model: ModelId,
    pub id: Id,
}

impl From<FindById> for Operation {
    fn from(value: FindById) -> Self {
        Self::FindById(value)
    }
}
