mod delete;
pub use delete::Delete;

mod find_by_id;
pub use find_by_id::FindById;

mod insert;
pub use insert::Insert;

mod update;
pub use update::Update;

use crate::schema::Schema;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Store a new document
    Insert(Insert),

    /// Rewrite a stored document, naming the fields that changed
    Update(Update),

    /// Delete a document by identity
    Delete(Delete),

    /// Load a document by identity
    FindById(FindById),
}

impl Operation {
    pub fn is_insert(&self) -> bool {
        matches!(self, Operation::Insert(_))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Operation::Update(_))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Operation::Delete(_))
    }

    pub fn is_find_by_id(&self) -> bool {
        matches!(self, Operation::FindById(_))
    }

    /// Returns `true` if the operation writes to the store.
    pub fn is_write(&self) -> bool {
        !self.is_find_by_id()
    }

    /// Short human-readable description, e.g. `delete Profile(4f1c…)`.
    pub fn describe(&self, schema: &Schema) -> String {
        let (verb, model, id) = match self {
            Operation::Insert(op) => ("insert", op.model, op.document.id().map(ToString::to_string)),
            Operation::Update(op) => ("update", op.model, op.document.id().map(ToString::to_string)),
            Operation::Delete(op) => ("delete", op.model, Some(op.id.to_string())),
            Operation::FindById(op) => ("find", op.model, Some(op.id.to_string())),
        };

        format!(
            "{verb} {}({})",
            schema.model(model).name,
            id.as_deref().unwrap_or("?")
        )
    }
}
