use super::{Id, Value};
use indexmap::IndexMap;

/// A document: model name, optional identity, and named field values.
///
/// Documents without an identity are new; the unit of work assigns one when
/// they are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    model: String,
    id: Option<Id>,
    fields: IndexMap<String, Value>,
}

impl Document {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            id: None,
            fields: IndexMap::new(),
        }
    }

    /// Sets a pre-existing identity.
    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets a field value, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a single-valued reference, builder style.
    pub fn with_reference(self, field: impl Into<String>, target: &Id) -> Self {
        self.with(field, Value::Ref(target.clone()))
    }

    /// Sets a collection-valued reference, builder style.
    pub fn with_references<'a>(
        self,
        field: impl Into<String>,
        targets: impl IntoIterator<Item = &'a Id>,
    ) -> Self {
        self.with(field, Value::ref_list(targets))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: Id) {
        self.id = Some(id);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Sets a field value, returning the previous one.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}
