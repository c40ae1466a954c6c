//! Mapping metadata: the models of an application and the reference
//! descriptors declared on them.

mod builder;
pub use builder::{Builder, ModelDef, ReferenceDef};

mod model;
pub use model::{Model, ModelId};

mod reference;
pub use reference::{Cardinality, Reference, ReferenceId};

mod verify;

use crate::{Error, Result};
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    /// Get a model by name, failing with an unknown model error.
    pub fn model_by_name(&self, name: &str) -> Result<&Model> {
        self.models
            .values()
            .find(|model| model.name == name)
            .ok_or_else(|| Error::unknown_model(name))
    }

    /// Returns the reference descriptor declared for `field` on `model`.
    pub fn reference(&self, model: ModelId, field: &str) -> Result<&Reference> {
        let model = self.model(model);
        model
            .reference(field)
            .ok_or_else(|| Error::unmapped_reference(&model.name, field))
    }

    /// Get a reference descriptor by ID
    pub fn reference_by_id(&self, id: ReferenceId) -> &Reference {
        self.model(id.model)
            .references
            .get(id.index)
            .expect("invalid reference ID")
    }
}
