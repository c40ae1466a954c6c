use super::{verify, Cardinality, Model, ModelId, Reference, Schema};
use crate::{Error, Result};

/// Collects model definitions and resolves them into a [`Schema`].
#[derive(Debug, Default, Clone)]
pub struct Builder {
    models: Vec<ModelDef>,
}

/// A model definition before target names are resolved to model IDs.
#[derive(Debug, Clone)]
pub struct ModelDef {
    name: String,
    references: Vec<ReferenceDef>,
}

/// A reference field definition.
#[derive(Debug, Clone)]
pub struct ReferenceDef {
    name: String,
    target: String,
    cardinality: Cardinality,
    orphan_removal: bool,
}

impl Builder {
    pub fn model(&mut self, model: ModelDef) -> &mut Self {
        self.models.push(model);
        self
    }

    pub fn build(&self) -> Result<Schema> {
        verify::definitions(&self.models)?;

        let mut schema = Schema::default();

        for (index, def) in self.models.iter().enumerate() {
            let id = ModelId(index);
            let references = def
                .references
                .iter()
                .enumerate()
                .map(|(reference_index, reference)| {
                    Ok(Reference {
                        id: id.reference(reference_index),
                        name: reference.name.clone(),
                        target: self.resolve_target(def, reference)?,
                        cardinality: reference.cardinality,
                        orphan_removal: reference.orphan_removal,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            schema.models.insert(
                id,
                Model {
                    id,
                    name: def.name.clone(),
                    references,
                },
            );
        }

        Ok(schema)
    }

    fn resolve_target(&self, owner: &ModelDef, reference: &ReferenceDef) -> Result<ModelId> {
        self.models
            .iter()
            .position(|model| model.name == reference.target)
            .map(ModelId)
            .ok_or_else(|| {
                Error::invalid_schema(format!(
                    "`{}.{}` references unknown model `{}`",
                    owner.name, reference.name, reference.target
                ))
            })
    }
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            references: vec![],
        }
    }

    pub fn reference(mut self, reference: ReferenceDef) -> Self {
        self.references.push(reference);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(super) fn references(&self) -> &[ReferenceDef] {
        &self.references
    }
}

impl ReferenceDef {
    /// A single-valued reference to `target`.
    pub fn one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, target, Cardinality::One)
    }

    /// A collection-valued reference to `target`.
    pub fn many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, target, Cardinality::Many)
    }

    fn new(name: impl Into<String>, target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            cardinality,
            orphan_removal: false,
        }
    }

    /// Delete targets detached from this field on flush.
    pub fn orphan_removal(mut self) -> Self {
        self.orphan_removal = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
