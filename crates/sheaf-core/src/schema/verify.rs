use super::ModelDef;
use crate::{Error, Result};
use std::collections::HashSet;

/// Rejects duplicate model names and duplicate reference names within a model.
/// Unknown reference targets are reported while resolving.
pub(super) fn definitions(models: &[ModelDef]) -> Result<()> {
    let mut model_names = HashSet::new();

    for model in models {
        if model.name().is_empty() {
            return Err(Error::invalid_schema("model name must not be empty"));
        }

        if !model_names.insert(model.name()) {
            return Err(Error::invalid_schema(format!(
                "duplicate model `{}`",
                model.name()
            )));
        }

        let mut field_names = HashSet::new();
        for reference in model.references() {
            if !field_names.insert(reference.name()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate reference `{}.{}`",
                    model.name(),
                    reference.name()
                )));
            }
        }
    }

    Ok(())
}
