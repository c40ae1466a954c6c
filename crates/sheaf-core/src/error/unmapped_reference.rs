use super::Error;

/// Error when a field is used as a reference but the model declares no
/// reference descriptor for it.
///
/// Raised where the field is used, never deferred to flush.
#[derive(Debug)]
pub(super) struct UnmappedReference {
    model: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnmappedReference {}

impl core::fmt::Display for UnmappedReference {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unmapped reference: `{}.{}` has no reference descriptor",
            self.model, self.field
        )
    }
}

impl Error {
    /// Creates an unmapped reference error.
    pub fn unmapped_reference(model: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnmappedReference(UnmappedReference {
            model: model.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is an unmapped reference error.
    pub fn is_unmapped_reference(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnmappedReference(_))
    }
}
