use super::Error;

/// Error when a reference field is pointed at a document of the wrong model.
#[derive(Debug)]
pub(super) struct InvalidReferenceTarget {
    field: Box<str>,
    expected: Box<str>,
    actual: Box<str>,
}

impl std::error::Error for InvalidReferenceTarget {}

impl core::fmt::Display for InvalidReferenceTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid reference target: `{}` references `{}`, got `{}`",
            self.field, self.expected, self.actual
        )
    }
}

impl Error {
    /// Creates an invalid reference target error. `field` is rendered as given,
    /// typically `Model.field`.
    pub fn invalid_reference_target(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::InvalidReferenceTarget(
            InvalidReferenceTarget {
                field: field.into().into(),
                expected: expected.into().into(),
                actual: actual.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid reference target error.
    pub fn is_invalid_reference_target(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidReferenceTarget(_))
    }
}
