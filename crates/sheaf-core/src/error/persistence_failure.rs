use super::Error;

/// Error when the driver rejects an operation while a flush is being submitted.
///
/// The driver's own error is attached as the cause. `acknowledged` counts the
/// operations of the same flush that the driver had already accepted.
#[derive(Debug)]
pub(super) struct PersistenceFailure {
    operation: Box<str>,
    acknowledged: usize,
}

impl std::error::Error for PersistenceFailure {}

impl core::fmt::Display for PersistenceFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "persistence failure: `{}` failed after {} acknowledged operation{}",
            self.operation,
            self.acknowledged,
            if self.acknowledged == 1 { "" } else { "s" }
        )
    }
}

impl Error {
    /// Creates a persistence failure. Attach it to the driver error with
    /// [`Error::context`].
    pub fn persistence_failure(operation: impl Into<String>, acknowledged: usize) -> Error {
        Error::from(super::ErrorKind::PersistenceFailure(PersistenceFailure {
            operation: operation.into().into(),
            acknowledged,
        }))
    }

    /// Returns `true` if this error is a persistence failure.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::PersistenceFailure(_))
    }

    /// Number of driver operations acknowledged before the failure, if this
    /// error is a persistence failure.
    pub fn acknowledged_operations(&self) -> Option<usize> {
        match self.kind() {
            super::ErrorKind::PersistenceFailure(err) => Some(err.acknowledged),
            _ => None,
        }
    }
}
