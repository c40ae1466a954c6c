use super::Error;
use crate::stmt::Id;

/// Error when two distinct in-memory instances claim the same identity within
/// one unit of work.
///
/// This is a configuration error: the unit of work cannot know which instance
/// is authoritative, so it refuses the second one.
#[derive(Debug)]
pub(super) struct IdentityConflict {
    model: Box<str>,
    id: Id,
}

impl std::error::Error for IdentityConflict {}

impl core::fmt::Display for IdentityConflict {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "identity conflict: another instance of `{}` is already managed with id `{}`",
            self.model, self.id
        )
    }
}

impl Error {
    /// Creates an identity conflict error.
    pub fn identity_conflict(model: impl Into<String>, id: &Id) -> Error {
        Error::from(super::ErrorKind::IdentityConflict(IdentityConflict {
            model: model.into().into(),
            id: id.clone(),
        }))
    }

    /// Returns `true` if this error is an identity conflict.
    pub fn is_identity_conflict(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IdentityConflict(_))
    }
}
