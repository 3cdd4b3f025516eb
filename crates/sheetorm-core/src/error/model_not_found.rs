use super::Error;

/// Error raised by "find or fail" lookups.
#[derive(Debug)]
pub(super) struct ModelNotFound {
    model: Box<str>,
    id: Box<str>,
}

impl std::error::Error for ModelNotFound {}

impl core::fmt::Display for ModelNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} with id {} not found", self.model, self.id)
    }
}

impl Error {
    /// Creates a not-found error for `model` with the requested identifier.
    pub fn model_not_found(model: impl Into<String>, id: impl core::fmt::Display) -> Error {
        Error::from(super::ErrorKind::ModelNotFound(ModelNotFound {
            model: model.into().into(),
            id: id.to_string().into(),
        }))
    }

    /// Returns `true` if this error is a not-found error.
    pub fn is_model_not_found(&self) -> bool {
        self.find_kind(|kind| matches!(kind, super::ErrorKind::ModelNotFound(_)).then_some(()))
            .is_some()
    }
}
