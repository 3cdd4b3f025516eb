use super::Error;

/// Error when an operation is not valid for the current entity or model state.
#[derive(Debug)]
pub(super) struct InvalidOperation {
    message: Box<str>,
}

impl std::error::Error for InvalidOperation {}

impl core::fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid operation: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid operation error, e.g. restoring a model without soft
    /// deletes or saving a removed entity.
    pub fn invalid_operation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidOperation(InvalidOperation {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid operation error.
    pub fn is_invalid_operation(&self) -> bool {
        self.find_kind(|kind| matches!(kind, super::ErrorKind::InvalidOperation(_)).then_some(()))
            .is_some()
    }
}
