use super::Error;

/// Error when a schema or model definition is invalid.
///
/// This occurs when:
/// - A schema or model definition declares more than one primary column
/// - A table is registered twice
/// - A model definition names a table with no registered schema
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.find_kind(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)).then_some(()))
            .is_some()
    }
}
