use super::Error;

/// Error when a caller-supplied argument is out of range.
#[derive(Debug)]
pub(super) struct InvalidArgument {
    message: Box<str>,
}

impl std::error::Error for InvalidArgument {}

impl core::fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidArgument(InvalidArgument {
            message: message.into().into(),
        }))
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.find_kind(|kind| matches!(kind, super::ErrorKind::InvalidArgument(_)).then_some(()))
            .is_some()
    }
}
