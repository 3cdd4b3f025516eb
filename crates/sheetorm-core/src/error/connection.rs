use super::Error;

/// Error when the remote store cannot be reached.
///
/// Connection failures are transient from the caller's point of view. The
/// core never retries them.
#[derive(Debug)]
pub(super) struct ConnectionError {
    message: Box<str>,
}

impl std::error::Error for ConnectionError {}

impl core::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "connection failed: {}", self.message)
    }
}

impl Error {
    /// Creates a connectivity error.
    pub fn connection(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Connection(ConnectionError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error in its cause chain, is a
    /// connectivity error.
    pub fn is_connection(&self) -> bool {
        self.find_kind(|kind| matches!(kind, super::ErrorKind::Connection(_)).then_some(()))
            .is_some()
    }
}
