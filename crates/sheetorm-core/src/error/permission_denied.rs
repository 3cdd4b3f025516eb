use super::Error;

/// Error when the configured credentials can never satisfy the operation.
#[derive(Debug)]
pub(super) struct PermissionDenied {
    message: Box<str>,
}

impl std::error::Error for PermissionDenied {}

impl core::fmt::Display for PermissionDenied {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "permission denied: {}", self.message)
    }
}

impl Error {
    /// Creates a hard permission failure (misconfiguration, revoked access).
    pub fn permission_denied(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::PermissionDenied(PermissionDenied {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error in its cause chain, is a
    /// permission failure.
    pub fn is_permission_denied(&self) -> bool {
        self.find_kind(|kind| matches!(kind, super::ErrorKind::PermissionDenied(_)).then_some(()))
            .is_some()
    }
}
