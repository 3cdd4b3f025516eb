use super::Error;

/// Error signalling that an interactive escalation (e.g. signing in) is needed
/// before the operation can proceed.
///
/// The core never wraps this error so that callers can match on it, resolve
/// the escalation and retry the exact same operation.
#[derive(Debug)]
pub(super) struct AuthenticationRequired {
    pub(super) required_mode: Box<str>,
    pub(super) can_retry: bool,
}

impl std::error::Error for AuthenticationRequired {}

impl core::fmt::Display for AuthenticationRequired {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "authentication required: mode={}", self.required_mode)?;
        if !self.can_retry {
            f.write_str(" (not retryable)")?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates an authentication-required signal for the given mode.
    pub fn authentication_required(required_mode: impl Into<String>, can_retry: bool) -> Error {
        Error::from(super::ErrorKind::AuthenticationRequired(
            AuthenticationRequired {
                required_mode: required_mode.into().into(),
                can_retry,
            },
        ))
    }

    /// Returns `true` if this error is an authentication-required signal.
    pub fn is_authentication_required(&self) -> bool {
        self.authentication_required_mode().is_some()
    }

    /// Returns the required mode and whether the operation may be retried.
    pub fn authentication_required_mode(&self) -> Option<(&str, bool)> {
        self.find_kind(|kind| match kind {
            super::ErrorKind::AuthenticationRequired(err) => {
                Some((&*err.required_mode, err.can_retry))
            }
            _ => None,
        })
    }
}
