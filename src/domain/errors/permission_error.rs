//! Permission management error types.

use thiserror::Error;

use super::StoreError;

/// Errors raised by permission management.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum PermissionError {
    #[error("there is no such command: `/{0}`")]
    UnknownCommand(String),

    #[error("command `/{0}` does not accept permission overrides")]
    IgnoredCommand(String),

    #[error("you are not allowed to use `/{0}`")]
    Denied(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PermissionError {
    /// Returns whether the error is caused by the caller's input rather than storage.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommand(_) | Self::IgnoredCommand(_) | Self::Denied(_)
        )
    }
}
