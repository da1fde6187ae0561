//! Store-boundary error model.

use thiserror::Error;

/// Failure reaching or reading the backing store.
///
/// These are infrastructure failures; the policy layer maps them to a
/// fail-closed outcome, never to a grant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store returned data that could not be interpreted.
    #[error("malformed store data: {0}")]
    Malformed(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
