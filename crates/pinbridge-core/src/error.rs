//! This module defines the error type shared by every `pinbridge` crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for line, servo, ranging and remote operations.
///
/// A ranging timeout is not an error; see [`crate::NO_ECHO`].
#[derive(Debug, Error)]
pub enum Error {
    /// A handle or link was used before it was opened, or opened twice.
    #[error("resource error: {0}")]
    Resource(String),
    /// An argument was outside the range the operation accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The underlying chip, PWM or serial call failed.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wraps a backend failure without altering it.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Error::Transport(err.into())
    }

    pub(crate) fn resource(msg: impl Into<String>) -> Self {
        Error::Resource(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}
