//! Engine-side error types.
//!
//! User-input failures are [`ParseError`]s from the core crate; this module
//! adds the failures raised while a command handler is running.

use thiserror::Error;

/// Failure raised by a command handler's `process` phase.
///
/// Reported through the failure-listener path and rendered as a generic
/// error message naming the failing command, the message, and the kind.
/// Never terminates the shell loop.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Handler-defined failure with a message.
    #[error("{0}")]
    Failed(String),
    /// I/O failure while the handler was running.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A command referenced a handler id that was never registered.
    #[error("no handler registered for id '{0}'")]
    MissingHandler(String),
}

impl HandlerError {
    /// Handler-defined failure with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }

    /// Short kind label used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::Failed(_) => "failure",
            HandlerError::Io(_) => "io",
            HandlerError::MissingHandler(_) => "configuration",
        }
    }
}
