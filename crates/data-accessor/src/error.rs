//! Error types for the data accessor.
//!
//! Connection setup failures surface as [`Error`] variants straight away.
//! Execution failures are captured as an [`ExecutionError`] that carries a
//! classification, the driver message and the operation that failed.

use std::fmt;

use thiserror::Error;

use crate::constants::{DIAGNOSTIC_PREFIX, DIAGNOSTIC_SEPARATOR};
use crate::kind::ProviderId;

/// Root error type.
#[derive(Error, Debug)]
pub enum Error {
    /// No driver is registered for the provider.
    #[error("No driver registered for provider {0}")]
    ProviderUnavailable(ProviderId),

    /// The driver rejected the connection string.
    #[error("Invalid connection string: {0}")]
    ConnectionString(String),

    /// Opening or closing a connection failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Executing a command failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl Error {
    /// Create a connection string error.
    #[must_use]
    pub fn connection_string(msg: impl Into<String>) -> Self {
        Self::ConnectionString(msg.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    #[must_use]
    pub const fn is_provider_unavailable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_))
    }

    #[must_use]
    pub const fn is_connection_string(&self) -> bool {
        matches!(self, Self::ConnectionString(_))
    }

    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns the execution failure, if this is one.
    #[must_use]
    pub const fn as_execution(&self) -> Option<&ExecutionError> {
        match self {
            Self::Execution(err) => Some(err),
            _ => None,
        }
    }

    /// Render the `"Error: <message> -- <context>"` diagnostic line.
    ///
    /// Non-execution errors have no operation context, so only the message is
    /// rendered after the prefix.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Execution(err) => err.diagnostic(),
            other => format!("{DIAGNOSTIC_PREFIX}{other}"),
        }
    }
}

/// Classification of an execution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The driver or the server reported an error.
    Driver,
    /// The command exceeded its timeout.
    Timeout,
    /// The connection was not open.
    ConnectionClosed,
    /// The command was rejected before reaching the driver.
    InvalidCommand,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "driver error",
            Self::Timeout => "timeout",
            Self::ConnectionClosed => "connection closed",
            Self::InvalidCommand => "invalid command",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed command execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ExecutionError {
    kind: ErrorKind,
    message: String,
    context: String,
}

impl ExecutionError {
    /// Create an error of the given kind without operation context.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: String::new(),
        }
    }

    /// Create a driver error.
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Driver, message)
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a closed-connection error.
    #[must_use]
    pub fn connection_closed() -> Self {
        Self::new(ErrorKind::ConnectionClosed, "connection is not open")
    }

    /// Create an invalid-command error.
    #[must_use]
    pub fn invalid_command(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCommand, message)
    }

    /// Attach the operation that failed.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The message reported by the driver.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The operation that failed, empty when not attached.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    #[must_use]
    pub const fn is_connection_closed(&self) -> bool {
        matches!(self.kind, ErrorKind::ConnectionClosed)
    }

    #[must_use]
    pub const fn is_invalid_command(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidCommand)
    }

    /// Render the `"Error: <message> -- <context>"` diagnostic line.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        format!(
            "{DIAGNOSTIC_PREFIX}{}{DIAGNOSTIC_SEPARATOR}{}",
            self.message, self.context
        )
    }
}

/// Result type alias for accessor operations.
pub type Result<T> = std::result::Result<T, Error>;
