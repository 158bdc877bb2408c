//! Driver seam between the accessor and native database clients.
//!
//! Provides:
//! - [`Driver`]: creates unopened connections for one provider
//! - [`Connection`]: executes commands on an open connection
//! - [`ProviderRegistry`]: maps provider identifiers to drivers

use std::fmt;

use crate::Result;
use crate::command::Command;
use crate::cursor::Cursor;
use crate::error::ExecutionError;
use crate::kind::ProviderId;

#[cfg(feature = "mysql")]
pub mod mysql;
mod registry;
#[cfg(any(feature = "sqlserver", feature = "mysql"))]
mod runtime;
#[cfg(feature = "sqlserver")]
pub mod sqlserver;

pub use registry::ProviderRegistry;

/// Factory for connections of one provider.
pub trait Driver: Send + Sync + fmt::Debug {
    /// Provider served by this driver.
    fn provider(&self) -> ProviderId;

    /// Create a connection for `connection_string` without opening it.
    fn create_connection(&self, connection_string: &str) -> Result<Box<dyn Connection>>;
}

/// A database connection owned by the caller.
///
/// Dropping a connection closes it.
pub trait Connection: Send + fmt::Debug {
    /// Provider that created this connection.
    fn provider(&self) -> ProviderId;

    /// Connection string the connection was created with.
    fn connection_string(&self) -> &str;

    /// Open the connection. Opening an open connection is a no-op.
    fn open(&mut self) -> Result<()>;

    /// Close the connection. Closing a closed connection is a no-op.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// Execute `command` and buffer its first result set.
    fn execute_reader(&mut self, command: &Command) -> std::result::Result<Cursor, ExecutionError>;

    /// Execute `command` and return the number of affected rows.
    fn execute_non_query(&mut self, command: &Command) -> std::result::Result<u64, ExecutionError>;
}
