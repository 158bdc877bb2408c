//! Provider-agnostic access helper for SQL Server and MySQL.
//!
//! A [`DataAccessor`] is bound to one [`ConnectionKind`] for its whole life.
//! It hands out unopened connections for a connection string and runs stored
//! procedures or literal SQL against them, returning either a forward-only
//! [`Cursor`] or an affected-row count.
//!
//! # Features
//!
//! - `sqlserver` (default): SQL Server driver backed by `tiberius`
//! - `mysql` (default): MySQL driver backed by `mysql_async`
//! - `test-utils`: in-memory [`testing::ScriptedDriver`] for tests
//!
//! # Example
//!
//! ```rust,ignore
//! use data_accessor::{ConnectionKind, DataAccessor, Parameters};
//!
//! let accessor = DataAccessor::new(ConnectionKind::SqlServer);
//! let mut conn = accessor.get_connection("server=tcp:localhost,1433;user=sa;password=secret")?;
//! conn.open()?;
//!
//! let params = Parameters::new().with("id", "7");
//! let mut cursor = accessor.execute_reader(conn.as_mut(), "dbo.usp_GetOrder", &params)?;
//! while let Some(row) = cursor.read() {
//!     println!("{row}");
//! }
//! ```

mod accessor;
mod command;
pub mod config;
mod constants;
pub mod cursor;
pub mod driver;
mod error;
mod helpers;
mod kind;
mod params;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
mod validation;

pub use accessor::DataAccessor;
pub use command::{Command, CommandType};
pub use config::{AccessorConfig, ConfigBuilder, LoggingConfig};
pub use constants::DEFAULT_COMMAND_TIMEOUT;
pub use cursor::{Cursor, Row, Value};
pub use driver::{Connection, Driver, ProviderRegistry};
pub use error::{Error, ErrorKind, ExecutionError, Result};
pub use helpers::redact_connection_string;
pub use kind::{ConnectionKind, ProviderId};
pub use params::{BoundParameter, Parameter, Parameters, SqlValue};
