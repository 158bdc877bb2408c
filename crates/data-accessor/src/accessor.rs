//! The data accessor.

use std::sync::Arc;
use std::time::Duration;

use crate::command::{Command, CommandType};
use crate::config::AccessorConfig;
use crate::constants::DEFAULT_COMMAND_TIMEOUT;
use crate::cursor::Cursor;
use crate::driver::{Connection, ProviderRegistry};
use crate::error::{Error, ExecutionError, Result};
use crate::helpers::redact_connection_string;
use crate::kind::{ConnectionKind, ProviderId};
use crate::params::Parameters;
use crate::validation::{validate_parameter_name, validate_procedure_name};

/// Runs stored procedures and SQL text for one connection kind.
///
/// The kind and its provider are fixed at construction. The accessor keeps
/// no per-call state, so one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct DataAccessor {
    kind: ConnectionKind,
    provider: ProviderId,
    command_timeout: Duration,
    registry: Arc<ProviderRegistry>,
}

impl Default for DataAccessor {
    fn default() -> Self {
        Self::new(ConnectionKind::default())
    }
}

impl DataAccessor {
    /// Accessor for `kind` using the compiled-in drivers.
    #[must_use]
    pub fn new(kind: ConnectionKind) -> Self {
        Self {
            kind,
            provider: kind.provider(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            registry: Arc::new(ProviderRegistry::with_defaults()),
        }
    }

    #[must_use]
    pub fn from_config(config: &AccessorConfig) -> Self {
        Self::new(config.kind).with_command_timeout(config.command_timeout)
    }

    /// Set the command timeout. Zero waits indefinitely.
    #[must_use]
    pub const fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Resolve drivers from `registry` instead of the compiled-in set.
    #[must_use]
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ConnectionKind {
        self.kind
    }

    #[must_use]
    pub const fn provider(&self) -> ProviderId {
        self.provider
    }

    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Create an unopened connection for `connection_string`.
    ///
    /// The caller owns the connection and must open it before executing
    /// anything on it.
    pub fn get_connection(&self, connection_string: &str) -> Result<Box<dyn Connection>> {
        let driver = self
            .registry
            .driver(self.provider)
            .ok_or(Error::ProviderUnavailable(self.provider))?;

        tracing::debug!(
            provider = %self.provider,
            connection = %redact_connection_string(connection_string),
            "Creating connection"
        );
        driver.create_connection(connection_string)
    }

    /// Run a stored procedure and return its first result set.
    pub fn execute_reader(
        &self,
        conn: &mut dyn Connection,
        procedure: &str,
        parameters: &Parameters,
    ) -> Result<Cursor> {
        let command = self.procedure_command(procedure, parameters, "execute_reader")?;
        self.run_reader(conn, &command)
    }

    /// Run literal SQL and return its first result set.
    pub fn execute_reader_sql(&self, conn: &mut dyn Connection, sql: &str) -> Result<Cursor> {
        let command = self.command(sql, CommandType::Text);
        self.run_reader(conn, &command)
    }

    /// Run a stored procedure and return the number of affected rows.
    pub fn execute_non_query(
        &self,
        conn: &mut dyn Connection,
        procedure: &str,
        parameters: &Parameters,
    ) -> Result<u64> {
        let command = self.procedure_command(procedure, parameters, "execute_non_query")?;
        self.run_non_query(conn, &command)
    }

    /// Run literal SQL and return the number of affected rows.
    pub fn execute_non_query_sql(&self, conn: &mut dyn Connection, sql: &str) -> Result<u64> {
        let command = self.command(sql, CommandType::Text);
        self.run_non_query(conn, &command)
    }

    fn command(&self, text: &str, command_type: CommandType) -> Command {
        Command::new(text, command_type, self.command_timeout)
    }

    fn procedure_command(
        &self,
        procedure: &str,
        parameters: &Parameters,
        operation: &str,
    ) -> Result<Command> {
        validate_procedure_name(procedure, self.kind)
            .and_then(|()| {
                parameters
                    .iter()
                    .try_for_each(|p| validate_parameter_name(p.name()))
            })
            .map_err(|e| e.with_context(self.context(operation, CommandType::StoredProcedure, procedure)))?;

        Ok(self
            .command(procedure, CommandType::StoredProcedure)
            .with_parameters(parameters.bind(self.kind)))
    }

    fn run_reader(&self, conn: &mut dyn Connection, command: &Command) -> Result<Cursor> {
        let span = tracing::debug_span!(
            "execute_reader",
            provider = %self.provider,
            command_type = %command.command_type(),
            command = command.text(),
            parameters = command.parameters().len(),
        );
        let _enter = span.enter();

        let result = self
            .check_connection(conn)
            .and_then(|()| conn.execute_reader(command));

        match result {
            Ok(cursor) => {
                tracing::debug!(
                    columns = cursor.field_count(),
                    rows = cursor.remaining(),
                    "Query completed"
                );
                Ok(cursor)
            }
            Err(e) => Err(self.fail("execute_reader", command, e)),
        }
    }

    fn run_non_query(&self, conn: &mut dyn Connection, command: &Command) -> Result<u64> {
        let span = tracing::debug_span!(
            "execute_non_query",
            provider = %self.provider,
            command_type = %command.command_type(),
            command = command.text(),
            parameters = command.parameters().len(),
        );
        let _enter = span.enter();

        let result = self
            .check_connection(conn)
            .and_then(|()| conn.execute_non_query(command));

        match result {
            Ok(affected) => {
                tracing::debug!(affected, "Command completed");
                Ok(affected)
            }
            Err(e) => Err(self.fail("execute_non_query", command, e)),
        }
    }

    fn check_connection(&self, conn: &dyn Connection) -> std::result::Result<(), ExecutionError> {
        if conn.provider() != self.provider {
            return Err(ExecutionError::invalid_command(format!(
                "connection belongs to provider {}, accessor uses {}",
                conn.provider(),
                self.provider
            )));
        }
        if !conn.is_open() {
            return Err(ExecutionError::connection_closed());
        }
        Ok(())
    }

    fn fail(&self, operation: &str, command: &Command, err: ExecutionError) -> Error {
        let err = err.with_context(self.context(operation, command.command_type(), command.text()));
        tracing::warn!(kind = %err.kind(), error = %err.message(), "{operation} failed");
        err.into()
    }

    fn context(&self, operation: &str, command_type: CommandType, text: &str) -> String {
        format!("{operation} {command_type} `{text}` via {}", self.provider)
    }
}
