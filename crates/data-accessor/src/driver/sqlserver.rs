//! SQL Server driver backed by `tiberius`.
//!
//! Connection strings use the ADO.NET form, e.g.
//! `Server=tcp:localhost,1433;User Id=sa;Password=...;TrustServerCertificate=true`.
//!
//! Stored procedures are sent as `EXEC name @a = @P1, @b = @P2`, so bound
//! names reach the procedure while values travel as positional parameters.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use tiberius::{Client, ColumnData, Config, FromSql, Query};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use super::runtime::BlockingRuntime;
use super::{Connection, Driver};
use crate::command::{Command, CommandType};
use crate::cursor::{Cursor, Value};
use crate::error::{Error, ExecutionError};
use crate::helpers::redact_connection_string;
use crate::kind::{ConnectionKind, ProviderId};
use crate::params::SqlValue;
use crate::validation::{validate_parameter_name, validate_procedure_name};

type SqlClient = Client<Compat<TcpStream>>;

impl From<tiberius::error::Error> for ExecutionError {
    fn from(err: tiberius::error::Error) -> Self {
        Self::driver(err.to_string())
    }
}

/// Driver for [`ProviderId::SqlClient`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDriver;

impl Driver for SqlServerDriver {
    fn provider(&self) -> ProviderId {
        ProviderId::SqlClient
    }

    fn create_connection(&self, connection_string: &str) -> crate::Result<Box<dyn Connection>> {
        let config = Config::from_ado_string(connection_string)
            .map_err(|e| Error::connection_string(e.to_string()))?;

        Ok(Box::new(SqlServerConnection {
            connection_string: connection_string.to_owned(),
            config,
            session: None,
        }))
    }
}

struct Session {
    runtime: BlockingRuntime,
    client: SqlClient,
}

/// An unopened or open SQL Server connection.
pub struct SqlServerConnection {
    connection_string: String,
    config: Config,
    session: Option<Session>,
}

impl SqlServerConnection {
    /// Drop a session whose stream was abandoned mid-response.
    fn discard_after_timeout<T>(&mut self, result: &Result<T, ExecutionError>) {
        if matches!(result, Err(e) if e.is_timeout()) {
            tracing::warn!("Discarding SQL Server connection after command timeout");
            self.session = None;
        }
    }
}

impl fmt::Debug for SqlServerConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlServerConnection")
            .field(
                "connection_string",
                &redact_connection_string(&self.connection_string),
            )
            .field("open", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl Connection for SqlServerConnection {
    fn provider(&self) -> ProviderId {
        ProviderId::SqlClient
    }

    fn connection_string(&self) -> &str {
        &self.connection_string
    }

    fn open(&mut self) -> crate::Result<()> {
        if self.session.is_some() {
            return Ok(());
        }

        let runtime = BlockingRuntime::new()?;
        let client = runtime
            .block_on(connect(self.config.clone()))
            .map_err(|e| Error::connection(e.to_string()))?;

        tracing::debug!(
            connection = %redact_connection_string(&self.connection_string),
            "Opened SQL Server connection"
        );
        self.session = Some(Session { runtime, client });
        Ok(())
    }

    fn close(&mut self) {
        if let Some(Session { runtime, client }) = self.session.take()
            && let Err(e) = runtime.block_on(client.close())
        {
            tracing::warn!(error = %e, "Error while closing SQL Server connection");
        }
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn execute_reader(&mut self, command: &Command) -> Result<Cursor, ExecutionError> {
        let Some(session) = self.session.as_mut() else {
            return Err(ExecutionError::connection_closed());
        };

        let query = build_query(command)?;
        let result = session
            .runtime
            .block_on_deadline(command.deadline(), read_first_result(&mut session.client, query));
        self.discard_after_timeout(&result);
        result
    }

    fn execute_non_query(&mut self, command: &Command) -> Result<u64, ExecutionError> {
        let Some(session) = self.session.as_mut() else {
            return Err(ExecutionError::connection_closed());
        };

        let query = build_query(command)?;
        let result = session
            .runtime
            .block_on_deadline(command.deadline(), execute(&mut session.client, query));
        self.discard_after_timeout(&result);
        result
    }
}

impl Drop for SqlServerConnection {
    fn drop(&mut self) {
        self.close();
    }
}

async fn connect(config: Config) -> tiberius::Result<SqlClient> {
    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true)?;

    match Client::connect(config.clone(), tcp.compat_write()).await {
        Ok(client) => Ok(client),
        // Azure SQL gateways redirect to the node hosting the database
        Err(tiberius::error::Error::Routing { host, port }) => {
            tracing::debug!(%host, port, "Following SQL Server routing redirect");
            let mut config = config;
            config.host(&host);
            config.port(port);

            let tcp = TcpStream::connect(config.get_addr()).await?;
            tcp.set_nodelay(true)?;
            Client::connect(config, tcp.compat_write()).await
        }
        Err(e) => Err(e),
    }
}

async fn read_first_result(
    client: &mut SqlClient,
    query: Query<'_>,
) -> Result<Cursor, ExecutionError> {
    let mut stream = query.query(client).await?;
    let columns: Vec<String> = stream
        .columns()
        .await?
        .map(|cols| cols.iter().map(|c| c.name().to_owned()).collect())
        .unwrap_or_default();

    let rows = stream
        .into_first_result()
        .await?
        .into_iter()
        .map(|row| row.into_iter().map(|data| column_value(&data)).collect())
        .collect();

    Ok(Cursor::new(columns, rows))
}

async fn execute(client: &mut SqlClient, query: Query<'_>) -> Result<u64, ExecutionError> {
    let result = query.execute(client).await?;
    Ok(result.total())
}

/// Render the batch text sent for `command`.
///
/// Procedure and parameter names are spliced into the batch, so both are
/// validated here even when the command did not come through the accessor.
fn render_batch(command: &Command) -> Result<String, ExecutionError> {
    match command.command_type() {
        CommandType::Text => Ok(command.text().to_owned()),
        CommandType::StoredProcedure => {
            validate_procedure_name(command.text(), ConnectionKind::SqlServer)?;

            let assignments = command
                .parameters()
                .iter()
                .enumerate()
                .map(|(i, p)| -> Result<String, ExecutionError> {
                    validate_parameter_name(p.name())?;
                    Ok(format!("{} = @P{}", p.wire_name(), i + 1))
                })
                .collect::<Result<Vec<_>, _>>()?;

            if assignments.is_empty() {
                Ok(format!("EXEC {}", command.text()))
            } else {
                Ok(format!("EXEC {} {}", command.text(), assignments.join(", ")))
            }
        }
    }
}

fn build_query(command: &Command) -> Result<Query<'static>, ExecutionError> {
    let mut query = Query::new(render_batch(command)?);
    for parameter in command.parameters() {
        match parameter.value() {
            SqlValue::Null => query.bind(Option::<String>::None),
            SqlValue::Text(value) => query.bind(value.clone()),
        }
    }
    Ok(query)
}

fn column_value(data: &ColumnData<'static>) -> Value {
    match data {
        ColumnData::U8(v) => v.map_or(Value::Null, |v| Value::Int(i64::from(v))),
        ColumnData::I16(v) => v.map_or(Value::Null, |v| Value::Int(i64::from(v))),
        ColumnData::I32(v) => v.map_or(Value::Null, |v| Value::Int(i64::from(v))),
        ColumnData::I64(v) => v.map_or(Value::Null, Value::Int),
        ColumnData::F32(v) => v.map_or(Value::Null, |v| Value::Float(f64::from(v))),
        ColumnData::F64(v) => v.map_or(Value::Null, Value::Float),
        ColumnData::Bit(v) => v.map_or(Value::Null, Value::Bool),
        ColumnData::String(v) => v
            .as_ref()
            .map_or(Value::Null, |s| Value::Text(s.to_string())),
        ColumnData::Guid(v) => v
            .as_ref()
            .map_or(Value::Null, |g| Value::Text(g.to_string())),
        ColumnData::Binary(v) => v.as_ref().map_or(Value::Null, |b| Value::Bytes(b.to_vec())),
        ColumnData::Numeric(v) => v
            .as_ref()
            .map_or(Value::Null, |n| Value::Text(n.to_string())),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            temporal::<NaiveDateTime>(data)
        }
        ColumnData::Date(_) => temporal::<NaiveDate>(data),
        ColumnData::Time(_) => temporal::<NaiveTime>(data),
        ColumnData::DateTimeOffset(_) => temporal::<DateTime<FixedOffset>>(data),
        ColumnData::Xml(None) => Value::Null,
        other => Value::Text(format!("{other:?}")),
    }
}

fn temporal<'a, T>(data: &'a ColumnData<'static>) -> Value
where
    T: FromSql<'a> + fmt::Display,
{
    match T::from_sql(data) {
        Ok(Some(v)) => Value::Text(v.to_string()),
        Ok(None) => Value::Null,
        Err(_) => Value::Text(format!("{data:?}")),
    }
}
