use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use data_accessor::config;
use data_accessor::{Connection, ConnectionKind, DataAccessor, Parameters};

mod observability;
mod output;

use observability::init_logging;
use output::render_cursor;

#[derive(Parser, Debug)]
#[command(name = "dbexec")]
#[command(about = "Run stored procedures and SQL against SQL Server or MySQL", long_about = None)]
#[command(version)]
struct Args {
    /// Database kind (sqlserver or mysql)
    #[arg(short, long)]
    kind: Option<String>,

    /// Connection string (ADO form for SQL Server, mysql:// URL for MySQL)
    #[arg(short = 's', long, env = "DATA_ACCESSOR_CONNECTION_STRING")]
    connection_string: Option<String>,

    /// Command timeout in seconds (0 waits indefinitely)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable JSON logging output
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run a query and print its rows
    Query(Target),
    /// Run a statement and print the affected-row count
    Exec(Target),
}

#[derive(clap::Args, Debug)]
#[command(group(
    clap::ArgGroup::new("target")
        .required(true)
        .args(["procedure", "sql"])
))]
struct Target {
    /// Stored procedure to call
    #[arg(short, long)]
    procedure: Option<String>,

    /// Literal SQL to run
    #[arg(long)]
    sql: Option<String>,

    /// Procedure parameter as NAME=VALUE, or NAME alone for NULL (repeatable)
    #[arg(short = 'P', long = "param", value_parser = parse_param, requires = "procedure")]
    params: Vec<(String, Option<String>)>,
}

impl Target {
    fn parameters(&self) -> Parameters {
        self.params.iter().cloned().collect()
    }

    fn sql_text(&self) -> &str {
        self.sql.as_deref().unwrap_or_default()
    }
}

/// `NAME=VALUE` binds text (possibly empty), a bare `NAME` binds NULL.
fn parse_param(s: &str) -> Result<(String, Option<String>), String> {
    let (name, value) = match s.split_once('=') {
        Some((name, value)) => (name, Some(value.to_string())),
        None => (s, None),
    };
    if name.is_empty() {
        return Err(format!("invalid parameter '{s}': name is empty"));
    }
    Ok((name.to_string(), value))
}

/// Execute `mode` on an open connection and render the output.
fn run(
    accessor: &DataAccessor,
    conn: &mut dyn Connection,
    mode: &Mode,
) -> data_accessor::Result<String> {
    match mode {
        Mode::Query(target) => {
            let cursor = match target.procedure {
                Some(ref procedure) => {
                    accessor.execute_reader(conn, procedure, &target.parameters())?
                }
                None => accessor.execute_reader_sql(conn, target.sql_text())?,
            };
            Ok(render_cursor(cursor))
        }
        Mode::Exec(target) => {
            let affected = match target.procedure {
                Some(ref procedure) => {
                    accessor.execute_non_query(conn, procedure, &target.parameters())?
                }
                None => accessor.execute_non_query_sql(conn, target.sql_text())?,
            };
            Ok(format!("{affected}\n"))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration with precedence: CLI > env > file > defaults
    let mut builder = if let Some(ref path) = args.config {
        config::load_config_from_path(path)?
    } else {
        config::load_config()?
    };

    if let Some(ref kind) = args.kind {
        builder = builder.kind(ConnectionKind::from_name(kind));
    }
    if let Some(ref connection_string) = args.connection_string {
        builder = builder.connection_string(connection_string.clone());
    }
    if let Some(secs) = args.timeout {
        builder = builder.command_timeout(Duration::from_secs(secs));
    }
    if args.verbose {
        builder = builder.log_level("debug");
    }
    if args.json_logs {
        builder = builder.json_logs(true);
    }

    let config = builder.build();
    init_logging(&config.logging);

    let connection_string = config.connection_string.clone().context(
        "no connection string; pass --connection-string or set DATA_ACCESSOR_CONNECTION_STRING",
    )?;

    let accessor = DataAccessor::from_config(&config);
    tracing::info!(
        kind = %accessor.kind(),
        provider = %accessor.provider(),
        timeout = ?accessor.command_timeout(),
        "Running command"
    );

    let mut conn = accessor.get_connection(&connection_string)?;
    conn.open()?;
    let result = run(&accessor, conn.as_mut(), &args.mode);
    conn.close();

    match result {
        Ok(text) => {
            print!("{text}");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(e.diagnostic())),
    }
}
