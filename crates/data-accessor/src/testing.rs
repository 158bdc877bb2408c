//! In-memory driver for tests.
//!
//! [`ScriptedDriver`] records every command it receives and answers with
//! replies queued in advance. Without a queued reply a reader returns an
//! empty cursor and a non-query reports zero affected rows.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::command::Command;
use crate::cursor::{Cursor, Value};
use crate::driver::{Connection, Driver};
use crate::error::{Error, ExecutionError};
use crate::kind::ProviderId;

#[derive(Debug, Clone)]
enum Reply {
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Affected(u64),
    Failure(ExecutionError),
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Reply>,
    executed: Vec<Command>,
    connection_strings: Vec<String>,
}

/// Driver that replays queued replies. Clones share one script.
#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    provider: ProviderId,
    script: Arc<Mutex<Script>>,
}

impl ScriptedDriver {
    #[must_use]
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    /// Queue a result set for the next execution.
    pub fn push_rows(&self, columns: &[&str], rows: Vec<Vec<Value>>) {
        self.script.lock().replies.push_back(Reply::Rows {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows,
        });
    }

    /// Queue an affected-row count for the next execution.
    pub fn push_affected(&self, affected: u64) {
        self.script.lock().replies.push_back(Reply::Affected(affected));
    }

    /// Queue a driver failure for the next execution.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.push_error(ExecutionError::driver(message));
    }

    /// Queue an arbitrary execution failure for the next execution.
    pub fn push_error(&self, error: ExecutionError) {
        self.script.lock().replies.push_back(Reply::Failure(error));
    }

    /// Commands executed so far, oldest first.
    #[must_use]
    pub fn executed(&self) -> Vec<Command> {
        self.script.lock().executed.clone()
    }

    /// Connection strings passed to [`Driver::create_connection`].
    #[must_use]
    pub fn connection_strings(&self) -> Vec<String> {
        self.script.lock().connection_strings.clone()
    }
}

impl Driver for ScriptedDriver {
    fn provider(&self) -> ProviderId {
        self.provider
    }

    fn create_connection(&self, connection_string: &str) -> crate::Result<Box<dyn Connection>> {
        if connection_string.trim().is_empty() {
            return Err(Error::connection_string("connection string is empty"));
        }

        self.script
            .lock()
            .connection_strings
            .push(connection_string.to_owned());

        Ok(Box::new(ScriptedConnection {
            provider: self.provider,
            connection_string: connection_string.to_owned(),
            open: false,
            script: Arc::clone(&self.script),
        }))
    }
}

/// Connection produced by [`ScriptedDriver`].
#[derive(Debug)]
pub struct ScriptedConnection {
    provider: ProviderId,
    connection_string: String,
    open: bool,
    script: Arc<Mutex<Script>>,
}

impl ScriptedConnection {
    fn next_reply(&self, command: &Command) -> Result<Option<Reply>, ExecutionError> {
        if !self.open {
            return Err(ExecutionError::connection_closed());
        }
        let mut script = self.script.lock();
        script.executed.push(command.clone());
        Ok(script.replies.pop_front())
    }
}

impl Connection for ScriptedConnection {
    fn provider(&self) -> ProviderId {
        self.provider
    }

    fn connection_string(&self) -> &str {
        &self.connection_string
    }

    fn open(&mut self) -> crate::Result<()> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn execute_reader(&mut self, command: &Command) -> Result<Cursor, ExecutionError> {
        match self.next_reply(command)? {
            Some(Reply::Rows { columns, rows }) => Ok(Cursor::new(columns, rows)),
            Some(Reply::Failure(e)) => Err(e),
            Some(Reply::Affected(_)) | None => Ok(Cursor::empty()),
        }
    }

    fn execute_non_query(&mut self, command: &Command) -> Result<u64, ExecutionError> {
        match self.next_reply(command)? {
            Some(Reply::Affected(n)) => Ok(n),
            Some(Reply::Failure(e)) => Err(e),
            Some(Reply::Rows { .. }) | None => Ok(0),
        }
    }
}
