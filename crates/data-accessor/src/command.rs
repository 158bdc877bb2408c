//! Commands handed to a driver for one execution.

use std::fmt;
use std::time::Duration;

use crate::params::BoundParameter;

/// How the command text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    /// Text is the name of a stored procedure.
    StoredProcedure,
    /// Text is literal SQL.
    Text,
}

impl CommandType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StoredProcedure => "stored procedure",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single command execution request.
///
/// A timeout of zero means the driver waits indefinitely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    text: String,
    command_type: CommandType,
    timeout: Duration,
    parameters: Vec<BoundParameter>,
}

impl Command {
    #[must_use]
    pub fn new(text: impl Into<String>, command_type: CommandType, timeout: Duration) -> Self {
        Self {
            text: text.into(),
            command_type,
            timeout,
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<BoundParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Procedure name or SQL text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn command_type(&self) -> CommandType {
        self.command_type
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `None` when the command may run indefinitely.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }

    #[must_use]
    pub fn parameters(&self) -> &[BoundParameter] {
        &self.parameters
    }

    #[must_use]
    pub const fn is_stored_procedure(&self) -> bool {
        matches!(self.command_type, CommandType::StoredProcedure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ConnectionKind;
    use crate::params::Parameters;

    #[test]
    fn test_command_defaults() {
        let cmd = Command::new("SELECT 1", CommandType::Text, Duration::from_secs(30));
        assert_eq!(cmd.text(), "SELECT 1");
        assert_eq!(cmd.command_type(), CommandType::Text);
        assert_eq!(cmd.timeout(), Duration::from_secs(30));
        assert!(cmd.parameters().is_empty());
        assert!(!cmd.is_stored_procedure());
    }

    #[test]
    fn test_zero_timeout_has_no_deadline() {
        let cmd = Command::new("usp_Sync", CommandType::StoredProcedure, Duration::ZERO);
        assert_eq!(cmd.deadline(), None);

        let cmd = Command::new("usp_Sync", CommandType::StoredProcedure, Duration::from_secs(1));
        assert_eq!(cmd.deadline(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_with_parameters() {
        let bound = Parameters::new().with("id", "1").bind(ConnectionKind::SqlServer);
        let cmd = Command::new("usp_Get", CommandType::StoredProcedure, Duration::from_secs(5))
            .with_parameters(bound);
        assert_eq!(cmd.parameters().len(), 1);
        assert_eq!(cmd.parameters()[0].wire_name(), "@id");
    }

    #[test]
    fn test_command_type_display() {
        assert_eq!(CommandType::StoredProcedure.to_string(), "stored procedure");
        assert_eq!(CommandType::Text.to_string(), "text");
    }
}
