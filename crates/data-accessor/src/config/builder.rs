//! Configuration builder

use std::time::Duration;

use crate::constants::DEFAULT_COMMAND_TIMEOUT;
use crate::kind::ConnectionKind;

/// Accessor configuration
#[derive(Debug, Clone)]
pub struct AccessorConfig {
    pub kind: ConnectionKind,
    pub command_timeout: Duration,
    /// Connection string used by front-ends; the accessor itself takes one per call.
    pub connection_string: Option<String>,
    pub logging: LoggingConfig,
}

impl AccessorConfig {
    #[must_use]
    pub const fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

impl Default for AccessorConfig {
    fn default() -> Self {
        ConfigBuilder::new().build()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub log_level: String,
    pub json_logs: bool,
}

/// Configuration builder with fluent API
#[derive(Debug)]
pub struct ConfigBuilder {
    kind: ConnectionKind,
    command_timeout: Duration,
    connection_string: Option<String>,
    logging: LoggingConfig,
}

impl ConfigBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kind: ConnectionKind::SqlServer,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            connection_string: None,
            logging: LoggingConfig {
                log_level: String::new(),
                json_logs: false,
            },
        }
    }

    #[must_use]
    pub const fn kind(mut self, kind: ConnectionKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub const fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    #[must_use]
    pub fn connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    #[must_use]
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.log_level = level.into();
        self
    }

    #[must_use]
    pub const fn json_logs(mut self, enabled: bool) -> Self {
        self.logging.json_logs = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> AccessorConfig {
        AccessorConfig {
            kind: self.kind,
            command_timeout: self.command_timeout,
            connection_string: self.connection_string,
            logging: self.logging,
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
