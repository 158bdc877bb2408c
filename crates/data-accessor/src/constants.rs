//! Shared constants

use std::time::Duration;

/// Command timeout applied when none is configured (15 minutes).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(900);

/// Prefix of the diagnostic string rendered for failed executions.
pub const DIAGNOSTIC_PREFIX: &str = "Error: ";

/// Separator between the message and the context of a diagnostic string.
pub const DIAGNOSTIC_SEPARATOR: &str = " -- ";

/// Replacement text for secrets in logged connection strings.
pub const REDACTED: &str = "***";
