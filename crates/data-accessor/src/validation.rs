//! Validation of identifiers spliced into `EXEC`/`CALL` text

use crate::error::ExecutionError;
use crate::kind::ConnectionKind;

/// Maximum length for a (possibly schema-qualified) procedure name
const MAX_PROCEDURE_NAME_LENGTH: usize = 256;

/// Maximum length for a parameter name, without the provider prefix
const MAX_PARAMETER_NAME_LENGTH: usize = 128;

const fn quote_chars(kind: ConnectionKind) -> (char, char) {
    match kind {
        ConnectionKind::SqlServer => ('[', ']'),
        ConnectionKind::MySql => ('`', '`'),
    }
}

/// `server.database.schema.procedure` on SQL Server, `database.procedure` on MySQL.
const fn max_parts(kind: ConnectionKind) -> usize {
    match kind {
        ConnectionKind::SqlServer => 4,
        ConnectionKind::MySql => 2,
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '#')
}

/// Validate a stored procedure name before it is spliced into `EXEC`/`CALL` text.
pub fn validate_procedure_name(name: &str, kind: ConnectionKind) -> Result<(), ExecutionError> {
    procedure_name_parts(name, kind).map(|_| ())
}

/// Split a procedure name into its unquoted, dot-separated parts.
///
/// Bare parts allow alphanumerics (including non-ASCII), `_`, `$` and `#`.
/// Quoted parts use `[...]` on SQL Server and `` `...` `` on MySQL, with the
/// closing quote doubled to escape it, and may contain anything else.
pub fn procedure_name_parts(name: &str, kind: ConnectionKind) -> Result<Vec<String>, ExecutionError> {
    if name.is_empty() {
        return Err(ExecutionError::invalid_command(
            "procedure name cannot be empty",
        ));
    }

    if name.chars().count() > MAX_PROCEDURE_NAME_LENGTH {
        return Err(ExecutionError::invalid_command(format!(
            "procedure name exceeds {MAX_PROCEDURE_NAME_LENGTH} characters"
        )));
    }

    let invalid = || ExecutionError::invalid_command(format!("invalid procedure name: {name}"));
    let (open, close) = quote_chars(kind);
    let mut chars = name.chars().peekable();
    let mut parts = Vec::new();

    loop {
        let mut part = String::new();

        if chars.next_if_eq(&open).is_some() {
            loop {
                match chars.next() {
                    Some(c) if c == close => {
                        if chars.next_if_eq(&close).is_some() {
                            part.push(close);
                        } else {
                            break;
                        }
                    }
                    Some(c) => part.push(c),
                    None => return Err(invalid()),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|&c| c != '.') {
                if !is_identifier_char(c) {
                    return Err(invalid());
                }
                part.push(c);
            }
        }

        if part.is_empty() {
            return Err(invalid());
        }
        parts.push(part);

        match chars.next() {
            None => break,
            Some('.') => {}
            Some(_) => return Err(invalid()),
        }
    }

    if parts.len() > max_parts(kind) {
        return Err(ExecutionError::invalid_command(format!(
            "procedure name has more than {} parts: {name}",
            max_parts(kind)
        )));
    }

    Ok(parts)
}

/// Validate a parameter name, given without the provider prefix.
pub fn validate_parameter_name(name: &str) -> Result<(), ExecutionError> {
    if name.is_empty() {
        return Err(ExecutionError::invalid_command(
            "parameter name cannot be empty",
        ));
    }

    if name.chars().count() > MAX_PARAMETER_NAME_LENGTH {
        return Err(ExecutionError::invalid_command(format!(
            "parameter name exceeds {MAX_PARAMETER_NAME_LENGTH} characters"
        )));
    }

    if !name.chars().all(is_identifier_char) {
        return Err(ExecutionError::invalid_command(format!(
            "invalid parameter name: {name}"
        )));
    }

    Ok(())
}
