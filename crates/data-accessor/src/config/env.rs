//! Environment variable loading for configuration

use std::env;
use std::time::Duration;

use super::builder::ConfigBuilder;
use crate::kind::ConnectionKind;

/// Environment variable names
mod vars {
    pub const KIND: &str = "DATA_ACCESSOR_KIND";
    pub const CONNECTION_STRING: &str = "DATA_ACCESSOR_CONNECTION_STRING";
    pub const COMMAND_TIMEOUT_SECS: &str = "DATA_ACCESSOR_COMMAND_TIMEOUT_SECS";
    pub const RUST_LOG: &str = "RUST_LOG";
    pub const JSON_LOGS: &str = "DATA_ACCESSOR_JSON_LOGS";
}

/// Load configuration from environment variables
///
/// Unparseable numeric values are ignored; unknown kinds resolve to SQL Server.
pub fn load_from_env(mut builder: ConfigBuilder) -> ConfigBuilder {
    if let Ok(kind) = env::var(vars::KIND) {
        builder = builder.kind(ConnectionKind::from_name(&kind));
    }

    if let Ok(connection_string) = env::var(vars::CONNECTION_STRING) {
        builder = builder.connection_string(connection_string);
    }

    if let Ok(timeout_str) = env::var(vars::COMMAND_TIMEOUT_SECS)
        && let Ok(secs) = timeout_str.trim().parse::<u64>()
    {
        builder = builder.command_timeout(Duration::from_secs(secs));
    }

    if let Ok(level) = env::var(vars::RUST_LOG) {
        builder = builder.log_level(level);
    }

    if let Ok(val) = env::var(vars::JSON_LOGS) {
        builder = builder.json_logs(parse_bool(&val));
    }

    builder
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_VARS: &[&str] = &[
        vars::KIND,
        vars::CONNECTION_STRING,
        vars::COMMAND_TIMEOUT_SECS,
        vars::RUST_LOG,
        vars::JSON_LOGS,
    ];

    /// Run `f` with exactly `vars` set among the variables this module reads.
    fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap();

        let old_values: Vec<_> = ALL_VARS.iter().map(|k| (*k, env::var(k).ok())).collect();

        for key in ALL_VARS {
            // SAFETY: We hold a mutex lock to ensure no concurrent modifications
            unsafe { env::remove_var(key) };
        }
        for (key, value) in vars {
            // SAFETY: We hold a mutex lock to ensure no concurrent modifications
            unsafe { env::set_var(key, value) };
        }

        let result = f();

        for (key, old_value) in old_values {
            match old_value {
                // SAFETY: We hold a mutex lock to ensure no concurrent modifications
                Some(v) => unsafe { env::set_var(key, v) },
                None => unsafe { env::remove_var(key) },
            }
        }

        result
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_no_env_keeps_defaults() {
        with_env_vars(&[], || {
            let config = load_from_env(ConfigBuilder::new()).build();
            assert_eq!(config.kind, ConnectionKind::SqlServer);
            assert_eq!(config.command_timeout, Duration::from_secs(900));
            assert!(config.connection_string.is_none());
        });
    }

    #[test]
    fn test_load_kind_and_connection_string() {
        with_env_vars(
            &[
                ("DATA_ACCESSOR_KIND", "MySQL"),
                ("DATA_ACCESSOR_CONNECTION_STRING", "mysql://app@localhost/shop"),
            ],
            || {
                let config = load_from_env(ConfigBuilder::new()).build();
                assert_eq!(config.kind, ConnectionKind::MySql);
                assert_eq!(
                    config.connection_string.as_deref(),
                    Some("mysql://app@localhost/shop")
                );
            },
        );
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        with_env_vars(&[("DATA_ACCESSOR_KIND", "postgres")], || {
            let builder = ConfigBuilder::new().kind(ConnectionKind::MySql);
            let config = load_from_env(builder).build();
            assert_eq!(config.kind, ConnectionKind::SqlServer);
        });
    }

    #[test]
    fn test_load_timeout() {
        with_env_vars(&[("DATA_ACCESSOR_COMMAND_TIMEOUT_SECS", "45")], || {
            let config = load_from_env(ConfigBuilder::new()).build();
            assert_eq!(config.command_timeout, Duration::from_secs(45));
        });
    }

    #[test]
    fn test_invalid_timeout_ignored() {
        with_env_vars(&[("DATA_ACCESSOR_COMMAND_TIMEOUT_SECS", "soon")], || {
            let config = load_from_env(ConfigBuilder::new()).build();
            assert_eq!(config.command_timeout, Duration::from_secs(900));
        });
    }

    #[test]
    fn test_logging_vars() {
        with_env_vars(
            &[("RUST_LOG", "data_accessor=trace"), ("DATA_ACCESSOR_JSON_LOGS", "yes")],
            || {
                let config = load_from_env(ConfigBuilder::new()).build();
                assert_eq!(config.logging.log_level, "data_accessor=trace");
                assert!(config.logging.json_logs);
            },
        );
    }
}
