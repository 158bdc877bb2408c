//! TOML configuration file loading

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::builder::ConfigBuilder;
use crate::Result;
use crate::kind::ConnectionKind;

/// Configuration file locations checked in order
const CONFIG_PATHS: &[&str] = &[
    "./data-accessor.toml",
    "~/.config/data-accessor/config.toml",
    "/etc/data-accessor/config.toml",
];

/// Find the first existing configuration file
pub fn find_config_file() -> Option<PathBuf> {
    for path_str in CONFIG_PATHS {
        let path = if path_str.starts_with('~') {
            if let Ok(home) = std::env::var("HOME") {
                PathBuf::from(path_str.replacen('~', &home, 1))
            } else {
                continue;
            }
        } else {
            PathBuf::from(path_str)
        };

        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path, builder: ConfigBuilder) -> Result<ConfigBuilder> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::Error::config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let file_config: FileConfig = toml::from_str(&content).map_err(|e| {
        crate::Error::config(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(apply_file_config(builder, file_config))
}

fn apply_file_config(mut builder: ConfigBuilder, config: FileConfig) -> ConfigBuilder {
    if let Some(conn) = config.connection {
        if let Some(kind) = conn.kind {
            builder = builder.kind(ConnectionKind::from_name(&kind));
        }

        if let Some(connection_string) = conn.connection_string {
            builder = builder.connection_string(connection_string);
        }

        if let Some(secs) = conn.command_timeout_secs {
            builder = builder.command_timeout(Duration::from_secs(secs));
        }
    }

    if let Some(logging) = config.logging {
        if let Some(level) = logging.log_level {
            builder = builder.log_level(level);
        }

        if let Some(json) = logging.json_logs {
            builder = builder.json_logs(json);
        }
    }

    builder
}

/// Root configuration file structure
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    connection: Option<ConnectionConfig>,
    logging: Option<LoggingFileConfig>,
}

#[derive(Debug, Deserialize)]
struct ConnectionConfig {
    kind: Option<String>,
    connection_string: Option<String>,
    command_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct LoggingFileConfig {
    log_level: Option<String>,
    json_logs: Option<bool>,
}
