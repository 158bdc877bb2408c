//! Connection kinds and the driver binding each one resolves to.

use std::fmt;
use std::str::FromStr;

/// Logical database kind an accessor is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionKind {
    /// Microsoft SQL Server.
    #[default]
    SqlServer,
    /// MySQL or MariaDB.
    MySql,
}

impl ConnectionKind {
    /// Resolve a kind from its name.
    ///
    /// Matching is case-insensitive. Anything other than `mysql` resolves to
    /// SQL Server.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "mysql" => Self::MySql,
            _ => Self::SqlServer,
        }
    }

    /// Driver binding for this kind.
    #[must_use]
    pub const fn provider(self) -> ProviderId {
        match self {
            Self::SqlServer => ProviderId::SqlClient,
            Self::MySql => ProviderId::MySqlClient,
        }
    }

    /// Prefix prepended to parameter names on the wire.
    #[must_use]
    pub const fn parameter_prefix(self) -> &'static str {
        match self {
            Self::SqlServer => "@",
            Self::MySql => "@_",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SqlServer => "sqlserver",
            Self::MySql => "mysql",
        }
    }
}

impl FromStr for ConnectionKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of the native client used for a connection kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// SQL Server client (`tiberius`).
    SqlClient,
    /// MySQL client (`mysql_async`).
    MySqlClient,
}

impl ProviderId {
    /// Invariant name of the provider.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SqlClient => "System.Data.SqlClient",
            Self::MySqlClient => "MySql.Data.MySqlClient",
        }
    }

    /// Crate implementing the wire protocol.
    #[must_use]
    pub const fn driver_crate(self) -> &'static str {
        match self {
            Self::SqlClient => "tiberius",
            Self::MySqlClient => "mysql_async",
        }
    }

    /// Connection kind this provider serves.
    #[must_use]
    pub const fn kind(self) -> ConnectionKind {
        match self {
            Self::SqlClient => ConnectionKind::SqlServer,
            Self::MySqlClient => ConnectionKind::MySql,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
