//! SQL dialects and the fallback chain.

use std::fmt;

use sqlparser::dialect::{
    Dialect as Grammar, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
};

/// SQL dialect variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL / MariaDB
    MySql,
    /// PostgreSQL
    PostgreSql,
    /// SQL Server (T-SQL)
    MsSql,
    /// Standard SQL
    Generic,
}

impl Dialect {
    /// Order tried when the caller does not pick a dialect.
    pub const FALLBACK_ORDER: [Dialect; 3] = [Dialect::MySql, Dialect::PostgreSql, Dialect::MsSql];

    /// Parse dialect from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::MySql),
            "postgres" | "postgresql" => Some(Self::PostgreSql),
            "mssql" | "tsql" | "transactsql" | "sqlserver" => Some(Self::MsSql),
            "generic" => Some(Self::Generic),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::PostgreSql => "postgresql",
            Self::MsSql => "mssql",
            Self::Generic => "generic",
        }
    }

    /// Grammar used by the underlying SQL parser.
    pub(crate) fn grammar(self) -> Box<dyn Grammar> {
        match self {
            Self::MySql => Box::new(MySqlDialect {}),
            Self::PostgreSql => Box::new(PostgreSqlDialect {}),
            Self::MsSql => Box::new(MsSqlDialect {}),
            Self::Generic => Box::new(GenericDialect {}),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
