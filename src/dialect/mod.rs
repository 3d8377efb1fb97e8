//! SQL dialect policies.
//!
//! A [`Dialect`] owns everything that differs between database engines:
//! identifier quoting, the parameter marker, identity retrieval and the
//! paging/windowing templates. The generator never emits engine-specific
//! syntax itself.

mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SqlGenError, SqlGenResult};
use crate::params::Parameters;

/// Trait for dialect-specific SQL fragments.
pub trait Dialect: Send + Sync + fmt::Debug {
    /// Short lowercase name, used in errors and the CLI.
    fn name(&self) -> &'static str;

    fn open_quote(&self) -> char {
        '"'
    }

    fn close_quote(&self) -> char {
        '"'
    }

    /// Marker prepended to parameter names.
    fn parameter_prefix(&self) -> char {
        '@'
    }

    /// Always-true expression used where a boolean fragment has no terms.
    fn empty_expression(&self) -> &'static str {
        "1=1"
    }

    fn supports_multiple_statements(&self) -> bool {
        true
    }

    fn bool_literal(&self, val: bool) -> &'static str {
        if val { "1" } else { "0" }
    }

    fn is_quoted(&self, value: &str) -> bool {
        let value = value.trim();
        value.len() >= 2
            && value.starts_with(self.open_quote())
            && value.ends_with(self.close_quote())
    }

    /// Quote an identifier unless it already is. Embedded close quotes are doubled.
    fn quote(&self, value: &str) -> String {
        if self.is_quoted(value) {
            return value.trim().to_string();
        }
        let close = self.close_quote();
        let escaped = value.trim().replace(close, &format!("{close}{close}"));
        format!("{}{}{}", self.open_quote(), escaped, close)
    }

    /// Text between a table reference and its alias.
    fn table_alias_separator(&self) -> &'static str {
        " AS "
    }

    /// Schema-qualified, quoted table reference with an optional alias.
    fn table_name(
        &self,
        schema: Option<&str>,
        table: &str,
        alias: Option<&str>,
    ) -> SqlGenResult<String> {
        if table.trim().is_empty() {
            return Err(SqlGenError::EmptyIdentifier("Table"));
        }
        let mut sql = String::new();
        if let Some(schema) = schema.filter(|s| !s.trim().is_empty()) {
            sql.push_str(&self.quote(schema));
            sql.push('.');
        }
        sql.push_str(&self.quote(table));
        if let Some(alias) = alias.filter(|a| !a.trim().is_empty()) {
            sql.push_str(self.table_alias_separator());
            sql.push_str(&self.quote(alias));
        }
        Ok(sql)
    }

    /// Quoted column reference, optionally qualified by `prefix` and aliased.
    fn column_name(
        &self,
        prefix: Option<&str>,
        column: &str,
        alias: Option<&str>,
    ) -> SqlGenResult<String> {
        if column.trim().is_empty() {
            return Err(SqlGenError::EmptyIdentifier("Column"));
        }
        let mut sql = String::new();
        if let Some(prefix) = prefix.filter(|p| !p.trim().is_empty()) {
            sql.push_str(&self.quote(prefix));
            sql.push('.');
        }
        sql.push_str(&self.quote(column));
        if let Some(alias) = alias.filter(|a| !a.trim().is_empty()) {
            sql.push_str(" AS ");
            sql.push_str(&self.quote(alias));
        }
        Ok(sql)
    }

    /// Statement returning the identity generated by the last insert into `table_ref`.
    fn identity_sql(&self, table_ref: &str) -> SqlGenResult<String>;

    /// Restrict `sql` (which already ends in ORDER BY) to zero-based `page`.
    fn paging_sql(
        &self,
        sql: &str,
        page: u32,
        page_size: u32,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let offset = u64::from(page) * u64::from(page_size);
        self.window_sql(sql, offset, u64::from(page_size), params)
    }

    /// Restrict `sql` (which already ends in ORDER BY) to `limit` rows from `offset`.
    fn window_sql(
        &self,
        sql: &str,
        offset: u64,
        limit: u64,
        params: &mut Parameters,
    ) -> SqlGenResult<String>;

    /// Clause appended to an INSERT to read back a trigger-generated key.
    fn trigger_identity_clause(&self, column_ref: &str) -> String {
        format!(" RETURNING {} INTO {}IdOutParam", column_ref, self.parameter_prefix())
    }

    /// Prefixed name of a dialect-owned parameter such as `_offset`.
    fn param(&self, name: &str) -> String {
        format!("{}{}", self.parameter_prefix(), name)
    }

    /// Bind a row count under `param(name)`, rejecting values above `i64::MAX`.
    fn bind_count(&self, params: &mut Parameters, name: &str, value: u64) -> SqlGenResult<String> {
        let param = self.param(name);
        let value = i64::try_from(value).map_err(|_| SqlGenError::OutOfRange {
            parameter: param.clone(),
        })?;
        params.insert(param.clone(), value)?;
        Ok(param)
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    #[value(name = "sqlserver")]
    SqlServer,
    Postgres,
    #[value(name = "mysql")]
    MySql,
    Sqlite,
    Oracle,
}

impl DialectKind {
    pub const ALL: [DialectKind; 5] = [
        DialectKind::SqlServer,
        DialectKind::Postgres,
        DialectKind::MySql,
        DialectKind::Sqlite,
        DialectKind::Oracle,
    ];

    pub fn dialect(&self) -> Box<dyn Dialect> {
        match self {
            DialectKind::SqlServer => Box::new(SqlServerDialect),
            DialectKind::Postgres => Box::new(PostgresDialect),
            DialectKind::MySql => Box::new(MySqlDialect),
            DialectKind::Sqlite => Box::new(SqliteDialect),
            DialectKind::Oracle => Box::new(OracleDialect),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl FromStr for DialectKind {
    type Err = SqlGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" | "tsql" => Ok(DialectKind::SqlServer),
            "postgres" | "postgresql" | "pg" => Ok(DialectKind::Postgres),
            "mysql" | "mariadb" => Ok(DialectKind::MySql),
            "sqlite" => Ok(DialectKind::Sqlite),
            "oracle" => Ok(DialectKind::Oracle),
            other => Err(SqlGenError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}
