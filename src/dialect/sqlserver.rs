use super::Dialect;
use crate::error::SqlGenResult;
use crate::params::Parameters;

/// Microsoft SQL Server (2012+).
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerDialect;

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn open_quote(&self) -> char {
        '['
    }

    fn close_quote(&self) -> char {
        ']'
    }

    fn identity_sql(&self, _table_ref: &str) -> SqlGenResult<String> {
        Ok("SELECT CAST(SCOPE_IDENTITY() AS BIGINT) AS [Id]".to_string())
    }

    fn window_sql(
        &self,
        sql: &str,
        offset: u64,
        limit: u64,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        // OFFSET/FETCH is only valid after ORDER BY, which the caller guarantees.
        let offset_param = self.bind_count(params, "_offset", offset)?;
        let limit_param = self.bind_count(params, "_limit", limit)?;
        Ok(format!(
            "{} OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            sql, offset_param, limit_param
        ))
    }
}
