use super::Dialect;
use crate::error::SqlGenResult;
use crate::params::Parameters;

/// PostgreSQL.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn bool_literal(&self, val: bool) -> &'static str {
        if val { "true" } else { "false" }
    }

    fn identity_sql(&self, _table_ref: &str) -> SqlGenResult<String> {
        Ok("SELECT LASTVAL() AS \"Id\"".to_string())
    }

    fn window_sql(
        &self,
        sql: &str,
        offset: u64,
        limit: u64,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let limit_param = self.bind_count(params, "_limit", limit)?;
        let offset_param = self.bind_count(params, "_offset", offset)?;
        Ok(format!("{} LIMIT {} OFFSET {}", sql, limit_param, offset_param))
    }
}
