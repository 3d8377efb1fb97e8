use super::Dialect;
use crate::error::SqlGenResult;
use crate::params::Parameters;

/// SQLite.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn identity_sql(&self, _table_ref: &str) -> SqlGenResult<String> {
        Ok("SELECT LAST_INSERT_ROWID() AS \"Id\"".to_string())
    }

    fn window_sql(
        &self,
        sql: &str,
        offset: u64,
        limit: u64,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let offset_param = self.bind_count(params, "_offset", offset)?;
        let limit_param = self.bind_count(params, "_limit", limit)?;
        Ok(format!("{} LIMIT {}, {}", sql, offset_param, limit_param))
    }
}
