use super::Dialect;
use crate::error::SqlGenResult;
use crate::params::Parameters;

/// MySQL and MariaDB.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn open_quote(&self) -> char {
        '`'
    }

    fn close_quote(&self) -> char {
        '`'
    }

    fn identity_sql(&self, _table_ref: &str) -> SqlGenResult<String> {
        Ok("SELECT CONVERT(LAST_INSERT_ID(), SIGNED INTEGER) AS ID".to_string())
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
