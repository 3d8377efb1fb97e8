use super::Dialect;
use crate::error::{SqlGenError, SqlGenResult};
use crate::params::Parameters;

/// Oracle (ROWNUM windowing, `:` parameters).
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn parameter_prefix(&self) -> char {
        ':'
    }

    fn supports_multiple_statements(&self) -> bool {
        false
    }

    // Oracle rejects AS before a table alias.
    fn table_alias_separator(&self) -> &'static str {
        " "
    }

    fn identity_sql(&self, _table_ref: &str) -> SqlGenResult<String> {
        Err(SqlGenError::Unsupported {
            dialect: "oracle",
            feature: "identity retrieval",
        })
    }

    fn window_sql(
        &self,
        sql: &str,
        offset: u64,
        limit: u64,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let top = offset.checked_add(limit).ok_or_else(|| SqlGenError::OutOfRange {
            parameter: self.param("_topLimit"),
        })?;
        let top_param = self.bind_count(params, "_topLimit", top)?;
        let skip_param = self.bind_count(params, "_toSkip", offset)?;
        Ok(format!(
            "SELECT * FROM (SELECT \"ss_1\".*, ROWNUM RNUM FROM ({}) \"ss_1\" \
             WHERE ROWNUM <= {}) \"ss_2\" WHERE \"ss_2\".RNUM > {}",
            sql, top_param, skip_param
        ))
    }
}
