//! DELETE and identity retrieval.

use tracing::debug;

use super::SqlGenerator;
use crate::error::{SqlGenError, SqlGenResult};
use crate::mapping::TableMap;
use crate::params::Parameters;
use crate::predicate::Predicate;

impl SqlGenerator {
    /// `DELETE FROM <table> WHERE <predicate>`. A predicate is mandatory.
    pub fn build_delete(
        &self,
        map: &TableMap,
        predicate: Option<&dyn Predicate>,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let predicate = predicate.ok_or(SqlGenError::MissingPredicate)?;
        let mut sql = format!("DELETE FROM {}", self.table_name(map)?);
        self.push_where(&mut sql, map, Some(predicate), params)?;
        debug!(table = %map, "generated DELETE");
        Ok(sql)
    }

    /// The dialect's identity-retrieval statement for `map`'s table.
    pub fn build_identity_sql(&self, map: &TableMap) -> SqlGenResult<String> {
        self.dialect.identity_sql(&self.table_name(map)?)
    }
}
