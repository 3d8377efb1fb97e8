//! SELECT, COUNT and paged/windowed SELECT generation.

use tracing::debug;

use super::SqlGenerator;
use crate::error::{SqlGenError, SqlGenResult};
use crate::mapping::TableMap;
use crate::params::Parameters;
use crate::predicate::Predicate;
use crate::sort::Sort;

impl SqlGenerator {
    /// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...]`.
    pub fn build_select(
        &self,
        map: &TableMap,
        predicate: Option<&dyn Predicate>,
        sort: &[Sort],
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let mut sql = self.select_from_where(map, predicate, params)?;
        if !sort.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by(map, sort)?);
        }
        debug!(table = %map, "generated SELECT");
        Ok(sql)
    }

    /// `SELECT COUNT(*) AS <"Total"> FROM <table> [WHERE ...]`.
    pub fn build_count(
        &self,
        map: &TableMap,
        predicate: Option<&dyn Predicate>,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let mut sql = format!(
            "SELECT COUNT(*) AS {} FROM {}",
            self.dialect.quote("Total"),
            self.table_name(map)?
        );
        self.push_where(&mut sql, map, predicate, params)?;
        debug!(table = %map, "generated COUNT");
        Ok(sql)
    }

    /// One zero-based page of an ordered SELECT, via the dialect's paging template.
    pub fn build_paged(
        &self,
        map: &TableMap,
        predicate: Option<&dyn Predicate>,
        sort: &[Sort],
        page: u32,
        page_size: u32,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let inner = self.ordered_select(map, predicate, sort, params)?;
        let sql = self.dialect.paging_sql(&inner, page, page_size, params)?;
        debug!(table = %map, page, page_size, "generated paged SELECT");
        Ok(sql)
    }

    /// `limit` rows of an ordered SELECT starting at `offset`, via the
    /// dialect's window template.
    pub fn build_windowed(
        &self,
        map: &TableMap,
        predicate: Option<&dyn Predicate>,
        sort: &[Sort],
        offset: u64,
        limit: u64,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let inner = self.ordered_select(map, predicate, sort, params)?;
        let sql = self.dialect.window_sql(&inner, offset, limit, params)?;
        debug!(table = %map, offset, limit, "generated windowed SELECT");
        Ok(sql)
    }

    fn ordered_select(
        &self,
        map: &TableMap,
        predicate: Option<&dyn Predicate>,
        sort: &[Sort],
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        // Paging without an order is non-deterministic.
        if sort.is_empty() {
            return Err(SqlGenError::MissingSort);
        }
        self.build_select(map, predicate, sort, params)
    }

    fn select_from_where(
        &self,
        map: &TableMap,
        predicate: Option<&dyn Predicate>,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.build_select_columns(map)?,
            self.table_name(map)?
        );
        self.push_where(&mut sql, map, predicate, params)?;
        Ok(sql)
    }

    pub(super) fn push_where(
        &self,
        sql: &mut String,
        map: &TableMap,
        predicate: Option<&dyn Predicate>,
        params: &mut Parameters,
    ) -> SqlGenResult<()> {
        if let Some(predicate) = predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.to_sql(self, map, params)?);
        }
        Ok(())
    }
}
