//! UPDATE and bulk UPDATE generation.

use tracing::{debug, trace, warn};

use super::SqlGenerator;
use crate::error::{SqlGenError, SqlGenResult};
use crate::mapping::{ColumnMap, TableMap};
use crate::params::Parameters;
use crate::predicate::Predicate;

impl SqlGenerator {
    /// `UPDATE <table> SET <col> = <param>, ... WHERE <predicate>`.
    ///
    /// A predicate is mandatory. With `ignore_all_keys` only non-key columns
    /// are set; otherwise a trigger identity column may be updated too.
    pub fn build_update(
        &self,
        map: &TableMap,
        predicate: Option<&dyn Predicate>,
        params: &mut Parameters,
        ignore_all_keys: bool,
    ) -> SqlGenResult<String> {
        let predicate = predicate.ok_or(SqlGenError::MissingPredicate)?;
        let columns = update_columns(map, ignore_all_keys)?;
        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            self.table_name(map)?,
            self.set_list(map, &columns, "")?,
            self.guarded_where(map, predicate, &columns, "", params)?
        );
        debug!(table = %map, columns = columns.len(), "generated UPDATE");
        Ok(sql)
    }

    /// One `UPDATE ... ;` per predicate, newline separated.
    ///
    /// SET placeholders of statement `i` are suffixed `_i` so the same
    /// property can be bound once per statement within one batch.
    pub fn build_bulk_update<P: Predicate>(
        &self,
        map: &TableMap,
        predicates: &[P],
        params: &mut Parameters,
        ignore_all_keys: bool,
    ) -> SqlGenResult<String> {
        if predicates.is_empty() {
            return Err(SqlGenError::EmptyPredicateList);
        }
        let columns = update_columns(map, ignore_all_keys)?;
        let table = self.table_name(map)?;

        let mut statements = Vec::with_capacity(predicates.len());
        for (i, predicate) in predicates.iter().enumerate() {
            trace!(table = %map, index = i, "bulk UPDATE statement");
            let suffix = format!("_{}", i);
            statements.push(format!(
                "UPDATE {} SET {} WHERE {};",
                table,
                self.set_list(map, &columns, &suffix)?,
                self.guarded_where(map, predicate, &columns, &suffix, params)?
            ));
        }

        if statements.len() > 1 && !self.supports_multiple_statements() {
            warn!(
                dialect = self.dialect.name(),
                statements = statements.len(),
                "bulk UPDATE generated for a dialect without multi-statement support"
            );
        }
        debug!(table = %map, statements = statements.len(), "generated bulk UPDATE");
        Ok(statements.join("\n"))
    }

    /// Render the WHERE predicate, failing if it binds a value under one of
    /// the statement's own SET placeholders (a property named `Id_p0`, say).
    fn guarded_where<P: Predicate + ?Sized>(
        &self,
        map: &TableMap,
        predicate: &P,
        columns: &[&ColumnMap],
        suffix: &str,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        let placeholders: Vec<(String, bool)> = columns
            .iter()
            .map(|c| {
                let name = self.placeholder(c, suffix);
                let bound = params.contains(&name);
                (name, bound)
            })
            .collect();
        let sql = predicate.to_sql(self, map, params)?;
        match placeholders
            .into_iter()
            .find(|(name, bound)| !bound && params.contains(name))
        {
            Some((name, _)) => Err(SqlGenError::DuplicateParameter(name)),
            None => Ok(sql),
        }
    }

    fn set_list(
        &self,
        map: &TableMap,
        columns: &[&ColumnMap],
        suffix: &str,
    ) -> SqlGenResult<String> {
        let assignments = columns
            .iter()
            .map(|c| -> SqlGenResult<String> {
                Ok(format!(
                    "{} = {}",
                    self.column_name(map, c, false)?,
                    self.placeholder(c, suffix)
                ))
            })
            .collect::<SqlGenResult<Vec<_>>>()?;
        Ok(assignments.join(", "))
    }
}

fn update_columns(map: &TableMap, ignore_all_keys: bool) -> SqlGenResult<Vec<&ColumnMap>> {
    let columns: Vec<&ColumnMap> = map.update_columns(ignore_all_keys).collect();
    if columns.is_empty() {
        return Err(SqlGenError::no_columns(map.to_string()));
    }
    Ok(columns)
}
