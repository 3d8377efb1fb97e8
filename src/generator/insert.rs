//! INSERT and bulk INSERT generation.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, trace};

use super::SqlGenerator;
use crate::error::{SqlGenError, SqlGenResult};
use crate::mapping::{ColumnMap, TableMap};
use crate::value::SqlValue;

/// A row source for [`SqlGenerator::build_bulk_insert_values`].
pub trait Entity {
    /// Value of a logical property; `None` renders as `NULL`.
    fn value(&self, property: &str) -> Option<SqlValue>;
}

impl Entity for HashMap<String, SqlValue> {
    fn value(&self, property: &str) -> Option<SqlValue> {
        self.get(property).cloned()
    }
}

impl Entity for BTreeMap<String, SqlValue> {
    fn value(&self, property: &str) -> Option<SqlValue> {
        self.get(property).cloned()
    }
}

impl SqlGenerator {
    /// `INSERT INTO <table> (<cols>) VALUES (<params>)`, with a trigger
    /// identity output clause when the mapping has one.
    pub fn build_insert(&self, map: &TableMap) -> SqlGenResult<String> {
        let columns = writable_columns(map)?;
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table_name(map)?,
            self.column_list(map, &columns)?,
            self.placeholder_list(&columns, "")
        );

        let triggers: Vec<&ColumnMap> = map.trigger_identity_columns().collect();
        match triggers.as_slice() {
            [] => {}
            [column] => {
                let column_ref = self.column_name(map, column, false)?;
                sql.push_str(&self.dialect.trigger_identity_clause(&column_ref));
            }
            many => {
                return Err(SqlGenError::MultiColumnTriggerIdentityUnsupported {
                    table: map.to_string(),
                    count: many.len(),
                });
            }
        }

        debug!(table = %map, columns = columns.len(), "generated INSERT");
        Ok(sql)
    }

    /// Multi-row INSERT, one statement per distinct (schema, table).
    ///
    /// Each entry of `maps` stands for one row. Rows are grouped with the other
    /// entries of the same table, in order of first appearance, and their
    /// placeholders carry the row's index within its group (`@Name0`, `@Name1`).
    /// Fails with [`SqlGenError::DuplicateParameter`] when two placeholders of
    /// one statement render alike, as `A` at row 10 and `A1` at row 0 would.
    pub fn build_bulk_insert(&self, maps: &[&TableMap]) -> SqlGenResult<String> {
        if maps.is_empty() {
            return Err(SqlGenError::EmptyBatch);
        }

        let mut groups: Vec<(&TableMap, usize)> = Vec::new();
        for &map in maps {
            match groups.iter_mut().find(|(g, _)| g.same_table(map)) {
                Some((_, rows)) => *rows += 1,
                None => groups.push((map, 1)),
            }
        }

        let mut statements = Vec::with_capacity(groups.len());
        for (map, rows) in groups {
            let columns = writable_columns(map)?;
            let mut seen = HashSet::new();
            let mut values = Vec::with_capacity(rows);
            for i in 0..rows {
                let suffix = i.to_string();
                let mut row = Vec::with_capacity(columns.len());
                for column in &columns {
                    let name = self.placeholder(column, &suffix);
                    if !seen.insert(name.clone()) {
                        return Err(SqlGenError::DuplicateParameter(name));
                    }
                    row.push(name);
                }
                values.push(format!("({})", row.join(", ")));
            }
            trace!(table = %map, rows, "bulk INSERT group");
            statements.push(format!(
                "INSERT INTO {} ({}) VALUES\n{};",
                self.table_name(map)?,
                self.column_list(map, &columns)?,
                values.join(",\n")
            ));
        }

        debug!(statements = statements.len(), rows = maps.len(), "generated bulk INSERT");
        Ok(statements.join("\n"))
    }

    /// Multi-row INSERT with values rendered inline as typed literals.
    pub fn build_bulk_insert_values<E: Entity>(
        &self,
        map: &TableMap,
        rows: &[E],
    ) -> SqlGenResult<String> {
        if rows.is_empty() {
            return Err(SqlGenError::EmptyBatch);
        }
        let columns = writable_columns(map)?;
        let values: Vec<String> = rows
            .iter()
            .map(|row| {
                let literals: Vec<String> = columns
                    .iter()
                    .map(|c| {
                        row.value(&c.name)
                            .unwrap_or(SqlValue::Null)
                            .to_literal(self.dialect())
                    })
                    .collect();
                format!("({})", literals.join(", "))
            })
            .collect();

        debug!(table = %map, rows = rows.len(), "generated literal bulk INSERT");
        Ok(format!(
            "INSERT INTO {} ({}) VALUES\n{};",
            self.table_name(map)?,
            self.column_list(map, &columns)?,
            values.join(",\n")
        ))
    }

    fn column_list(&self, map: &TableMap, columns: &[&ColumnMap]) -> SqlGenResult<String> {
        let names = columns
            .iter()
            .map(|c| self.column_name(map, c, false))
            .collect::<SqlGenResult<Vec<_>>>()?;
        Ok(names.join(", "))
    }

    fn placeholder_list(&self, columns: &[&ColumnMap], suffix: &str) -> String {
        columns
            .iter()
            .map(|c| self.placeholder(c, suffix))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn writable_columns(map: &TableMap) -> SqlGenResult<Vec<&ColumnMap>> {
    let columns: Vec<&ColumnMap> = map.insert_columns().collect();
    if columns.is_empty() {
        return Err(SqlGenError::no_columns(map.to_string()));
    }
    Ok(columns)
}
