//! Statement generation.
//!
//! [`SqlGenerator`] turns a [`TableMap`], an optional [`Predicate`] and sort
//! keys into parameterised SQL for one [`Dialect`]. It never executes
//! anything; the only side effect is binding values into the caller's
//! [`Parameters`].

mod delete;
mod insert;
mod select;
mod update;

#[cfg(test)]
mod tests;

pub use insert::Entity;

use crate::config::Config;
use crate::dialect::{Dialect, DialectKind};
use crate::error::SqlGenResult;
use crate::mapping::{ColumnMap, TableMap};
use crate::params::Parameters;
use crate::predicate::Predicate;
use crate::sort::Sort;

/// Knobs that are not part of the dialect itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Qualify every column with the table reference (`"Person"."Name"`).
    pub qualify_columns: bool,
}

/// Dialect-aware SQL generator.
#[derive(Debug)]
pub struct SqlGenerator {
    dialect: Box<dyn Dialect>,
    options: GeneratorOptions,
}

impl SqlGenerator {
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self::from_boxed(Box::new(dialect))
    }

    pub fn from_boxed(dialect: Box<dyn Dialect>) -> Self {
        Self {
            dialect,
            options: GeneratorOptions::default(),
        }
    }

    pub fn for_kind(kind: DialectKind) -> Self {
        Self::from_boxed(kind.dialect())
    }

    pub fn from_config(config: &Config) -> Self {
        Self::for_kind(config.dialect).with_options(config.generator_options())
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Whether the dialect can run the `;`-separated batches produced by the
    /// bulk builders in one call. Informational; nothing here enforces it.
    pub fn supports_multiple_statements(&self) -> bool {
        self.dialect.supports_multiple_statements()
    }

    /// Quoted, schema-qualified table reference.
    pub fn table_name(&self, map: &TableMap) -> SqlGenResult<String> {
        self.dialect.table_name(map.schema.as_deref(), &map.table, None)
    }

    /// Quoted column reference. With `include_alias`, a renamed column is
    /// aliased back to its property name so rows map onto logical fields.
    pub fn column_name(
        &self,
        map: &TableMap,
        column: &ColumnMap,
        include_alias: bool,
    ) -> SqlGenResult<String> {
        let alias = (include_alias && column.is_renamed()).then_some(column.name.as_str());
        let prefix = if self.options.qualify_columns {
            Some(self.table_name(map)?)
        } else {
            None
        };
        self.dialect.column_name(prefix.as_deref(), column.column_name(), alias)
    }

    /// Like [`column_name`](Self::column_name), looking the column up by
    /// property name (case-insensitive, must match exactly one column).
    pub fn column_name_of(
        &self,
        map: &TableMap,
        property: &str,
        include_alias: bool,
    ) -> SqlGenResult<String> {
        self.column_name(map, map.find(property)?, include_alias)
    }

    /// Comma-separated, aliased list of every non-ignored column.
    pub fn build_select_columns(&self, map: &TableMap) -> SqlGenResult<String> {
        let columns = map
            .select_columns()
            .map(|c| self.column_name(map, c, true))
            .collect::<SqlGenResult<Vec<_>>>()?;
        Ok(columns.join(", "))
    }

    /// Render a predicate against `map`.
    pub fn render_predicate(
        &self,
        map: &TableMap,
        predicate: &dyn Predicate,
        params: &mut Parameters,
    ) -> SqlGenResult<String> {
        predicate.to_sql(self, map, params)
    }

    fn order_by(&self, map: &TableMap, sort: &[Sort]) -> SqlGenResult<String> {
        let keys = sort
            .iter()
            .map(|s| -> SqlGenResult<String> {
                let column = self.column_name_of(map, &s.property, false)?;
                Ok(format!("{} {}", column, s.direction()))
            })
            .collect::<SqlGenResult<Vec<_>>>()?;
        Ok(keys.join(", "))
    }

    /// Placeholder for a property, e.g. `@Name` or, with a suffix, `@Name_3`.
    fn placeholder(&self, column: &ColumnMap, suffix: &str) -> String {
        format!("{}{}{}", self.dialect.parameter_prefix(), column.name, suffix)
    }
}
