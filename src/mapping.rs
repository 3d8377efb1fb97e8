//! Table mapping descriptions.
//!
//! A [`TableMap`] ties a table (optionally schema-qualified) to an ordered list
//! of [`ColumnMap`]s. Each column carries its logical property name, the
//! physical column name, and a [`KeyType`] that decides whether it is written
//! by INSERT and UPDATE.
//!
//! ```
//! use sqlforge::mapping::{ColumnMap, KeyType, TableMap};
//!
//! let person = TableMap::new("Person")
//!     .column(ColumnMap::new("Id").key(KeyType::Identity))
//!     .column(ColumnMap::new("Name"))
//!     .column(ColumnMap::new("Age"));
//!
//! let names: Vec<_> = person.insert_columns().map(|c| c.name.as_str()).collect();
//! assert_eq!(names, ["Name", "Age"]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SqlGenError, SqlGenResult};

/// How a column participates in key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    /// Plain data column.
    #[default]
    NotAKey,
    /// Key value supplied by the caller.
    Assigned,
    /// Key generated by the database (identity / auto-increment).
    Identity,
    /// Key generated by a trigger and read back through an output parameter.
    TriggerIdentity,
}

impl KeyType {
    pub fn is_key(self) -> bool {
        self != KeyType::NotAKey
    }

    /// Whether the database, not the caller, produces the value.
    pub fn is_generated(self) -> bool {
        matches!(self, KeyType::Identity | KeyType::TriggerIdentity)
    }
}

/// A mapped column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    /// Logical property name, used for parameters and aliases.
    pub name: String,
    /// Physical column name; defaults to `name`.
    #[serde(default)]
    column: Option<String>,
    #[serde(default)]
    pub key: KeyType,
    #[serde(default)]
    pub ignored: bool,
    #[serde(default)]
    pub read_only: bool,
}

impl ColumnMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: None,
            key: KeyType::NotAKey,
            ignored: false,
            read_only: false,
        }
    }

    /// Map the property to a differently named physical column.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn key(mut self, key: KeyType) -> Self {
        self.key = key;
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Physical column name.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    /// True when the physical name differs from the property name.
    pub fn is_renamed(&self) -> bool {
        self.column_name() != self.name
    }

    fn is_writable(&self) -> bool {
        !(self.ignored || self.read_only)
    }
}

/// A mapped table: identity plus ordered columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMap {
    #[serde(default)]
    pub schema: Option<String>,
    pub table: String,
    #[serde(default)]
    pub columns: Vec<ColumnMap>,
}

impl TableMap {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            columns: Vec::new(),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn column(mut self, column: ColumnMap) -> Self {
        self.columns.push(column);
        self
    }

    /// The (schema, table) pair two mappings must share to land in the same
    /// bulk INSERT statement.
    pub fn identity(&self) -> (Option<&str>, &str) {
        (self.schema.as_deref(), self.table.as_str())
    }

    pub fn same_table(&self, other: &TableMap) -> bool {
        self.identity() == other.identity()
    }

    /// Case-insensitive lookup by logical property name. The name must match
    /// exactly one column.
    pub fn find(&self, property: &str) -> SqlGenResult<&ColumnMap> {
        let mut matches = self
            .columns
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case(property));
        match (matches.next(), matches.next()) {
            (Some(column), None) => Ok(column),
            (None, _) => Err(SqlGenError::unknown_column(property, &self.table)),
            (Some(_), Some(_)) => Err(SqlGenError::ambiguous_column(property, &self.table)),
        }
    }

    /// Columns returned by SELECT.
    pub fn select_columns(&self) -> impl Iterator<Item = &ColumnMap> {
        self.columns.iter().filter(|c| !c.ignored)
    }

    /// Columns written by INSERT: everything writable except generated keys.
    pub fn insert_columns(&self) -> impl Iterator<Item = &ColumnMap> {
        self.columns
            .iter()
            .filter(|c| c.is_writable() && !c.key.is_generated())
    }

    /// Columns written by UPDATE.
    ///
    /// With `ignore_all_keys` only plain columns are set; otherwise identity
    /// and assigned keys are skipped but a trigger identity may be updated.
    pub fn update_columns(&self, ignore_all_keys: bool) -> impl Iterator<Item = &ColumnMap> {
        self.columns.iter().filter(move |c| {
            c.is_writable()
                && if ignore_all_keys {
                    !c.key.is_key()
                } else {
                    !matches!(c.key, KeyType::Identity | KeyType::Assigned)
                }
        })
    }

    pub fn trigger_identity_columns(&self) -> impl Iterator<Item = &ColumnMap> {
        self.columns
            .iter()
            .filter(|c| c.key == KeyType::TriggerIdentity)
    }
}

impl fmt::Display for TableMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}
