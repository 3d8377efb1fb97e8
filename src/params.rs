//! The parameter bag shared by the generator, dialects and predicates while a
//! statement is being built.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::{SqlGenError, SqlGenResult};
use crate::value::SqlValue;

/// Named parameter values for one statement (or one multi-statement batch).
///
/// Keys include the dialect's parameter prefix, exactly as they appear in the
/// generated SQL. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Parameters {
    values: HashMap<String, SqlValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under `name`. A name may only be bound once.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<SqlValue>,
    ) -> SqlGenResult<()> {
        let name = name.into();
        if self.values.contains_key(&name) {
            return Err(SqlGenError::DuplicateParameter(name));
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    /// Bind `value` under a generated `<prefix><stem>_p<n>` name and return it.
    ///
    /// `n` is the bag size before insertion. A property whose own name ends in
    /// `_p<n>` can still produce the same text as a SET placeholder.
    pub fn push(
        &mut self,
        prefix: char,
        stem: &str,
        value: impl Into<SqlValue>,
    ) -> SqlGenResult<String> {
        let name = format!("{}{}_p{}", prefix, stem, self.values.len());
        self.insert(name.clone(), value)?;
        Ok(name)
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries sorted by name, for stable display.
    pub fn sorted(&self) -> Vec<(&str, &SqlValue)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
