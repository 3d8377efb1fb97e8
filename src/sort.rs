//! Sort specifications.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SqlGenError;

/// One ORDER BY key, by logical property name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub property: String,
    pub ascending: bool,
}

impl Sort {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: true,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: false,
        }
    }

    pub fn direction(&self) -> &'static str {
        if self.ascending { "ASC" } else { "DESC" }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.direction())
    }
}

/// Parses `Name`, `Name:asc` or `Name:desc`.
impl FromStr for Sort {
    type Err = SqlGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (property, dir) = match s.split_once(':') {
            Some((p, d)) => (p.trim(), d.trim()),
            None => (s.trim(), "asc"),
        };
        if property.is_empty() {
            return Err(SqlGenError::Config(format!("invalid sort '{}'", s)));
        }
        match dir.to_ascii_lowercase().as_str() {
            "asc" => Ok(Sort::asc(property)),
            "desc" => Ok(Sort::desc(property)),
            other => Err(SqlGenError::Config(format!(
                "invalid sort direction '{}', expected asc or desc",
                other
            ))),
        }
    }
}
