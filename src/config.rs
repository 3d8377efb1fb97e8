//! Configuration and mapping file loading.
//!
//! Settings come from the first of: an explicit path, `./sqlforge.toml`,
//! `<config dir>/sqlforge/config.toml`. Missing files fall back to defaults.
//!
//! ```toml
//! dialect = "postgres"
//! qualify_columns = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dialect::DialectKind;
use crate::error::{SqlGenError, SqlGenResult};
use crate::generator::GeneratorOptions;
use crate::mapping::TableMap;

pub const CONFIG_FILE: &str = "sqlforge.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dialect: DialectKind,
    pub qualify_columns: bool,
}

impl Config {
    pub fn from_toml_str(content: &str) -> SqlGenResult<Self> {
        toml::from_str(content).map_err(|e| SqlGenError::Config(e.to_string()))
    }

    /// Load from `explicit` if given (it must exist), else from the first
    /// default location that exists.
    pub fn load(explicit: Option<&Path>) -> SqlGenResult<Self> {
        if let Some(path) = explicit {
            return Self::from_toml_str(&fs::read_to_string(path)?);
        }
        match Self::default_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_toml_str(&fs::read_to_string(path)?),
            None => Ok(Self::default()),
        }
    }

    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sqlforge").join("config.toml"));
        }
        paths
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            qualify_columns: self.qualify_columns,
        }
    }
}

/// Read a mapping file; `.json` is parsed as JSON, anything else as TOML.
pub fn load_mapping(path: &Path) -> SqlGenResult<TableMap> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content)
            .map_err(|e| SqlGenError::Config(format!("{}: {}", path.display(), e)))
    } else {
        toml::from_str(&content)
            .map_err(|e| SqlGenError::Config(format!("{}: {}", path.display(), e)))
    }
}
