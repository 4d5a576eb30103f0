//! Linter switches and the TOML files they and the lookup tables are read from.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use quest_data::LookupTables;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Optional checks and presentation settings for the linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Hint when a symbol or task name is not written `_name_`.
    pub naming_convention: bool,
    /// Suggest `setvar` for variables and `start task` for tasks.
    pub activation_hints: bool,
    /// Hint when a valid symbol variation has a preferred alternative.
    pub symbol_variation_hints: bool,
    /// Characters of message text quoted in message diagnostics.
    pub preview_length: usize,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            naming_convention: true,
            activation_hints: false,
            symbol_variation_hints: true,
            preview_length: 120,
        }
    }
}

impl LintConfig {
    /// Parse a config; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] for malformed TOML or mistyped values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        debug!("loaded lint config from {}: {config:?}", path.display());
        Ok(config)
    }
}

/// Read lookup tables from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or does not describe [`LookupTables`].
pub fn load_tables(path: impl AsRef<Path>) -> Result<LookupTables, ConfigError> {
    let path = path.as_ref();
    let tables: LookupTables = toml::from_str(&fs::read_to_string(path)?)?;
    debug!(
        "loaded lookup tables from {}: {} symbol shapes, {} actions",
        path.display(),
        tables.symbols.len(),
        tables.actions.len()
    );
    Ok(tables)
}
