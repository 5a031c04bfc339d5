//! Config
//!
//! Loads the catalog and promotions from YAML files. Unreadable or malformed files are
//! errors; individually invalid entries are logged and skipped.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{catalog::Catalog, promotions::Promotions};

pub mod items;
pub mod rules;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file couldn't be read
    #[error("failed to read {path}")]
    Io {
        /// File that was being read
        path: PathBuf,

        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// The file isn't valid YAML for its format
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Load the catalog from an items file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file can't be read or parsed, or names an unknown
/// currency.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, ConfigError> {
    items::parse_catalog(&read(path.as_ref())?)
}

/// Load promotions from a rules file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file can't be read or parsed.
pub fn load_promotions(
    path: impl AsRef<Path>,
    catalog: &Catalog,
) -> Result<Promotions, ConfigError> {
    rules::parse_promotions(&read(path.as_ref())?, catalog)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
