//! Error types for envschema

use crate::value::ValueKind;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for envschema operations
#[derive(Error, Debug)]
pub enum EnvSchemaError {
    /// One or more schema fields failed to resolve
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A `.env` file could not be loaded
    #[error(transparent)]
    EnvFile(#[from] EnvFileError),

    /// The resolved tree did not fit the requested struct
    #[error("Unable to extract typed configuration: {0}")]
    Extract(String),
}

/// Result type alias for envschema operations
pub type Result<T> = std::result::Result<T, EnvSchemaError>;

/// A single problem found while resolving one schema element.
///
/// The display strings are part of the public contract: callers and log
/// scrapers match on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required leaf's variable is unset or empty
    #[error("Required config element \"{name}\" is missing environment variable {env_var}")]
    MissingRequiredVariable { name: String, env_var: String },

    /// The raw value could not be read as the declared type
    #[error("Config element \"{name}\" unable to parse \"{value}\" as {kind}")]
    CoercionFailure {
        name: String,
        value: String,
        kind: ValueKind,
    },

    /// The user-supplied validator returned false
    #[error("Config element \"{name}\" didn't pass the validator function")]
    ValidatorRejected { name: String },
}

impl ConfigError {
    /// Name of the schema element the error was recorded for
    pub fn name(&self) -> &str {
        match self {
            ConfigError::MissingRequiredVariable { name, .. }
            | ConfigError::CoercionFailure { name, .. }
            | ConfigError::ValidatorRejected { name } => name,
        }
    }
}

/// Combined failure of a resolution pass.
///
/// Displays as every recorded message joined by newlines, in the order the
/// errors were produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_lines(.errors))]
pub struct ResolveError {
    errors: Vec<ConfigError>,
}

impl ResolveError {
    pub fn new(errors: Vec<ConfigError>) -> Self {
        Self { errors }
    }

    /// Individual errors in depth-first schema order
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ConfigError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

fn join_lines(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `.env` file loading errors
#[derive(Error, Debug)]
pub enum EnvFileError {
    /// File exists but could not be read
    #[error("Unable to read env file {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// A line in the file is not `KEY=value`
    #[error("Unable to parse env file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}
