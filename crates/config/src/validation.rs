//! Error accumulation for a resolution pass

use envschema_types::{ConfigError, ResolveError, ValueKind};
use tracing::warn;

/// Errors recorded during one resolution pass, in the order they occurred
#[derive(Debug, Clone, Default)]
pub struct ErrorList {
    errors: Vec<ConfigError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: ConfigError) {
        warn!(element = error.name(), "{}", error);
        self.errors.push(error);
    }

    pub fn add_missing(&mut self, name: &str, env_var: &str) {
        self.add_error(ConfigError::MissingRequiredVariable {
            name: name.to_string(),
            env_var: env_var.to_string(),
        });
    }

    pub fn add_coercion_failure(&mut self, name: &str, value: &str, kind: ValueKind) {
        self.add_error(ConfigError::CoercionFailure {
            name: name.to_string(),
            value: value.to_string(),
            kind,
        });
    }

    pub fn add_rejection(&mut self, name: &str) {
        self.add_error(ConfigError::ValidatorRejected {
            name: name.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.errors.iter()
    }

    pub fn summary(&self) -> String {
        match self.errors.len() {
            1 => "Resolution: 1 error".to_string(),
            n => format!("Resolution: {} errors", n),
        }
    }

    /// `Ok(value)` when nothing was recorded, otherwise the combined error
    pub fn into_result<T>(self, value: T) -> Result<T, ResolveError> {
        if self.has_errors() {
            Err(ResolveError::new(self.errors))
        } else {
            Ok(value)
        }
    }
}
