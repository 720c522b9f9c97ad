//! Shared types for envschema
//!
//! This crate contains the error taxonomy, the resolved configuration tree
//! and the value-parsing helpers used by the schema resolver.

mod de;
pub mod error;
pub mod utils;
pub mod value;

// Re-export commonly used types
pub use error::{ConfigError, EnvFileError, EnvSchemaError, ResolveError, Result};
pub use value::{ConfigValue, ResolvedConfig, ValueKind};
