//! Declarative environment configuration
//!
//! Describe the variables an application expects as a schema of typed
//! leaves and nested objects, then resolve it against the environment in a
//! single pass. Every missing, unparsable or rejected value is reported at
//! once; a configuration is only returned when all of them are valid.
//!
//! ```no_run
//! use envschema::{configz, int, object, string, RawSchema};
//!
//! let config = configz(
//!     RawSchema::new()
//!         .field("env", string("NODE_ENV"))
//!         .field(
//!             "server",
//!             object()
//!                 .property("port", int("SERVER_PORT").validator(|port, _| *port > 0))
//!                 .property("host", string("SERVER_HOST")),
//!         ),
//! )
//! .unwrap_or_else(|e| panic!("{}", e));
//!
//! assert!(config.lookup("server.port").is_some());
//! ```

pub mod env;
pub mod env_files;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use env_files::{dotenvize, EnvFiles, DEFAULT_ENV_NAME_VAR};
pub use loader::{configz, resolve, BooleanMode, ConfigLoader, Resolver};
pub use schema::*;
pub use validation::ErrorList;

pub use envschema_types::{
    ConfigError, ConfigValue, EnvFileError, EnvSchemaError, ResolveError, ResolvedConfig,
    ValueKind,
};
