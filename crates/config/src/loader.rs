//! Schema resolution
//!
//! Walks a normalized [`Schema`], reads each leaf's variable from an
//! [`EnvSource`], coerces it to the declared type and runs the leaf's
//! validator. Errors are accumulated for the whole tree; the pass fails as a
//! unit once traversal is complete.

use crate::env::{EnvSource, ProcessEnv};
use crate::schema::{LeafElement, RawSchema, Schema, SchemaElement};
use crate::validation::ErrorList;
use envschema_types::utils::{parse_leading_float, parse_leading_int, parse_strict_bool};
use envschema_types::{ConfigValue, ResolveError, ResolvedConfig, ValueKind};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// How `boolean` leaves interpret their raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanMode {
    /// Any non-empty value is `true`, including `"false"` and `"0"`
    #[default]
    Truthy,
    /// Only canonical words are accepted, see [`parse_strict_bool`]
    Strict,
}

/// Single-pass resolver over a normalized schema
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    schema: &'a Schema,
    boolean_mode: BooleanMode,
}

impl<'a> Resolver<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            boolean_mode: BooleanMode::default(),
        }
    }

    pub fn boolean_mode(mut self, mode: BooleanMode) -> Self {
        self.boolean_mode = mode;
        self
    }

    /// Resolve every field of the schema against `env`
    pub fn resolve<E: EnvSource + ?Sized>(&self, env: &E) -> Result<ResolvedConfig, ResolveError> {
        let mut errors = ErrorList::new();
        let mut config = ResolvedConfig::new();

        for (name, element) in self.schema.iter() {
            let value = self.resolve_element(name, element, env, &mut errors);
            config.insert(name, value);
        }

        if errors.has_errors() {
            debug!("{}", errors.summary());
        } else {
            info!(fields = config.len(), "configuration resolved");
        }
        errors.into_result(config)
    }

    fn resolve_element<E: EnvSource + ?Sized>(
        &self,
        name: &str,
        element: &SchemaElement,
        env: &E,
        errors: &mut ErrorList,
    ) -> Option<ConfigValue> {
        match element {
            SchemaElement::String(leaf) => self
                .resolve_leaf(name, leaf, ValueKind::String, env, errors, |raw| {
                    Some(raw.to_string())
                })
                .map(ConfigValue::String),
            SchemaElement::Int(leaf) => self
                .resolve_leaf(name, leaf, ValueKind::Int, env, errors, parse_leading_int)
                .map(ConfigValue::Int),
            SchemaElement::Float(leaf) => self
                .resolve_leaf(name, leaf, ValueKind::Float, env, errors, parse_leading_float)
                .map(ConfigValue::Float),
            SchemaElement::Boolean(leaf) => {
                let mode = self.boolean_mode;
                self.resolve_leaf(name, leaf, ValueKind::Boolean, env, errors, |raw| {
                    coerce_boolean(raw, mode)
                })
                .map(ConfigValue::Boolean)
            }
            SchemaElement::Object(object) => {
                let mut nested = ResolvedConfig::new();
                for (property, child) in object.properties() {
                    let value = self.resolve_element(property, child, env, errors);
                    nested.insert(property, value);
                }
                Some(ConfigValue::Object(nested))
            }
        }
    }

    fn resolve_leaf<T, E, F>(
        &self,
        name: &str,
        leaf: &LeafElement<T>,
        kind: ValueKind,
        env: &E,
        errors: &mut ErrorList,
        coerce: F,
    ) -> Option<T>
    where
        E: EnvSource + ?Sized,
        F: FnOnce(&str) -> Option<T>,
    {
        let raw = match env.var(leaf.env_var()) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                if leaf.is_required() {
                    errors.add_missing(name, leaf.env_var());
                } else {
                    debug!(element = name, env_var = leaf.env_var(), "optional config element not set");
                }
                return None;
            }
        };

        let Some(value) = coerce(&raw) else {
            errors.add_coercion_failure(name, &raw, kind);
            return None;
        };

        if !leaf.accepts(&value, self.schema) {
            errors.add_rejection(name);
            return None;
        }

        // Raw values may be secrets; only the source is logged.
        debug!(element = name, env_var = leaf.env_var(), %kind, "resolved config element");
        Some(value)
    }
}

fn coerce_boolean(raw: &str, mode: BooleanMode) -> Option<bool> {
    match mode {
        // Empty values never reach coercion, so this is always true.
        BooleanMode::Truthy => Some(!raw.is_empty()),
        BooleanMode::Strict => parse_strict_bool(raw),
    }
}

/// Resolve `schema` against `env` with default options
pub fn resolve<E: EnvSource + ?Sized>(schema: &Schema, env: &E) -> Result<ResolvedConfig, ResolveError> {
    Resolver::new(schema).resolve(env)
}

/// Normalize `raw` and resolve it against the process environment
pub fn configz(raw: RawSchema) -> Result<ResolvedConfig, ResolveError> {
    ConfigLoader::load(raw)
}

/// Entry points that normalize a raw schema and resolve it in one call
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the process environment
    pub fn load(raw: RawSchema) -> Result<ResolvedConfig, ResolveError> {
        Self::load_from(raw, &ProcessEnv)
    }

    /// Load configuration from an explicit variable source
    pub fn load_from<E: EnvSource + ?Sized>(raw: RawSchema, env: &E) -> Result<ResolvedConfig, ResolveError> {
        let schema = Schema::normalize(raw);
        resolve(&schema, env)
    }

    /// Load configuration from the process environment into a typed struct
    pub fn load_into<T: DeserializeOwned>(raw: RawSchema) -> envschema_types::Result<T> {
        Self::load_into_from(raw, &ProcessEnv)
    }

    /// Load configuration from an explicit source into a typed struct
    pub fn load_into_from<T, E>(raw: RawSchema, env: &E) -> envschema_types::Result<T>
    where
        T: DeserializeOwned,
        E: EnvSource + ?Sized,
    {
        let config = Self::load_from(raw, env)?;
        config.deserialize_into()
    }
}
