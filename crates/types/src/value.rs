//! Resolved configuration values

use crate::de::FieldDeserializer;
use crate::error::{EnvSchemaError, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Declared type of a schema element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Int,
    Float,
    Boolean,
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single resolved field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    Object(ResolvedConfig),
}

impl ConfigValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::String(_) => ValueKind::String,
            ConfigValue::Int(_) => ValueKind::Int,
            ConfigValue::Float(_) => ValueKind::Float,
            ConfigValue::Boolean(_) => ValueKind::Boolean,
            ConfigValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ResolvedConfig> {
        match self {
            ConfigValue::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

impl From<ResolvedConfig> for ConfigValue {
    fn from(value: ResolvedConfig) -> Self {
        ConfigValue::Object(value)
    }
}

/// Configuration tree produced by a successful resolution pass.
///
/// Field order follows schema declaration order. A field mapped to `None`
/// is an optional leaf whose variable was unset or empty; it serializes as
/// `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    fields: IndexMap<String, Option<ConfigValue>>,
}

impl ResolvedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, keeping the first insertion position on overwrite
    pub fn insert(&mut self, name: impl Into<String>, value: Option<ConfigValue>) {
        self.fields.insert(name.into(), value);
    }

    /// Builder-style insert, mostly for assembling expected trees in tests
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Builder-style insert of an absent field
    pub fn with_absent(mut self, name: impl Into<String>) -> Self {
        self.insert(name, None);
        self
    }

    /// Returns the value of a field, `None` when the field is unknown or absent
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    /// Whether the schema declared this field, regardless of presence
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ConfigValue::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ConfigValue::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ConfigValue::as_float)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ConfigValue::as_bool)
    }

    pub fn get_object(&self, name: &str) -> Option<&ResolvedConfig> {
        self.get(name).and_then(ConfigValue::as_object)
    }

    /// Walk a dotted path such as `server.port`
    pub fn lookup(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ConfigValue>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deserialize the tree into a caller-defined struct.
    ///
    /// Absent leaves map onto `Option` fields as `None`. Float values,
    /// including infinities, reach the target unchanged.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        let root = FieldDeserializer::new(Some(ConfigValue::Object(self.clone())));
        T::deserialize(root).map_err(|e| EnvSchemaError::Extract(e.to_string()))
    }

    pub(crate) fn into_fields(self) -> impl Iterator<Item = (String, Option<ConfigValue>)> {
        self.fields.into_iter()
    }
}
