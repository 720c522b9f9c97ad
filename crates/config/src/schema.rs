//! Schema definitions
//!
//! A schema is described with the raw builders ([`string`], [`int`],
//! [`float`], [`boolean`], [`object`]) collected in a [`RawSchema`], then
//! normalized once into an immutable [`Schema`] that the resolver walks.

use envschema_types::ValueKind;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Predicate over a coerced value and the whole normalized schema
pub type Validator<T> = Arc<dyn Fn(&T, &Schema) -> bool + Send + Sync>;

/// Leaf description as supplied by the caller, before defaults are applied
pub struct RawLeaf<T> {
    env_var: String,
    required: Option<bool>,
    description: Option<String>,
    validator: Option<Validator<T>>,
}

impl<T> RawLeaf<T> {
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            required: None,
            description: None,
            validator: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Shorthand for `required(false)`
    pub fn optional(self) -> Self {
        self.required(false)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T, &Schema) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    fn normalize(self) -> LeafElement<T> {
        LeafElement {
            env_var: self.env_var,
            required: self.required.unwrap_or(true),
            description: self.description,
            validator: self.validator,
        }
    }
}

/// Object description as supplied by the caller
#[derive(Default)]
pub struct RawObject {
    properties: IndexMap<String, RawElement>,
    description: Option<String>,
}

impl RawObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: impl Into<String>, element: impl Into<RawElement>) -> Self {
        self.properties.insert(name.into(), element.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn normalize(self) -> ObjectElement {
        ObjectElement {
            properties: self
                .properties
                .into_iter()
                .map(|(name, element)| (name, element.normalize()))
                .collect(),
            description: self.description,
        }
    }
}

/// Raw schema element, one variant per declared type
pub enum RawElement {
    String(RawLeaf<String>),
    Int(RawLeaf<i64>),
    Float(RawLeaf<f64>),
    Boolean(RawLeaf<bool>),
    Object(RawObject),
}

impl RawElement {
    fn normalize(self) -> SchemaElement {
        match self {
            RawElement::String(leaf) => SchemaElement::String(leaf.normalize()),
            RawElement::Int(leaf) => SchemaElement::Int(leaf.normalize()),
            RawElement::Float(leaf) => SchemaElement::Float(leaf.normalize()),
            RawElement::Boolean(leaf) => SchemaElement::Boolean(leaf.normalize()),
            RawElement::Object(object) => SchemaElement::Object(object.normalize()),
        }
    }
}

impl From<RawLeaf<String>> for RawElement {
    fn from(leaf: RawLeaf<String>) -> Self {
        RawElement::String(leaf)
    }
}

impl From<RawLeaf<i64>> for RawElement {
    fn from(leaf: RawLeaf<i64>) -> Self {
        RawElement::Int(leaf)
    }
}

impl From<RawLeaf<f64>> for RawElement {
    fn from(leaf: RawLeaf<f64>) -> Self {
        RawElement::Float(leaf)
    }
}

impl From<RawLeaf<bool>> for RawElement {
    fn from(leaf: RawLeaf<bool>) -> Self {
        RawElement::Boolean(leaf)
    }
}

impl From<RawObject> for RawElement {
    fn from(object: RawObject) -> Self {
        RawElement::Object(object)
    }
}

/// String leaf read from `env_var`
pub fn string(env_var: impl Into<String>) -> RawLeaf<String> {
    RawLeaf::new(env_var)
}

/// Integer leaf read from `env_var`
pub fn int(env_var: impl Into<String>) -> RawLeaf<i64> {
    RawLeaf::new(env_var)
}

/// Floating point leaf read from `env_var`
pub fn float(env_var: impl Into<String>) -> RawLeaf<f64> {
    RawLeaf::new(env_var)
}

/// Boolean leaf read from `env_var`
pub fn boolean(env_var: impl Into<String>) -> RawLeaf<bool> {
    RawLeaf::new(env_var)
}

/// Object grouping nested elements
pub fn object() -> RawObject {
    RawObject::new()
}

/// Top-level raw schema: field name to raw element, in declaration order
#[derive(Default)]
pub struct RawSchema {
    fields: IndexMap<String, RawElement>,
}

impl RawSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, element: impl Into<RawElement>) -> Self {
        self.insert(name, element);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, element: impl Into<RawElement>) {
        self.fields.insert(name.into(), element.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Normalized leaf element
pub struct LeafElement<T> {
    env_var: String,
    required: bool,
    description: Option<String>,
    validator: Option<Validator<T>>,
}

impl<T> LeafElement<T> {
    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Run the validator, if any. Elements without one accept everything.
    pub fn accepts(&self, value: &T, schema: &Schema) -> bool {
        self.validator
            .as_ref()
            .map_or(true, |validator| (**validator)(value, schema))
    }
}

impl<T> Clone for LeafElement<T> {
    fn clone(&self) -> Self {
        Self {
            env_var: self.env_var.clone(),
            required: self.required,
            description: self.description.clone(),
            validator: self.validator.clone(),
        }
    }
}

impl<T> fmt::Debug for LeafElement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafElement")
            .field("env_var", &self.env_var)
            .field("required", &self.required)
            .field("description", &self.description)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Normalized object element
#[derive(Debug, Clone)]
pub struct ObjectElement {
    properties: IndexMap<String, SchemaElement>,
    description: Option<String>,
}

impl ObjectElement {
    pub fn properties(&self) -> impl Iterator<Item = (&str, &SchemaElement)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&SchemaElement> {
        self.properties.get(name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Normalized schema element
#[derive(Debug, Clone)]
pub enum SchemaElement {
    String(LeafElement<String>),
    Int(LeafElement<i64>),
    Float(LeafElement<f64>),
    Boolean(LeafElement<bool>),
    Object(ObjectElement),
}

impl SchemaElement {
    pub fn kind(&self) -> ValueKind {
        match self {
            SchemaElement::String(_) => ValueKind::String,
            SchemaElement::Int(_) => ValueKind::Int,
            SchemaElement::Float(_) => ValueKind::Float,
            SchemaElement::Boolean(_) => ValueKind::Boolean,
            SchemaElement::Object(_) => ValueKind::Object,
        }
    }

    /// Source variable of a leaf; objects have none
    pub fn env_var(&self) -> Option<&str> {
        match self {
            SchemaElement::String(leaf) => Some(leaf.env_var()),
            SchemaElement::Int(leaf) => Some(leaf.env_var()),
            SchemaElement::Float(leaf) => Some(leaf.env_var()),
            SchemaElement::Boolean(leaf) => Some(leaf.env_var()),
            SchemaElement::Object(_) => None,
        }
    }

    /// Required-ness of a leaf; objects have none
    pub fn required(&self) -> Option<bool> {
        match self {
            SchemaElement::String(leaf) => Some(leaf.is_required()),
            SchemaElement::Int(leaf) => Some(leaf.is_required()),
            SchemaElement::Float(leaf) => Some(leaf.is_required()),
            SchemaElement::Boolean(leaf) => Some(leaf.is_required()),
            SchemaElement::Object(_) => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaElement::String(leaf) => leaf.description(),
            SchemaElement::Int(leaf) => leaf.description(),
            SchemaElement::Float(leaf) => leaf.description(),
            SchemaElement::Boolean(leaf) => leaf.description(),
            SchemaElement::Object(object) => object.description(),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectElement> {
        match self {
            SchemaElement::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// One leaf of the schema, flattened for documentation output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVarDoc {
    /// Dotted path of the field, e.g. `server.port`
    pub path: String,
    pub env_var: String,
    pub kind: ValueKind,
    pub required: bool,
    pub description: Option<String>,
}

/// Normalized, immutable schema tree
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, SchemaElement>,
}

impl Schema {
    /// Apply defaults to every element of a raw schema.
    ///
    /// Only `required` has a default (`true`); everything else is copied.
    pub fn normalize(raw: RawSchema) -> Self {
        let fields: IndexMap<String, SchemaElement> = raw
            .fields
            .into_iter()
            .map(|(name, element)| (name, element.normalize()))
            .collect();
        debug!(fields = fields.len(), "normalized config schema");
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaElement> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaElement)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every leaf in depth-first declaration order
    pub fn env_vars(&self) -> Vec<EnvVarDoc> {
        let mut docs = Vec::new();
        for (name, element) in self.iter() {
            collect_env_vars(name, element, &mut docs);
        }
        docs
    }
}

impl From<RawSchema> for Schema {
    fn from(raw: RawSchema) -> Self {
        Schema::normalize(raw)
    }
}

fn collect_env_vars(path: &str, element: &SchemaElement, docs: &mut Vec<EnvVarDoc>) {
    match element {
        SchemaElement::Object(object) => {
            for (name, child) in object.properties() {
                collect_env_vars(&format!("{}.{}", path, name), child, docs);
            }
        }
        leaf => {
            if let (Some(env_var), Some(required)) = (leaf.env_var(), leaf.required()) {
                docs.push(EnvVarDoc {
                    path: path.to_string(),
                    env_var: env_var.to_string(),
                    kind: leaf.kind(),
                    required,
                    description: leaf.description().map(str::to_string),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_schema() -> RawSchema {
        RawSchema::new()
            .field("env", string("NODE_ENV").description("Running environment"))
            .field(
                "server",
                object()
                    .description("Server info")
                    .property("port", int("SERVER_PORT").validator(|port, _| *port == 3000))
                    .property("host", string("SERVER_HOST"))
                    .property("debug", boolean("SERVER_DEBUG").optional()),
            )
    }

    #[test]
    fn test_required_defaults_to_true() {
        let schema = Schema::normalize(server_schema());
        assert_eq!(schema.get("env").unwrap().required(), Some(true));

        let server = schema.get("server").unwrap().as_object().unwrap();
        assert_eq!(server.get("host").unwrap().required(), Some(true));
        assert_eq!(server.get("debug").unwrap().required(), Some(false));
    }

    #[test]
    fn test_explicit_required_is_kept() {
        let schema = Schema::normalize(
            RawSchema::new()
                .field("a", float("A").required(true))
                .field("b", float("B").required(false)),
        );
        assert_eq!(schema.get("a").unwrap().required(), Some(true));
        assert_eq!(schema.get("b").unwrap().required(), Some(false));
    }

    #[test]
    fn test_attributes_pass_through() {
        let schema = Schema::normalize(server_schema());
        let env = schema.get("env").unwrap();
        assert_eq!(env.kind(), ValueKind::String);
        assert_eq!(env.env_var(), Some("NODE_ENV"));
        assert_eq!(env.description(), Some("Running environment"));

        let server = schema.get("server").unwrap();
        assert_eq!(server.kind(), ValueKind::Object);
        assert_eq!(server.env_var(), None);
        assert_eq!(server.required(), None);
        assert_eq!(server.description(), Some("Server info"));

        match server.as_object().unwrap().get("port").unwrap() {
            SchemaElement::Int(leaf) => {
                assert!(leaf.has_validator());
                assert!(leaf.accepts(&3000, &schema));
                assert!(!leaf.accepts(&4000, &schema));
            }
            other => panic!("expected int element, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let schema = Schema::normalize(
            RawSchema::new()
                .field("zeta", string("Z"))
                .field("alpha", string("A"))
                .field("mid", string("M")),
        );
        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_env_vars_listing() {
        let schema = Schema::normalize(server_schema());
        let docs = schema.env_vars();
        let paths: Vec<&str> = docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["env", "server.port", "server.host", "server.debug"]);
        assert_eq!(docs[1].env_var, "SERVER_PORT");
        assert_eq!(docs[1].kind, ValueKind::Int);
        assert!(!docs[3].required);
        assert_eq!(docs[0].description.as_deref(), Some("Running environment"));
    }

    #[test]
    fn test_empty_schema() {
        let schema: Schema = RawSchema::new().into();
        assert!(schema.is_empty());
        assert!(schema.env_vars().is_empty());
    }
}
