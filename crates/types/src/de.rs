//! `serde::Deserializer` over a resolved configuration tree
//!
//! Values are handed to the visitor as-is, so non-finite floats survive
//! extraction into `f64` fields.

use crate::value::{ConfigValue, ResolvedConfig};
use serde::de::value::{Error as DeError, MapDeserializer};
use serde::de::{IntoDeserializer, Visitor};
use serde::Deserializer;
use serde::forward_to_deserialize_any;

/// One field of the tree; `None` is an absent optional leaf
pub(crate) struct FieldDeserializer {
    value: Option<ConfigValue>,
}

impl FieldDeserializer {
    pub(crate) fn new(value: Option<ConfigValue>) -> Self {
        Self { value }
    }
}

fn map_deserializer<'de>(
    config: ResolvedConfig,
) -> MapDeserializer<'de, impl Iterator<Item = (String, FieldDeserializer)>, DeError> {
    MapDeserializer::new(
        config
            .into_fields()
            .map(|(name, value)| (name, FieldDeserializer::new(value))),
    )
}

impl<'de> IntoDeserializer<'de, DeError> for FieldDeserializer {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> Deserializer<'de> for FieldDeserializer {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.value {
            None => visitor.visit_none(),
            Some(ConfigValue::String(s)) => visitor.visit_string(s),
            Some(ConfigValue::Int(i)) => visitor.visit_i64(i),
            Some(ConfigValue::Float(f)) => visitor.visit_f64(f),
            Some(ConfigValue::Boolean(b)) => visitor.visit_bool(b),
            Some(ConfigValue::Object(object)) => visitor.visit_map(map_deserializer(object)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.value {
            None => visitor.visit_none(),
            value @ Some(_) => visitor.visit_some(FieldDeserializer::new(value)),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        match self.value {
            // Unit variants spelled as plain strings, e.g. `LOG_FORMAT=json`
            Some(ConfigValue::String(s)) => {
                let de: serde::de::value::StringDeserializer<DeError> = s.into_deserializer();
                de.deserialize_enum(name, variants, visitor)
            }
            other => FieldDeserializer::new(other).deserialize_any(visitor),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
