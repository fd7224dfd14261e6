//! Primitive JSON-schema types and the mapping from schema nodes to them

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::schema::SchemaNode;

/// A primitive JSON-schema type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonSchemaPrimitive {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonSchemaPrimitive {
    /// Get the JSON-schema keyword for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonSchemaPrimitive::String => "string",
            JsonSchemaPrimitive::Number => "number",
            JsonSchemaPrimitive::Integer => "integer",
            JsonSchemaPrimitive::Boolean => "boolean",
            JsonSchemaPrimitive::Object => "object",
            JsonSchemaPrimitive::Array => "array",
            JsonSchemaPrimitive::Null => "null",
        }
    }

    /// Parse a JSON-schema type keyword
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(JsonSchemaPrimitive::String),
            "number" => Some(JsonSchemaPrimitive::Number),
            "integer" => Some(JsonSchemaPrimitive::Integer),
            "boolean" => Some(JsonSchemaPrimitive::Boolean),
            "object" => Some(JsonSchemaPrimitive::Object),
            "array" => Some(JsonSchemaPrimitive::Array),
            "null" => Some(JsonSchemaPrimitive::Null),
            _ => None,
        }
    }
}

impl fmt::Display for JsonSchemaPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, duplicate-free sequence of primitive types for one field.
///
/// Equality is sequence equality: `[null, string]` and `[string, null]` differ.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTypeSet(Vec<JsonSchemaPrimitive>);

impl FieldTypeSet {
    pub const EMPTY: Self = Self(Vec::new());

    /// The empty ("unknown") type set
    pub fn empty() -> Self {
        Self::EMPTY
    }

    pub fn as_slice(&self) -> &[JsonSchemaPrimitive] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, primitive: JsonSchemaPrimitive) -> bool {
        self.0.contains(&primitive)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JsonSchemaPrimitive> {
        self.0.iter()
    }
}

impl FromIterator<JsonSchemaPrimitive> for FieldTypeSet {
    /// Keeps the first occurrence of each type
    fn from_iter<I: IntoIterator<Item = JsonSchemaPrimitive>>(iter: I) -> Self {
        let mut types = Vec::new();
        for primitive in iter {
            if !types.contains(&primitive) {
                types.push(primitive);
            }
        }
        Self(types)
    }
}

impl<const N: usize> From<[JsonSchemaPrimitive; N]> for FieldTypeSet {
    fn from(types: [JsonSchemaPrimitive; N]) -> Self {
        types.into_iter().collect()
    }
}

impl fmt::Display for FieldTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.0.iter().map(JsonSchemaPrimitive::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Map a raw schema node to its primitive type sequence.
///
/// Only the `type` keyword is consulted. Nodes without it (`{}`, bare
/// `oneOf`/`anyOf` compositions, `$ref`s) map to the empty set.
pub fn type_of(node: &Value) -> Result<FieldTypeSet> {
    parse_type_keyword(node.get("type"))
}

/// Parse the value of a `type` keyword; an absent keyword is the empty set
pub(crate) fn parse_type_keyword(type_value: Option<&Value>) -> Result<FieldTypeSet> {
    let Some(type_value) = type_value else {
        return Ok(FieldTypeSet::empty());
    };

    match type_value {
        Value::String(name) => Ok(std::iter::once(parse_primitive(name)?).collect()),
        Value::Array(names) => names
            .iter()
            .map(|name| {
                name.as_str()
                    .ok_or_else(|| {
                        CatalogError::InvalidFormat(format!(
                            "type entry must be a string, got {}",
                            name
                        ))
                    })
                    .and_then(parse_primitive)
            })
            .collect::<Result<FieldTypeSet>>(),
        other => Err(CatalogError::InvalidFormat(format!(
            "type must be a string or an array of strings, got {}",
            other
        ))),
    }
}

fn parse_primitive(name: &str) -> Result<JsonSchemaPrimitive> {
    JsonSchemaPrimitive::from_name(name)
        .ok_or_else(|| CatalogError::InvalidFormat(format!("unknown type: {}", name)))
}

/// A declared field type: a primitive plus optional format annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JsonSchemaType {
    pub primitive: JsonSchemaPrimitive,
    pub format: Option<&'static str>,
    pub airbyte_type: Option<&'static str>,
}

impl JsonSchemaType {
    pub const STRING: Self = Self::plain(JsonSchemaPrimitive::String);
    pub const NUMBER: Self = Self::plain(JsonSchemaPrimitive::Number);
    pub const INTEGER: Self = Self::plain(JsonSchemaPrimitive::Integer);
    pub const BOOLEAN: Self = Self::plain(JsonSchemaPrimitive::Boolean);
    pub const OBJECT: Self = Self::plain(JsonSchemaPrimitive::Object);
    pub const ARRAY: Self = Self::plain(JsonSchemaPrimitive::Array);
    pub const NULL: Self = Self::plain(JsonSchemaPrimitive::Null);

    pub const STRING_DATE: Self = Self {
        primitive: JsonSchemaPrimitive::String,
        format: Some("date"),
        airbyte_type: None,
    };
    pub const STRING_TIMESTAMP_WITH_TIMEZONE: Self = Self {
        primitive: JsonSchemaPrimitive::String,
        format: Some("date-time"),
        airbyte_type: Some("timestamp_with_timezone"),
    };
    pub const STRING_TIMESTAMP_WITHOUT_TIMEZONE: Self = Self {
        primitive: JsonSchemaPrimitive::String,
        format: Some("date-time"),
        airbyte_type: Some("timestamp_without_timezone"),
    };
    pub const NUMBER_INT: Self = Self {
        primitive: JsonSchemaPrimitive::Number,
        format: None,
        airbyte_type: Some("integer"),
    };
    pub const NUMBER_BIGINT: Self = Self {
        primitive: JsonSchemaPrimitive::String,
        format: None,
        airbyte_type: Some("big_integer"),
    };

    const fn plain(primitive: JsonSchemaPrimitive) -> Self {
        Self {
            primitive,
            format: None,
            airbyte_type: None,
        }
    }

    /// Build the leaf schema node describing this type
    pub fn to_schema_node(&self) -> SchemaNode {
        let mut keywords = BTreeMap::new();
        if let Some(format) = self.format {
            keywords.insert("format".to_string(), Value::from(format));
        }
        if let Some(airbyte_type) = self.airbyte_type {
            keywords.insert("airbyte_type".to_string(), Value::from(airbyte_type));
        }
        SchemaNode::leaf(FieldTypeSet::from([self.primitive]), keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_of_single_and_nullable() {
        assert_eq!(
            type_of(&json!({ "type": "string" })).unwrap(),
            FieldTypeSet::from([JsonSchemaPrimitive::String])
        );
        assert_eq!(
            type_of(&json!({ "type": ["null", "string"] })).unwrap(),
            FieldTypeSet::from([JsonSchemaPrimitive::Null, JsonSchemaPrimitive::String])
        );
    }

    #[test]
    fn test_type_of_keeps_order_and_drops_duplicates() {
        let types = type_of(&json!({ "type": ["string", "null", "string"] })).unwrap();
        assert_eq!(
            types.as_slice(),
            &[JsonSchemaPrimitive::String, JsonSchemaPrimitive::Null]
        );
        assert_ne!(
            types,
            FieldTypeSet::from([JsonSchemaPrimitive::Null, JsonSchemaPrimitive::String])
        );
    }

    #[test]
    fn test_type_of_untyped_node_is_unknown() {
        let node = json!({ "oneOf": [{ "type": "string" }, { "type": "number" }] });
        assert!(type_of(&node).unwrap().is_empty());
        assert!(type_of(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_type_of_rejects_unknown_type() {
        assert!(matches!(
            type_of(&json!({ "type": "decimal" })),
            Err(CatalogError::InvalidFormat(_))
        ));
        assert!(type_of(&json!({ "type": 7 })).is_err());
    }

    #[test]
    fn test_type_display() {
        let types = FieldTypeSet::from([JsonSchemaPrimitive::Null, JsonSchemaPrimitive::Number]);
        assert_eq!(types.to_string(), "[null, number]");
    }
}
