//! Schema tree for a stream
//!
//! Streams carry a JSON-schema shaped tree. It is parsed into an explicit
//! [`SchemaNode`] so walking it never probes for keys: a node that declares
//! `properties` is an [`SchemaNode::Object`], a boolean subschema is a
//! [`SchemaNode::Boolean`], anything else is a [`SchemaNode::Leaf`].
//!
//! Every keyword other than `properties` (including the raw `type` value,
//! `format`, `oneOf`, `items`, ...) is kept verbatim in `keywords`. Equality
//! and serialization use those raw keywords, so `"type": ["string"]` and
//! `"type": "string"` are different nodes even though both walk as `[string]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::types::{parse_type_keyword, FieldTypeSet, JsonSchemaPrimitive};

static NO_TYPES: FieldTypeSet = FieldTypeSet::EMPTY;
static NO_KEYWORDS: BTreeMap<String, Value> = BTreeMap::new();

/// A node of a stream's schema tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum SchemaNode {
    /// A field without nested properties (scalars, arrays, untyped nodes)
    Leaf {
        types: FieldTypeSet,
        keywords: BTreeMap<String, Value>,
    },
    /// A node with its own `properties`
    Object {
        types: FieldTypeSet,
        properties: BTreeMap<String, SchemaNode>,
        keywords: BTreeMap<String, Value>,
    },
    /// `true` (anything) or `false` (nothing); untyped
    Boolean(bool),
}

impl SchemaNode {
    /// The empty schema `{}`
    pub fn empty() -> Self {
        SchemaNode::Leaf {
            types: FieldTypeSet::empty(),
            keywords: BTreeMap::new(),
        }
    }

    /// A leaf declaring `types`, alongside any other keywords
    pub fn leaf(types: FieldTypeSet, mut keywords: BTreeMap<String, Value>) -> Self {
        if let Some(type_value) = type_keyword(&types) {
            keywords.insert("type".to_string(), type_value);
        }
        SchemaNode::Leaf { types, keywords }
    }

    /// An object node typed `object` with the given properties
    pub fn object(properties: BTreeMap<String, SchemaNode>) -> Self {
        SchemaNode::Object {
            types: FieldTypeSet::from([JsonSchemaPrimitive::Object]),
            properties,
            keywords: BTreeMap::from([("type".to_string(), Value::from("object"))]),
        }
    }

    /// Primitive types declared on this node
    pub fn types(&self) -> &FieldTypeSet {
        match self {
            SchemaNode::Leaf { types, .. } | SchemaNode::Object { types, .. } => types,
            SchemaNode::Boolean(_) => &NO_TYPES,
        }
    }

    /// Nested properties, if this is an object node
    pub fn properties(&self) -> Option<&BTreeMap<String, SchemaNode>> {
        match self {
            SchemaNode::Object { properties, .. } => Some(properties),
            SchemaNode::Leaf { .. } | SchemaNode::Boolean(_) => None,
        }
    }

    /// Raw keywords other than `properties`
    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        match self {
            SchemaNode::Leaf { keywords, .. } | SchemaNode::Object { keywords, .. } => keywords,
            SchemaNode::Boolean(_) => &NO_KEYWORDS,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, SchemaNode::Object { .. })
    }

    /// Serialize to the conventional JSON-schema shape
    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }
}

/// The `type` keyword for `types`: a string for one type, an array otherwise
fn type_keyword(types: &FieldTypeSet) -> Option<Value> {
    match types.as_slice() {
        [] => None,
        [single] => Some(Value::from(single.as_str())),
        many => Some(Value::Array(
            many.iter().map(|t| Value::from(t.as_str())).collect(),
        )),
    }
}

impl TryFrom<Value> for SchemaNode {
    type Error = CatalogError;

    fn try_from(value: Value) -> Result<Self> {
        let mut keywords = match value {
            Value::Object(map) => map,
            Value::Bool(accepts) => return Ok(SchemaNode::Boolean(accepts)),
            other => {
                return Err(CatalogError::InvalidFormat(format!(
                    "schema node must be a JSON object or boolean, got {}",
                    other
                )))
            }
        };

        let types = parse_type_keyword(keywords.get("type"))?;

        let properties = match keywords.remove("properties") {
            None => None,
            Some(Value::Object(properties)) => Some(
                properties
                    .into_iter()
                    .map(|(name, node)| {
                        Ok::<_, CatalogError>((name, SchemaNode::try_from(node)?))
                    })
                    .collect::<Result<BTreeMap<_, _>>>()?,
            ),
            Some(other) => {
                return Err(CatalogError::InvalidFormat(format!(
                    "properties must be a JSON object, got {}",
                    other
                )))
            }
        };

        let keywords = keywords.into_iter().collect();

        Ok(match properties {
            Some(properties) => SchemaNode::Object {
                types,
                properties,
                keywords,
            },
            None => SchemaNode::Leaf { types, keywords },
        })
    }
}

impl From<SchemaNode> for Value {
    fn from(node: SchemaNode) -> Self {
        let (properties, keywords) = match node {
            SchemaNode::Boolean(accepts) => return Value::Bool(accepts),
            SchemaNode::Leaf { keywords, .. } => (None, keywords),
            SchemaNode::Object {
                properties,
                keywords,
                ..
            } => (Some(properties), keywords),
        };

        let mut map: serde_json::Map<String, Value> = keywords.into_iter().collect();

        if let Some(properties) = properties {
            let properties = properties
                .into_iter()
                .map(|(name, node)| (name, Value::from(node)))
                .collect();
            map.insert("properties".to_string(), Value::Object(properties));
        }

        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_object() {
        let node = SchemaNode::try_from(json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "address": {
                    "type": ["null", "object"],
                    "properties": {
                        "zip": { "type": "string", "maxLength": 10 }
                    }
                }
            }
        }))
        .unwrap();

        let properties = node.properties().unwrap();
        assert_eq!(properties.len(), 2);

        let address = &properties["address"];
        assert!(address.is_object());
        assert_eq!(
            address.types(),
            &FieldTypeSet::from([JsonSchemaPrimitive::Null, JsonSchemaPrimitive::Object])
        );

        let zip = &address.properties().unwrap()["zip"];
        assert!(!zip.is_object());
        assert_eq!(zip.keywords()["maxLength"], json!(10));
    }

    #[test]
    fn test_object_without_properties_is_leaf() {
        let node = SchemaNode::try_from(json!({ "type": "object" })).unwrap();
        assert!(!node.is_object());
        assert_eq!(node.properties(), None);
    }

    #[test]
    fn test_round_trip_preserves_shape() {
        let raw = json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer" },
                "tags": { "type": ["null", "array"], "items": { "type": "string" } },
                "payload": { "oneOf": [{ "type": "string" }, { "type": "number" }] },
                "meta": { "type": "object", "properties": {} }
            }
        });

        let node: SchemaNode = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn test_single_element_type_array_round_trips() {
        let raw = json!({
            "type": "object",
            "properties": { "id": { "type": ["string"] } }
        });

        let node: SchemaNode = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(node.to_json(), raw);

        let plain: SchemaNode = serde_json::from_value(json!({
            "type": "object",
            "properties": { "id": { "type": "string" } }
        }))
        .unwrap();
        assert_ne!(node, plain);
        assert_eq!(
            node.properties().unwrap()["id"].types(),
            plain.properties().unwrap()["id"].types()
        );
    }

    #[test]
    fn test_duplicate_type_tags_kept_verbatim() {
        let raw = json!({ "type": ["null", "string", "null"] });
        let node = SchemaNode::try_from(raw.clone()).unwrap();

        assert_eq!(
            node.types(),
            &FieldTypeSet::from([JsonSchemaPrimitive::Null, JsonSchemaPrimitive::String])
        );
        assert_eq!(node.to_json(), raw);
        assert_ne!(
            node,
            SchemaNode::try_from(json!({ "type": ["null", "string"] })).unwrap()
        );
    }

    #[test]
    fn test_boolean_subschemas() {
        let raw = json!({
            "type": "object",
            "properties": { "anything": true, "nothing": false }
        });

        let node: SchemaNode = serde_json::from_value(raw.clone()).unwrap();
        let anything = &node.properties().unwrap()["anything"];
        assert_eq!(anything, &SchemaNode::Boolean(true));
        assert!(anything.types().is_empty());
        assert!(anything.keywords().is_empty());
        assert_eq!(anything.properties(), None);
        assert_eq!(node.to_json(), raw);
    }

    #[test]
    fn test_property_order_is_irrelevant() {
        let a: SchemaNode = serde_json::from_str(
            r#"{"type":"object","properties":{"a":{"type":"string"},"b":{"type":"number"}}}"#,
        )
        .unwrap();
        let b: SchemaNode = serde_json::from_str(
            r#"{"properties":{"b":{"type":"number"},"a":{"type":"string"}},"type":"object"}"#,
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_nodes_are_rejected() {
        assert!(matches!(
            SchemaNode::try_from(json!("string")),
            Err(CatalogError::InvalidFormat(_))
        ));
        assert!(matches!(
            SchemaNode::try_from(json!({ "properties": [] })),
            Err(CatalogError::InvalidFormat(_))
        ));
        assert!(SchemaNode::try_from(json!({ "properties": { "x": 1 } })).is_err());
    }

    #[test]
    fn test_empty_schema() {
        let node = SchemaNode::try_from(json!({})).unwrap();
        assert_eq!(node, SchemaNode::empty());
        assert_eq!(node.to_json(), json!({}));
    }

    #[test]
    fn test_constructors_write_type_keyword() {
        let leaf = SchemaNode::leaf(
            FieldTypeSet::from([JsonSchemaPrimitive::Null, JsonSchemaPrimitive::Number]),
            BTreeMap::new(),
        );
        assert_eq!(leaf.to_json(), json!({ "type": ["null", "number"] }));
        assert_eq!(SchemaNode::try_from(leaf.to_json()).unwrap(), leaf);

        let object = SchemaNode::object(BTreeMap::from([("id".to_string(), leaf)]));
        assert_eq!(SchemaNode::try_from(object.to_json()).unwrap(), object);
    }
}
