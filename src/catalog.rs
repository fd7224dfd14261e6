//! Catalog and stream definitions
//!
//! A catalog is an ordered list of streams. Streams are matched across
//! catalog versions by their [`StreamDescriptor`] (name plus optional
//! namespace); everything else about a stream is compared structurally.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::checksum::Checksum;
use crate::error::Result;
use crate::field::{fields_to_schema, Field};
use crate::schema::SchemaNode;

/// Identity of a stream across catalog versions.
///
/// An absent namespace is distinct from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl StreamDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

impl fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}.{}", namespace, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Sync modes a source supports for a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    FullRefresh,
    Incremental,
}

/// A stream as declared by a source
///
/// Attributes without a dedicated field land in `additional` so that they
/// survive a round trip and take part in equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDefinition {
    #[serde(flatten)]
    pub descriptor: StreamDescriptor,
    #[serde(flatten)]
    pub additional: BTreeMap<String, Value>,
    #[serde(default = "SchemaNode::empty")]
    pub json_schema: SchemaNode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_sync_modes: Vec<SyncMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_defined_cursor: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_cursor_field: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_defined_primary_key: Vec<Vec<String>>,
}

impl StreamDefinition {
    /// Create a stream without a namespace
    pub fn new(name: impl Into<String>, json_schema: SchemaNode) -> Self {
        Self {
            descriptor: StreamDescriptor::new(name),
            additional: BTreeMap::new(),
            json_schema,
            supported_sync_modes: Vec::new(),
            source_defined_cursor: None,
            default_cursor_field: Vec::new(),
            source_defined_primary_key: Vec::new(),
        }
    }

    /// Create a stream whose schema is built from a field list
    pub fn from_fields(
        name: impl Into<String>,
        namespace: Option<&str>,
        fields: &[Field],
    ) -> Result<Self> {
        let mut stream = Self::new(name, fields_to_schema(fields)?);
        stream.descriptor.namespace = namespace.map(String::from);
        Ok(stream)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.descriptor.namespace = Some(namespace.into());
        self
    }

    pub fn with_sync_modes(mut self, modes: impl IntoIterator<Item = SyncMode>) -> Self {
        self.supported_sync_modes = modes.into_iter().collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn checksum(&self) -> Result<Checksum> {
        Ok(Checksum::from_json(&serde_json::to_value(self)?))
    }
}

/// An ordered collection of streams
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub streams: Vec<StreamDefinition>,
}

impl Catalog {
    pub fn new(streams: Vec<StreamDefinition>) -> Self {
        Self { streams }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a catalog from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Key every stream by its descriptor.
    ///
    /// Catalogs are expected to hold each descriptor once; if one repeats,
    /// the last stream with that descriptor wins.
    pub fn index(&self) -> HashMap<&StreamDescriptor, &StreamDefinition> {
        let mut index = HashMap::with_capacity(self.streams.len());
        for stream in &self.streams {
            if index.insert(&stream.descriptor, stream).is_some() {
                warn!(
                    stream = %stream.descriptor,
                    "duplicate stream descriptor in catalog, keeping the last one"
                );
            }
        }
        index
    }

    pub fn checksum(&self) -> Result<Checksum> {
        Ok(Checksum::from_json(&serde_json::to_value(self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JsonSchemaType;

    #[test]
    fn test_namespace_is_part_of_identity() {
        let bare = StreamDescriptor::new("users");
        let empty = StreamDescriptor::new("users").with_namespace("");
        let public = StreamDescriptor::new("users").with_namespace("public");

        assert_ne!(bare, empty);
        assert_ne!(empty, public);
        assert_eq!(public.to_string(), "public.users");
        assert_eq!(bare.to_string(), "users");
    }

    #[test]
    fn test_index_last_write_wins() {
        let id = |field_type| [Field::of("id", field_type)];
        let first =
            StreamDefinition::from_fields("users", None, &id(JsonSchemaType::INTEGER)).unwrap();
        let second =
            StreamDefinition::from_fields("users", None, &id(JsonSchemaType::STRING)).unwrap();
        let other = StreamDefinition::new("users", SchemaNode::empty()).with_namespace("public");
        let catalog = Catalog::new(vec![first, second.clone(), other]);

        let index = catalog.index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&StreamDescriptor::new("users")], &second);
    }

    #[test]
    fn test_parse_catalog_json() {
        let catalog = Catalog::from_json_str(
            r#"{
                "streams": [
                    {
                        "name": "users",
                        "namespace": "public",
                        "json_schema": {
                            "type": "object",
                            "properties": { "id": { "type": "integer" } }
                        },
                        "supported_sync_modes": ["full_refresh", "incremental"],
                        "source_defined_primary_key": [["id"]]
                    },
                    { "name": "accounts" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.streams.len(), 2);
        let users = &catalog.streams[0];
        assert_eq!(users.descriptor, StreamDescriptor::new("users").with_namespace("public"));
        assert_eq!(
            users.supported_sync_modes,
            vec![SyncMode::FullRefresh, SyncMode::Incremental]
        );
        assert!(users.json_schema.is_object());
        assert_eq!(catalog.streams[1].json_schema, SchemaNode::empty());
        assert!(users.additional.is_empty());
    }

    #[test]
    fn test_unknown_attributes_round_trip() {
        let raw = serde_json::json!({
            "streams": [{
                "name": "users",
                "json_schema": {
                    "type": "object",
                    "properties": { "id": { "type": ["string"] }, "anything": true }
                },
                "is_resumable": true,
                "x-owner": { "team": "growth" }
            }]
        });

        let catalog: Catalog = serde_json::from_value(raw.clone()).unwrap();
        let users = &catalog.streams[0];
        assert_eq!(users.descriptor, StreamDescriptor::new("users"));
        assert_eq!(
            users.additional.keys().collect::<Vec<_>>(),
            vec!["is_resumable", "x-owner"]
        );
        assert_eq!(serde_json::to_value(&catalog).unwrap(), raw);
    }

    #[test]
    fn test_boolean_subschema_in_catalog() {
        let catalog = Catalog::from_json_str(
            r#"{"streams":[{"name":"events","json_schema":{"properties":{"payload":true}}}]}"#,
        )
        .unwrap();
        let properties = catalog.streams[0].json_schema.properties().unwrap();
        assert_eq!(properties["payload"], SchemaNode::Boolean(true));
    }

    #[test]
    fn test_checksum_tracks_content() {
        let a = Catalog::new(vec![StreamDefinition::new("users", SchemaNode::empty())]);
        let b = Catalog::new(vec![StreamDefinition::new("sales", SchemaNode::empty())]);
        assert_eq!(a.checksum().unwrap(), a.clone().checksum().unwrap());
        assert_ne!(a.checksum().unwrap(), b.checksum().unwrap());
    }
}
