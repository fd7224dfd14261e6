//! Configured catalogs: streams selected for syncing, with sync settings

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, StreamDefinition, SyncMode};
use crate::error::Result;
use crate::field::Field;
use crate::walker::top_level_field_names;

/// How a destination writes a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationSyncMode {
    Append,
    Overwrite,
    AppendDedup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    pub stream: StreamDefinition,
    pub sync_mode: SyncMode,
    #[serde(default)]
    pub cursor_field: Vec<String>,
    pub destination_sync_mode: DestinationSyncMode,
    #[serde(default)]
    pub primary_key: Vec<Vec<String>>,
}

impl ConfiguredStream {
    /// Full refresh / overwrite with no cursor or primary key
    pub fn with_defaults(stream: StreamDefinition) -> Self {
        Self {
            stream,
            sync_mode: SyncMode::FullRefresh,
            cursor_field: Vec::new(),
            destination_sync_mode: DestinationSyncMode::Overwrite,
            primary_key: Vec::new(),
        }
    }

    /// A default-configured stream whose schema is built from `fields`
    pub fn from_fields(
        name: impl Into<String>,
        namespace: Option<&str>,
        fields: &[Field],
    ) -> Result<Self> {
        StreamDefinition::from_fields(name, namespace, fields).map(Self::with_defaults)
    }

    pub fn top_level_field_names(&self) -> BTreeSet<String> {
        top_level_field_names(&self.stream.json_schema)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    #[serde(default)]
    pub streams: Vec<ConfiguredStream>,
}

impl ConfiguredCatalog {
    /// A catalog holding the single default-configured stream built from `fields`
    pub fn from_fields(
        name: impl Into<String>,
        namespace: Option<&str>,
        fields: &[Field],
    ) -> Result<Self> {
        Ok(Self {
            streams: vec![ConfiguredStream::from_fields(name, namespace, fields)?],
        })
    }
}

/// Configure every stream of `catalog` with the minimum defaults
pub fn to_default_configured_catalog(catalog: &Catalog) -> ConfiguredCatalog {
    ConfiguredCatalog {
        streams: catalog
            .streams
            .iter()
            .cloned()
            .map(ConfiguredStream::with_defaults)
            .collect(),
    }
}
