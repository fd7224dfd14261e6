//! Catalog Diff
//!
//! Structural differences between two versions of a data-source catalog.
//!
//! ## Features
//!
//! - **Stream changes**: streams added or removed, matched by name + namespace
//! - **Field changes**: fields added, removed or retyped, at any nesting depth
//! - **Typed change model**: every difference is a [`StreamTransform`] or
//!   [`FieldTransform`] variant, ready for migration and compatibility checks
//! - **Reports**: text and JSON output with catalog checksums
//!
//! ## Example
//!
//! ```
//! use catalog_diff::{catalog_diff, Catalog, Field, JsonSchemaType, StreamDefinition};
//!
//! let old = Catalog::new(vec![
//!     StreamDefinition::from_fields("users", None, &[Field::of("id", JsonSchemaType::INTEGER)])?,
//! ]);
//! let new = Catalog::new(vec![
//!     StreamDefinition::from_fields("users", None, &[Field::of("id", JsonSchemaType::STRING)])?,
//! ]);
//!
//! assert_eq!(catalog_diff(&old, &new).len(), 1);
//! # Ok::<(), catalog_diff::CatalogError>(())
//! ```

pub mod catalog;
pub mod checksum;
pub mod config;
pub mod configured;
pub mod diff;
pub mod error;
pub mod field;
pub mod report;
pub mod schema;
pub mod transform;
pub mod types;
pub mod walker;

pub use catalog::{Catalog, StreamDefinition, StreamDescriptor, SyncMode};
pub use checksum::Checksum;
pub use config::{DiffConfig, OutputFormat};
pub use configured::{
    to_default_configured_catalog, ConfiguredCatalog, ConfiguredStream, DestinationSyncMode,
};
pub use diff::{catalog_diff, stream_diff};
pub use error::{CatalogError, Result};
pub use field::{fields_to_schema, Field};
pub use report::{DiffReport, DiffSummary, TextReport};
pub use schema::SchemaNode;
pub use transform::{FieldPath, FieldTransform, StreamTransform, UpdateStreamTransform};
pub use types::{type_of, FieldTypeSet, JsonSchemaPrimitive, JsonSchemaType};
pub use walker::walk;
