//! Building schemas from flat field declarations

use std::collections::BTreeMap;

use crate::error::{CatalogError, Result};
use crate::schema::SchemaNode;
use crate::types::{JsonSchemaPrimitive, JsonSchemaType};

/// A named field with a declared type, optionally holding nested fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: JsonSchemaType,
    pub sub_fields: Vec<Field>,
}

impl Field {
    pub fn of(name: impl Into<String>, field_type: JsonSchemaType) -> Self {
        Self {
            name: name.into(),
            field_type,
            sub_fields: Vec::new(),
        }
    }

    /// An object-typed field with nested fields
    pub fn object(name: impl Into<String>, sub_fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            field_type: JsonSchemaType::OBJECT,
            sub_fields,
        }
    }

    fn is_object(&self) -> bool {
        self.field_type.primitive == JsonSchemaPrimitive::Object
    }
}

/// Map a list of fields onto an object schema.
///
/// Object-typed fields become nested object nodes (with empty `properties`
/// when they have no sub-fields); every other field becomes the leaf node of
/// its declared type. Fails on two fields with the same name at one level.
pub fn fields_to_schema(fields: &[Field]) -> Result<SchemaNode> {
    let mut properties = BTreeMap::new();
    for field in fields {
        let node = if field.is_object() {
            fields_to_schema(&field.sub_fields)?
        } else {
            field.field_type.to_schema_node()
        };
        if properties.insert(field.name.clone(), node).is_some() {
            return Err(CatalogError::DuplicateFieldName {
                name: field.name.clone(),
            });
        }
    }
    Ok(SchemaNode::object(properties))
}
