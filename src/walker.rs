//! Enumerating the fields of a schema tree

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::schema::SchemaNode;
use crate::transform::FieldPath;
use crate::types::FieldTypeSet;

/// Every field path in `schema` with its primitive types.
///
/// Object fields are reported themselves and then recursed into, so
/// `address` and `address.zip` are separate entries. Array item schemas are
/// not entered. A schema without `properties` has no fields.
pub fn walk(schema: &SchemaNode) -> HashSet<(FieldPath, FieldTypeSet)> {
    let mut fields = HashSet::new();
    walk_into(schema, &FieldPath::root(), &mut fields);
    fields
}

fn walk_into(
    node: &SchemaNode,
    prefix: &FieldPath,
    fields: &mut HashSet<(FieldPath, FieldTypeSet)>,
) {
    let Some(properties) = node.properties() else {
        return;
    };

    for (name, child) in properties {
        let path = prefix.child(name.as_str());
        fields.insert((path.clone(), child.types().clone()));
        walk_into(child, &path, fields);
    }
}

/// The walked fields keyed by path
pub fn field_types(schema: &SchemaNode) -> HashMap<FieldPath, FieldTypeSet> {
    walk(schema).into_iter().collect()
}

/// Names of every field at any depth
pub fn all_field_names(schema: &SchemaNode) -> HashSet<String> {
    walk(schema)
        .into_iter()
        .filter_map(|(path, _)| path.last().map(String::from))
        .collect()
}

/// Names of the root object's own properties
pub fn top_level_field_names(schema: &SchemaNode) -> BTreeSet<String> {
    schema
        .properties()
        .map(|properties| properties.keys().cloned().collect())
        .unwrap_or_default()
}
