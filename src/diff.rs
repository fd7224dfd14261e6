//! Catalog diffing
//!
//! Streams are matched by descriptor. Unmatched descriptors become
//! [`StreamTransform::AddStream`] / [`StreamTransform::RemoveStream`];
//! matched streams that are not deeply equal are compared field by field.
//!
//! Fields are matched by their full [`FieldPath`](crate::transform::FieldPath),
//! recomputed independently for each side. A rename therefore shows up as a
//! removal plus an addition, and renaming an object field does the same for
//! every field nested under it.

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::{Catalog, StreamDefinition, StreamDescriptor};
use crate::error::{CatalogError, Result};
use crate::transform::{FieldTransform, StreamTransform, UpdateStreamTransform};
use crate::walker::field_types;

/// Compute every stream-level change from `old` to `new`
pub fn catalog_diff(old: &Catalog, new: &Catalog) -> BTreeSet<StreamTransform> {
    let old_index = old.index();
    let new_index = new.index();
    let mut transforms = BTreeSet::new();

    for (descriptor, old_stream) in &old_index {
        match new_index.get(descriptor) {
            None => {
                debug!(stream = %descriptor, "stream removed");
                transforms.insert(StreamTransform::RemoveStream {
                    descriptor: (*descriptor).clone(),
                });
            }
            Some(new_stream) if old_stream != new_stream => {
                let update = diff_matched_streams(descriptor, old_stream, new_stream);
                debug!(
                    stream = %descriptor,
                    field_changes = update.field_transforms.len(),
                    "stream updated"
                );
                transforms.insert(StreamTransform::UpdateStream(update));
            }
            Some(_) => {}
        }
    }

    for descriptor in new_index.keys() {
        if !old_index.contains_key(descriptor) {
            debug!(stream = %descriptor, "stream added");
            transforms.insert(StreamTransform::AddStream {
                descriptor: (*descriptor).clone(),
            });
        }
    }

    transforms
}

/// Compare two versions of the same stream field by field.
///
/// Both definitions must carry `descriptor`.
pub fn stream_diff(
    descriptor: &StreamDescriptor,
    old: &StreamDefinition,
    new: &StreamDefinition,
) -> Result<UpdateStreamTransform> {
    for stream in [old, new] {
        if &stream.descriptor != descriptor {
            return Err(CatalogError::DescriptorMismatch {
                expected: descriptor.clone(),
                actual: stream.descriptor.clone(),
            });
        }
    }
    Ok(diff_matched_streams(descriptor, old, new))
}

fn diff_matched_streams(
    descriptor: &StreamDescriptor,
    old: &StreamDefinition,
    new: &StreamDefinition,
) -> UpdateStreamTransform {
    let old_fields = field_types(&old.json_schema);
    let new_fields = field_types(&new.json_schema);
    let mut field_transforms = BTreeSet::new();

    for (path, old_type) in &old_fields {
        match new_fields.get(path) {
            None => {
                field_transforms.insert(FieldTransform::RemoveField {
                    path: path.clone(),
                    old_type: old_type.clone(),
                });
            }
            Some(new_type) if new_type != old_type => {
                field_transforms.insert(FieldTransform::UpdateField {
                    path: path.clone(),
                    old_type: old_type.clone(),
                    new_type: new_type.clone(),
                });
            }
            Some(_) => {}
        }
    }

    for (path, new_type) in &new_fields {
        if !old_fields.contains_key(path) {
            field_transforms.insert(FieldTransform::AddField {
                path: path.clone(),
                new_type: new_type.clone(),
            });
        }
    }

    UpdateStreamTransform::new(descriptor.clone(), field_transforms)
}
