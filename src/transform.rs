//! Change records produced by a catalog diff

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::StreamDescriptor;
use crate::types::FieldTypeSet;

/// Location of a field within one schema tree, from the stream root.
///
/// Paths are compared by value only, so a renamed field is a removal plus
/// an addition, never an update.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend this path with a child field name
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Name of the field this path points at
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for FieldPath {
    fn from(segments: [S; N]) -> Self {
        segments.into_iter().collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A single field-level change within an updated stream
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "transform_type", rename_all = "snake_case")]
pub enum FieldTransform {
    AddField {
        path: FieldPath,
        new_type: FieldTypeSet,
    },
    RemoveField {
        path: FieldPath,
        old_type: FieldTypeSet,
    },
    UpdateField {
        path: FieldPath,
        old_type: FieldTypeSet,
        new_type: FieldTypeSet,
    },
}

impl FieldTransform {
    pub fn path(&self) -> &FieldPath {
        match self {
            FieldTransform::AddField { path, .. }
            | FieldTransform::RemoveField { path, .. }
            | FieldTransform::UpdateField { path, .. } => path,
        }
    }
}

impl fmt::Display for FieldTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTransform::AddField { path, new_type } => write!(f, "+ {} {}", path, new_type),
            FieldTransform::RemoveField { path, old_type } => write!(f, "- {} {}", path, old_type),
            FieldTransform::UpdateField {
                path,
                old_type,
                new_type,
            } => write!(f, "~ {} {} -> {}", path, old_type, new_type),
        }
    }
}

/// Field-level changes of a stream present in both catalogs
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UpdateStreamTransform {
    pub descriptor: StreamDescriptor,
    pub field_transforms: BTreeSet<FieldTransform>,
}

impl UpdateStreamTransform {
    pub fn new(descriptor: StreamDescriptor, field_transforms: BTreeSet<FieldTransform>) -> Self {
        Self {
            descriptor,
            field_transforms,
        }
    }
}

/// A single stream-level change between two catalogs
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "transform_type", rename_all = "snake_case")]
pub enum StreamTransform {
    AddStream { descriptor: StreamDescriptor },
    RemoveStream { descriptor: StreamDescriptor },
    UpdateStream(UpdateStreamTransform),
}

impl StreamTransform {
    pub fn descriptor(&self) -> &StreamDescriptor {
        match self {
            StreamTransform::AddStream { descriptor }
            | StreamTransform::RemoveStream { descriptor } => descriptor,
            StreamTransform::UpdateStream(update) => &update.descriptor,
        }
    }
}
