//! Human- and machine-readable diff reports

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::checksum::Checksum;
use crate::diff::catalog_diff;
use crate::error::Result;
use crate::transform::{FieldTransform, StreamTransform};

/// Result of diffing two catalogs, with enough context to print it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffReport {
    pub generated_at: DateTime<Utc>,
    pub old_checksum: Checksum,
    pub new_checksum: Checksum,
    /// Streams present and deeply equal in both catalogs
    pub unchanged_streams: usize,
    pub transforms: BTreeSet<StreamTransform>,
}

/// Counts of each kind of change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub streams_added: usize,
    pub streams_removed: usize,
    pub streams_updated: usize,
    pub fields_added: usize,
    pub fields_removed: usize,
    pub fields_updated: usize,
}

impl DiffReport {
    /// Diff `old` against `new`
    pub fn build(old: &Catalog, new: &Catalog) -> Result<Self> {
        let transforms = catalog_diff(old, new);
        let new_index = new.index();
        let unchanged_streams = old
            .index()
            .into_iter()
            .filter(|(descriptor, stream)| new_index.get(descriptor) == Some(stream))
            .count();

        Ok(Self {
            generated_at: Utc::now(),
            old_checksum: old.checksum()?,
            new_checksum: new.checksum()?,
            unchanged_streams,
            transforms,
        })
    }

    pub fn has_changes(&self) -> bool {
        !self.transforms.is_empty()
    }

    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for transform in &self.transforms {
            match transform {
                StreamTransform::AddStream { .. } => summary.streams_added += 1,
                StreamTransform::RemoveStream { .. } => summary.streams_removed += 1,
                StreamTransform::UpdateStream(update) => {
                    summary.streams_updated += 1;
                    for field in &update.field_transforms {
                        match field {
                            FieldTransform::AddField { .. } => summary.fields_added += 1,
                            FieldTransform::RemoveField { .. } => summary.fields_removed += 1,
                            FieldTransform::UpdateField { .. } => summary.fields_updated += 1,
                        }
                    }
                }
            }
        }
        summary
    }

    /// Plain-text rendering, written through [`fmt::Display`]
    pub fn text(&self, include_checksums: bool) -> TextReport<'_> {
        TextReport {
            report: self,
            include_checksums,
        }
    }
}

/// Borrowed view of a [`DiffReport`] that prints as plain text
pub struct TextReport<'a> {
    report: &'a DiffReport,
    include_checksums: bool,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let summary = report.summary();

        writeln!(f, "CATALOG DIFF")?;
        if self.include_checksums {
            writeln!(f, "  old: {}", report.old_checksum.short())?;
            writeln!(f, "  new: {}", report.new_checksum.short())?;
        }
        writeln!(f)?;

        let added: Vec<_> = report
            .transforms
            .iter()
            .filter(|t| matches!(t, StreamTransform::AddStream { .. }))
            .collect();
        if !added.is_empty() {
            writeln!(f, "ADDED STREAMS ({}):", added.len())?;
            for transform in added {
                writeln!(f, "  + {}", transform.descriptor())?;
            }
            writeln!(f)?;
        }

        let removed: Vec<_> = report
            .transforms
            .iter()
            .filter(|t| matches!(t, StreamTransform::RemoveStream { .. }))
            .collect();
        if !removed.is_empty() {
            writeln!(f, "REMOVED STREAMS ({}):", removed.len())?;
            for transform in removed {
                writeln!(f, "  - {}", transform.descriptor())?;
            }
            writeln!(f)?;
        }

        let updated: Vec<_> = report
            .transforms
            .iter()
            .filter_map(|t| match t {
                StreamTransform::UpdateStream(update) => Some(update),
                _ => None,
            })
            .collect();
        if !updated.is_empty() {
            writeln!(f, "UPDATED STREAMS ({}):", updated.len())?;
            for update in updated {
                writeln!(f, "  ~ {}", update.descriptor)?;
                if update.field_transforms.is_empty() {
                    writeln!(f, "      (no field changes)")?;
                }
                for field in &update.field_transforms {
                    writeln!(f, "      {}", field)?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "SUMMARY:")?;
        writeln!(f, "  Unchanged streams: {}", report.unchanged_streams)?;
        writeln!(
            f,
            "  Streams: +{} -{} ~{}",
            summary.streams_added, summary.streams_removed, summary.streams_updated
        )?;
        writeln!(
            f,
            "  Fields:  +{} -{} ~{}",
            summary.fields_added, summary.fields_removed, summary.fields_updated
        )
    }
}
