//! Correspondence table persistence
//!
//! Writes the resolved mapping as a two-column CSV, overwritten on every
//! run, and optionally an audit CSV with case titles. Persistence is
//! best-effort: failures are logged and reported, never raised.

use crate::core::correspondence::{CorrespondenceMap, MatchedPair};
use crate::domain::Result;
use csv::WriterBuilder;
use std::path::{Path, PathBuf};

const MAPPING_HEADER: [&str; 2] = ["Source Case ID", "Target Case ID"];
const PAIRS_HEADER: [&str; 4] = ["Source Case ID", "Source Title", "Target Case ID", "Target Title"];

/// What the persister managed to write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Data rows written to the mapping table
    pub mapping_rows: Option<usize>,

    /// Data rows written to the audit table, when configured
    pub pair_rows: Option<usize>,

    /// Messages of failed writes
    pub errors: Vec<String>,
}

impl PersistReport {
    /// Whether every configured write succeeded
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Writes the mapping table and the optional audit table
#[derive(Debug, Clone)]
pub struct MappingPersister {
    mapping_path: PathBuf,
    pairs_path: Option<PathBuf>,
}

impl MappingPersister {
    /// Create a persister for `mapping_path`
    pub fn new(mapping_path: impl Into<PathBuf>) -> Self {
        Self {
            mapping_path: mapping_path.into(),
            pairs_path: None,
        }
    }

    /// Also write matched case titles to `path`
    pub fn with_pairs_path(mut self, path: Option<PathBuf>) -> Self {
        self.pairs_path = path;
        self
    }

    /// Destination of the mapping table
    pub fn mapping_path(&self) -> &Path {
        &self.mapping_path
    }

    /// Write both tables, logging instead of failing
    pub fn persist(&self, map: &CorrespondenceMap, pairs: &[MatchedPair]) -> PersistReport {
        let mut report = PersistReport::default();

        match write_mapping(&self.mapping_path, map) {
            Ok(rows) => {
                tracing::info!(path = %self.mapping_path.display(), rows, "Saved case mapping");
                report.mapping_rows = Some(rows);
            }
            Err(e) => {
                tracing::error!(path = %self.mapping_path.display(), error = %e, "Failed to save case mapping");
                report.errors.push(format!("{}: {e}", self.mapping_path.display()));
            }
        }

        if let Some(path) = &self.pairs_path {
            match write_pairs(path, pairs) {
                Ok(rows) => {
                    tracing::info!(path = %path.display(), rows, "Saved matched case pairs");
                    report.pair_rows = Some(rows);
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to save matched case pairs");
                    report.errors.push(format!("{}: {e}", path.display()));
                }
            }
        }

        report
    }
}

/// Write `Source Case ID,Target Case ID` rows, returning the row count
///
/// # Errors
///
/// Returns a persistence error if the file cannot be created or written.
pub fn write_mapping(path: &Path, map: &CorrespondenceMap) -> Result<usize> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(MAPPING_HEADER)?;

    for (source, target) in map.iter() {
        writer.write_record([source.to_string(), target.to_string()])?;
    }

    writer.flush()?;
    Ok(map.len())
}

/// Write matched pairs with titles, returning the row count
///
/// # Errors
///
/// Returns a persistence error if the file cannot be created or written.
pub fn write_pairs(path: &Path, pairs: &[MatchedPair]) -> Result<usize> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(PAIRS_HEADER)?;

    for pair in pairs {
        writer.write_record([
            pair.source_id.to_string(),
            pair.source_title.clone(),
            pair.target_id.to_string(),
            pair.target_title.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(pairs.len())
}
