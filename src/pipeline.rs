// 🚰 BioMuta load pipeline
// read → map → group by id → merge → sweep/unlist → documents
//
// Reading and mapping run to completion before anything is yielded (grouping
// needs the whole file, and any bad row aborts the load). Sanitizing runs
// lazily as the caller pulls documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::dataload::{default_sweep_values, dict_sweep, unlist};
use crate::error::Result;
use crate::mapper::{map_row, MappedRecord};
use crate::merge::Aggregator;
use crate::reader::BiomutaReader;

// ============================================================================
// DOCUMENT
// ============================================================================

/// Final document handed to the loader
///
/// Never contains null values, empty lists, empty objects or single-element
/// lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub biomuta: Map<String, Value>,
}

/// Strip empty fields, then unwrap single-element lists
pub fn sanitize(record: MappedRecord) -> Document {
    let mut biomuta = record.biomuta;
    dict_sweep(&mut biomuta, &default_sweep_values());
    for value in biomuta.values_mut() {
        unlist(value);
    }

    Document {
        id: record.id,
        biomuta,
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Data lines read, blank ones included
    pub rows_read: usize,
    pub blank_skipped: usize,
    pub records_mapped: usize,
    pub unique_ids: usize,
    /// Rows folded into another row with the same id
    pub duplicate_rows: usize,
}

// ============================================================================
// LOAD
// ============================================================================

/// Load `<data_folder>/biomuta-master.csv` with default settings
pub fn load_data(data_folder: &Path) -> Result<impl Iterator<Item = Document>> {
    load_data_with(data_folder, &LoaderConfig::default())
}

pub fn load_data_with(
    data_folder: &Path,
    config: &LoaderConfig,
) -> Result<impl Iterator<Item = Document>> {
    let (documents, _) = load_data_with_summary(data_folder, config)?;
    Ok(documents)
}

/// Run the pipeline and report what it did
pub fn load_data_with_summary(
    data_folder: &Path,
    config: &LoaderConfig,
) -> Result<(impl Iterator<Item = Document>, LoadSummary)> {
    config.validate()?;

    let mut reader = BiomutaReader::from_folder(data_folder, config)?;
    debug!(path = %reader.path().display(), "reading BioMuta rows");

    let mut aggregator = Aggregator::new();
    for row in reader.by_ref() {
        let row = row?;
        aggregator.push(map_row(&row, config)?);
    }

    let summary = LoadSummary {
        rows_read: reader.rows_read(),
        blank_skipped: reader.blank_skipped(),
        records_mapped: aggregator.records_seen(),
        unique_ids: aggregator.unique_ids(),
        duplicate_rows: aggregator.duplicate_rows(),
    };
    // Input fully consumed; release the file before yielding
    drop(reader);

    if summary.blank_skipped > 0 {
        warn!(skipped = summary.blank_skipped, "skipped blank rows");
    }
    info!(
        rows = summary.rows_read,
        mapped = summary.records_mapped,
        unique_ids = summary.unique_ids,
        duplicates = summary.duplicate_rows,
        "BioMuta rows mapped"
    );

    Ok((aggregator.finish().map(sanitize), summary))
}
