// 📂 BioMuta CSV Reader
// Opens the export, validates the header, yields raw rows lazily

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::LoaderConfig;
use crate::error::{IngestError, Result};

// ============================================================================
// HEADER
// ============================================================================

/// Columns the row mapper reads, named after header normalization
pub const REQUIRED_COLUMNS: [&str; 22] = [
    "chr_id",
    "chr_pos",
    "ref_nt",
    "alt_nt",
    "transcript_id",
    "peptide_id",
    "uniprot_ac",
    "refseq_ac",
    "cds_pos",
    "pep_pos",
    "uniprot_pos",
    "ref_aa",
    "alt_aa",
    "mut_freq",
    "data_src",
    "do_id",
    "do_name",
    "uberon_id",
    "gene_name",
    "pmid_list",
    "site_prd",
    "site_ann",
];

/// Column used to tell data rows from blank/trailer lines
pub const INDEX_COLUMN: &str = "index";

/// Normalize a header name: lowercase, `/ - (` become `_`, `) #` are dropped
///
/// # Examples:
/// ```
/// use biomuta_ingest::reader::clean_header;
/// assert_eq!(clean_header("Chr-ID"), "chr_id");
/// assert_eq!(clean_header("#Index"), "index");
/// assert_eq!(clean_header("PMID(list)"), "pmid_list");
/// ```
pub fn clean_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace('/', "_")
        .replace('-', "_")
        .replace('(', "_")
        .replace(')', "")
        .replace('#', "")
}

// ============================================================================
// RAW ROW
// ============================================================================

/// One CSV line keyed by normalized column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1-based line in the source file
    pub line: u64,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: u64) -> Self {
        RawRow {
            line,
            fields: HashMap::new(),
        }
    }

    /// Builder pattern: set one column
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.fields.insert(column.to_string(), value.to_string());
        self
    }

    /// Value of a column, "" when the column is absent
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.is_empty())
    }
}

// ============================================================================
// READER
// ============================================================================

/// Lazy row source over one BioMuta export
///
/// Owns the file handle; it is closed when the reader is dropped.
pub struct BiomutaReader {
    path: PathBuf,
    header: Vec<String>,
    has_index: bool,
    records: StringRecordsIntoIter<File>,
    rows_read: usize,
    blank_skipped: usize,
}

impl BiomutaReader {
    /// Open `<data_folder>/<config.file_name>`
    pub fn from_folder(data_folder: &Path, config: &LoaderConfig) -> Result<Self> {
        Self::open(&data_folder.join(&config.file_name), config)
    }

    pub fn open(path: &Path, config: &LoaderConfig) -> Result<Self> {
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut records = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(false)
            .flexible(true)
            .from_reader(file)
            .into_records();

        let raw_header = match records.next() {
            Some(result) => result?,
            None => {
                return Err(IngestError::Schema(format!(
                    "{} is empty, expected a header line",
                    path.display()
                )))
            }
        };

        let header = validate_header(&raw_header, config.expected_columns)?;
        let has_index = header.iter().any(|h| h == INDEX_COLUMN);

        debug!(
            path = %path.display(),
            columns = header.len(),
            has_index,
            "opened BioMuta export"
        );

        Ok(BiomutaReader {
            path: path.to_path_buf(),
            header,
            has_index,
            records,
            rows_read: 0,
            blank_skipped: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalized header names, in file order
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data lines read so far, blank ones included
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Lines dropped by the blank-row filter so far
    pub fn blank_skipped(&self) -> usize {
        self.blank_skipped
    }

    fn to_row(&self, record: &StringRecord) -> RawRow {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let mut row = RawRow::new(line);
        for (i, name) in self.header.iter().enumerate() {
            let value = record.get(i).unwrap_or("");
            row.fields.insert(name.clone(), value.to_string());
        }
        row
    }

    fn keep(&self, row: &RawRow) -> bool {
        if self.has_index {
            !row.get(INDEX_COLUMN).is_empty()
        } else {
            !row.is_blank()
        }
    }
}

impl Iterator for BiomutaReader {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };
            self.rows_read += 1;

            let row = self.to_row(&record);
            if self.keep(&row) {
                return Some(Ok(row));
            }
            self.blank_skipped += 1;
        }
    }
}

/// Check the column count, normalize names, make sure every mapped column exists
fn validate_header(raw: &StringRecord, expected_columns: usize) -> Result<Vec<String>> {
    if raw.len() != expected_columns {
        return Err(IngestError::Schema(format!(
            "Expecting {} columns, but got {}",
            expected_columns,
            raw.len()
        )));
    }

    let header: Vec<String> = raw.iter().map(clean_header).collect();

    for column in REQUIRED_COLUMNS {
        if !header.iter().any(|h| h == column) {
            return Err(IngestError::Schema(format!(
                "missing column '{}' after header normalization",
                column
            )));
        }
    }

    Ok(header)
}
