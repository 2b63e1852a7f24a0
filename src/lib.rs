// BioMuta Ingest - Core Library
// Turns the BioMuta CSV export into HGVS-keyed documents

pub mod config;
pub mod dataload;
pub mod error;
pub mod hgvs;
pub mod mapper;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod reader;

// Re-export commonly used types
pub use config::{LoaderConfig, DEFAULT_FILE_NAME, VALID_COLUMN_NO};
pub use dataload::{dict_sweep, unlist, value_convert_to_number};
pub use error::{IngestError, Result};
pub use hgvs::{get_hgvs_from_vcf, HgvsError};
pub use mapper::{map_row, BiomutaAnnotation, DiseaseAnnotation, MappedRecord};
pub use merge::{group_and_merge, merge_duplicate_rows, Aggregator};
pub use output::{write_documents, write_json_array, write_json_lines, OutputFormat};
pub use pipeline::{
    load_data, load_data_with, load_data_with_summary, sanitize, Document, LoadSummary,
};
pub use reader::{clean_header, BiomutaReader, RawRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
