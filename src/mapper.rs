// 🗺️ Row Mapper - one raw CSV row → one BioMuta record keyed by HGVS id
//
// Field rules:
// - chromosome "M" is renamed "MT"
// - sentinel values ("-") in optional fields mean "no value"
// - uberon_id / pmid_list are split on ';'
// - do_name carries "DOID:<id> / <name>" and must agree with do_id

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::LoaderConfig;
use crate::dataload::value_convert_to_number;
use crate::error::{IngestError, Result};
use crate::hgvs::get_hgvs_from_vcf;
use crate::reader::RawRow;

/// Key of the per-source sub-document
pub const SOURCE_KEY: &str = "biomuta";

// ============================================================================
// CORE TYPES
// ============================================================================

/// Disease ontology annotation of one row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseAnnotation {
    pub do_id: Option<String>,
    pub do_name: Option<String>,
}

/// Typed view of the `biomuta` sub-document, before numeric coercion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomutaAnnotation {
    pub chrom: String,
    pub pos: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "alt")]
    pub alternate: String,
    pub transcript_id: Option<String>,
    pub peptide_id: Option<String>,
    pub uniprot_ac: Option<String>,
    pub refseq_ac: Option<String>,
    pub cds_pos: Option<String>,
    pub pep_pos: Option<String>,
    pub uniprot_pos: Option<String>,
    pub ref_aa: Option<String>,
    pub alt_aa: Option<String>,
    pub mut_freq: Option<String>,
    pub data_src: Option<String>,
    pub do_id: DiseaseAnnotation,
    pub uberon_id: Option<Vec<String>>,
    pub gene_name: Option<String>,
    pub pmid: Option<Vec<String>>,
    pub site_prd: Option<String>,
    pub site_ann: String,
}

/// Mapped row: HGVS id plus its `biomuta` fields
///
/// Ids are not unique; one variant can span several rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub biomuta: Map<String, Value>,
}

// ============================================================================
// FIELD HELPERS
// ============================================================================

/// Mitochondrial chromosome is stored as "MT"
pub fn normalize_chrom(chrom: &str) -> &str {
    if chrom == "M" {
        "MT"
    } else {
        chrom
    }
}

/// `None` when the value is one of the configured sentinels
pub fn clean_data(value: &str, config: &LoaderConfig) -> Option<String> {
    if config.is_sentinel(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Split a multi-valued field; an empty field yields `None`, not an empty list
pub fn to_list(value: &str, sep: &str) -> Option<Vec<String>> {
    if value.is_empty() {
        None
    } else {
        Some(value.split(sep).map(str::to_string).collect())
    }
}

/// Split `"DOID:<id> / <name>"` into `(id, name)`
pub fn split_do_name(value: &str, line: u64) -> Result<(Option<String>, Option<String>)> {
    if value.is_empty() {
        return Ok((None, None));
    }

    let malformed = || IngestError::DataIntegrity {
        line,
        message: format!("malformed do_name {:?}, expected \"DOID:<id> / <name>\"", value),
    };

    let (prefix, name) = value.split_once(" / ").ok_or_else(malformed)?;
    let id = prefix.split(':').nth(1).ok_or_else(malformed)?;

    Ok((Some(id.to_string()), Some(name.to_string())))
}

/// Parse do_name and check its id against the do_id column
fn disease_annotation(row: &RawRow, config: &LoaderConfig) -> Result<DiseaseAnnotation> {
    let do_id = clean_data(row.get("do_id"), config).filter(|s| !s.is_empty());
    let (name_id, do_name) = split_do_name(row.get("do_name"), row.line)?;

    if do_id != name_id {
        return Err(IngestError::DataIntegrity {
            line: row.line,
            message: format!(
                "do_id mismatch: do_id column {:?}, do_name id {:?}",
                do_id, name_id
            ),
        });
    }

    Ok(DiseaseAnnotation { do_id, do_name })
}

// ============================================================================
// MAPPING
// ============================================================================

/// Build the typed annotation and HGVS id of one row
pub fn map_fields(row: &RawRow, config: &LoaderConfig) -> Result<(String, BiomutaAnnotation)> {
    let chrom = normalize_chrom(row.get("chr_id")).to_string();
    let pos_raw = row.get("chr_pos");
    let pos: u64 = pos_raw
        .trim()
        .parse()
        .map_err(|_| IngestError::InvalidPosition {
            line: row.line,
            value: pos_raw.to_string(),
        })?;

    let reference = row.get("ref_nt").to_string();
    let alternate = row.get("alt_nt").to_string();

    let hgvs = get_hgvs_from_vcf(&chrom, pos, &reference, &alternate).map_err(|source| {
        IngestError::Hgvs {
            line: row.line,
            source,
        }
    })?;

    let clean = |column: &str| clean_data(row.get(column), config);
    let sep = config.list_separator.as_str();

    let annotation = BiomutaAnnotation {
        chrom,
        pos: pos_raw.to_string(),
        reference,
        alternate,
        transcript_id: clean("transcript_id"),
        peptide_id: clean("peptide_id"),
        uniprot_ac: clean("uniprot_ac"),
        refseq_ac: clean("refseq_ac"),
        cds_pos: clean("cds_pos"),
        pep_pos: clean("pep_pos"),
        uniprot_pos: clean("uniprot_pos"),
        ref_aa: clean("ref_aa"),
        alt_aa: clean("alt_aa"),
        mut_freq: clean("mut_freq"),
        data_src: clean("data_src"),
        do_id: disease_annotation(row, config)?,
        uberon_id: to_list(row.get("uberon_id"), sep),
        gene_name: clean("gene_name"),
        pmid: to_list(row.get("pmid_list"), sep),
        site_prd: clean("site_prd"),
        site_ann: row.get("site_ann").to_string(),
    };

    Ok((hgvs, annotation))
}

/// Map one raw row to a record, numeric strings coerced to numbers
pub fn map_row(row: &RawRow, config: &LoaderConfig) -> Result<MappedRecord> {
    let (id, annotation) = map_fields(row, config)?;

    let mut biomuta = serde_json::to_value(&annotation)?;
    value_convert_to_number(&mut biomuta, &config.numeric_skip_keys);

    let Value::Object(biomuta) = biomuta else {
        return Err(IngestError::Schema(format!(
            "line {}: {} fields did not serialize to an object",
            row.line, SOURCE_KEY
        )));
    };

    Ok(MappedRecord { id, biomuta })
}
