// 🔗 Aggregator - collapse rows that share an HGVS id
// One variant can appear on several rows (one per citation, tissue, source...)

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::mapper::MappedRecord;

// ============================================================================
// MERGE
// ============================================================================

/// Distinct non-null values of `key` across the group, first-seen order
///
/// List values contribute their elements, so list fields end up as a union.
fn distinct_values(group: &[MappedRecord], key: &str) -> Vec<Value> {
    let mut seen: Vec<Value> = Vec::new();

    let mut add = |value: &Value| {
        if !value.is_null() && !seen.contains(value) {
            seen.push(value.clone());
        }
    };

    for record in group {
        match record.biomuta.get(key) {
            Some(Value::Array(items)) => items.iter().for_each(&mut add),
            Some(value) => add(value),
            None => {}
        }
    }

    seen
}

/// Field names across the group, base record first
fn field_names(group: &[MappedRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in group {
        for key in record.biomuta.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }
    names
}

/// Merge records sharing one id into a single record
///
/// Identical values collapse to one; differing values become a deduplicated
/// list. A field null in every record stays null. Repeated entries inside
/// one row's list are deduplicated the same way. Returns `None` for an
/// empty group.
pub fn merge_duplicate_rows(mut group: Vec<MappedRecord>) -> Option<MappedRecord> {
    if group.is_empty() {
        return None;
    }

    let mut biomuta = Map::new();
    for key in field_names(&group) {
        let mut values = distinct_values(&group, &key);
        let merged = match values.len() {
            0 => Value::Null,
            1 => values.remove(0),
            _ => Value::Array(values),
        };
        biomuta.insert(key, merged);
    }

    let id = group.swap_remove(0).id;
    Some(MappedRecord { id, biomuta })
}

// ============================================================================
// AGGREGATOR
// ============================================================================

/// Groups records by exact id; drains in ascending id order
#[derive(Debug, Default)]
pub struct Aggregator {
    groups: BTreeMap<String, Vec<MappedRecord>>,
    records_seen: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Aggregator::default()
    }

    pub fn push(&mut self, record: MappedRecord) {
        self.records_seen += 1;
        self.groups.entry(record.id.clone()).or_default().push(record);
    }

    /// Records pushed so far
    pub fn records_seen(&self) -> usize {
        self.records_seen
    }

    /// Distinct ids so far
    pub fn unique_ids(&self) -> usize {
        self.groups.len()
    }

    /// Rows that will be folded into another row with the same id
    pub fn duplicate_rows(&self) -> usize {
        self.records_seen - self.groups.len()
    }

    /// Merge every group, ascending by id
    pub fn finish(self) -> impl Iterator<Item = MappedRecord> {
        debug!(
            records = self.records_seen,
            unique_ids = self.groups.len(),
            "merging duplicate rows"
        );
        self.groups.into_values().filter_map(merge_duplicate_rows)
    }
}

impl Extend<MappedRecord> for Aggregator {
    fn extend<I: IntoIterator<Item = MappedRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Group records by id and merge each group; output sorted by id
pub fn group_and_merge<I>(records: I) -> Vec<MappedRecord>
where
    I: IntoIterator<Item = MappedRecord>,
{
    let mut aggregator = Aggregator::new();
    aggregator.extend(records);
    aggregator.finish().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, biomuta: Value) -> MappedRecord {
        MappedRecord {
            id: id.to_string(),
            biomuta: biomuta.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_merge_pmid_union() {
        let a = record("chr1:g.100A>G", json!({"gene_name": "TP53", "pmid": [111]}));
        let b = record("chr1:g.100A>G", json!({"gene_name": "TP53", "pmid": [222]}));

        let merged = merge_duplicate_rows(vec![a, b]).unwrap();
        assert_eq!(merged.id, "chr1:g.100A>G");
        assert_eq!(merged.biomuta["gene_name"], json!("TP53"));
        assert_eq!(merged.biomuta["pmid"], json!([111, 222]));
    }

    #[test]
    fn test_merge_differing_scalars() {
        let a = record("x", json!({"data_src": "cosmic", "mut_freq": 1}));
        let b = record("x", json!({"data_src": "tcga", "mut_freq": 1}));
        let c = record("x", json!({"data_src": "cosmic", "mut_freq": 1}));

        let merged = merge_duplicate_rows(vec![a, b, c]).unwrap();
        assert_eq!(merged.biomuta["data_src"], json!(["cosmic", "tcga"]));
        assert_eq!(merged.biomuta["mut_freq"], json!(1));
    }

    #[test]
    fn test_merge_nulls() {
        let a = record("x", json!({"site_prd": null, "refseq_ac": null}));
        let b = record("x", json!({"site_prd": "phospho", "refseq_ac": null}));

        let merged = merge_duplicate_rows(vec![a, b]).unwrap();
        assert_eq!(merged.biomuta["site_prd"], json!("phospho"));
        assert_eq!(merged.biomuta["refseq_ac"], Value::Null);
    }

    #[test]
    fn test_merge_nested_objects() {
        let disease = json!({"do_id": 612, "do_name": "mouth neoplasm"});
        let other = json!({"do_id": 1324, "do_name": "lung cancer"});
        let a = record("x", json!({"do_id": disease.clone()}));
        let b = record("x", json!({"do_id": disease.clone()}));
        let c = record("x", json!({"do_id": other.clone()}));

        let merged = merge_duplicate_rows(vec![a, b, c]).unwrap();
        assert_eq!(merged.biomuta["do_id"], json!([disease, other]));
    }

    #[test]
    fn test_merge_single_and_empty() {
        let only = record("x", json!({"pmid": [1, 2]}));
        assert_eq!(merge_duplicate_rows(vec![only.clone()]), Some(only));
        assert_eq!(merge_duplicate_rows(Vec::new()), None);
    }

    #[test]
    fn test_single_row_list_deduplicated() {
        let single = record("x", json!({"pmid": [1, 1], "gene_name": "TP53"}));
        let merged = merge_duplicate_rows(vec![single]).unwrap();
        assert_eq!(merged.biomuta["pmid"], json!(1));
        assert_eq!(merged.biomuta["gene_name"], json!("TP53"));

        let a = record("x", json!({"pmid": [1]}));
        let b = record("x", json!({"pmid": [1]}));
        let split = merge_duplicate_rows(vec![a, b]).unwrap();
        assert_eq!(split.biomuta["pmid"], merged.biomuta["pmid"]);
    }

    #[test]
    fn test_group_and_merge_sorted_by_id() {
        let records = vec![
            record("chr2:g.5A>T", json!({"pmid": [1]})),
            record("chr1:g.9C>G", json!({"pmid": [2]})),
            record("chr2:g.5A>T", json!({"pmid": [3]})),
            record("chr10:g.1G>A", json!({"pmid": [4]})),
        ];

        let merged = group_and_merge(records);
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["chr10:g.1G>A", "chr1:g.9C>G", "chr2:g.5A>T"]);
        assert_eq!(merged[2].biomuta["pmid"], json!([1, 3]));
    }

    #[test]
    fn test_aggregator_counts() {
        let mut aggregator = Aggregator::new();
        aggregator.push(record("a", json!({})));
        aggregator.push(record("b", json!({})));
        aggregator.push(record("a", json!({})));

        assert_eq!(aggregator.records_seen(), 3);
        assert_eq!(aggregator.unique_ids(), 2);
        assert_eq!(aggregator.duplicate_rows(), 1);
        assert_eq!(aggregator.finish().count(), 2);
    }
}
