// 🧬 Genomic HGVS ids from VCF-style coordinates
// chrom/pos/ref/alt → "chr1:g.100A>G" style identifiers

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HgvsError {
    #[error("invalid allele(s) for {chrom}:{pos} {reference}>{alternate}")]
    InvalidAllele {
        chrom: String,
        pos: u64,
        reference: String,
        alternate: String,
    },

    #[error("position {pos} on {chrom} is too large to build an HGVS id")]
    PositionOverflow { chrom: String, pos: u64 },

    #[error("reference and alternate alleles are identical at {chrom}:{pos} ({allele})")]
    IdenticalAlleles {
        chrom: String,
        pos: u64,
        allele: String,
    },
}

fn is_ref_allele(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T' | b'N'))
}

fn is_alt_allele(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T' | b'N' | b'*'))
}

/// Build a genomic HGVS id (no variant-type flag)
///
/// # Examples:
/// ```
/// use biomuta_ingest::hgvs::get_hgvs_from_vcf;
/// assert_eq!(get_hgvs_from_vcf("1", 100, "A", "G").unwrap(), "chr1:g.100A>G");
/// assert_eq!(get_hgvs_from_vcf("1", 100, "AT", "A").unwrap(), "chr1:g.101del");
/// assert_eq!(get_hgvs_from_vcf("1", 100, "A", "AT").unwrap(), "chr1:g.100_101insT");
/// ```
pub fn get_hgvs_from_vcf(
    chrom: &str,
    pos: u64,
    reference: &str,
    alternate: &str,
) -> Result<String, HgvsError> {
    if !(is_ref_allele(reference) && is_alt_allele(alternate)) {
        return Err(HgvsError::InvalidAllele {
            chrom: chrom.to_string(),
            pos,
            reference: reference.to_string(),
            alternate: alternate.to_string(),
        });
    }
    if reference == alternate {
        return Err(HgvsError::IdenticalAlleles {
            chrom: chrom.to_string(),
            pos,
            allele: reference.to_string(),
        });
    }

    let ref_len = reference.len() as u64;
    let alt_len = alternate.len() as u64;
    // Alleles are ASCII after validation, so byte slicing is safe
    let ref_first = &reference[..1];
    let alt_first = &alternate[..1];
    let at = |delta: u64| offset(chrom, pos, delta);

    let hgvs = match (ref_len, alt_len) {
        // SNV
        (1, 1) => format!("chr{}:g.{}{}>{}", chrom, pos, reference, alternate),

        // deletion
        (_, 1) if ref_first == alternate => {
            let start = at(1)?;
            let end = at(ref_len - 1)?;
            if start == end {
                format!("chr{}:g.{}del", chrom, start)
            } else {
                format!("chr{}:g.{}_{}del", chrom, start, end)
            }
        }
        (_, 1) => {
            let end = at(ref_len - 1)?;
            format!("chr{}:g.{}_{}delins{}", chrom, pos, end, alternate)
        }

        // insertion
        (1, _) if alt_first == reference => {
            format!("chr{}:g.{}_{}ins{}", chrom, pos, at(1)?, &alternate[1..])
        }
        (1, _) => format!("chr{}:g.{}delins{}", chrom, pos, alternate),

        // both alleles longer than one base
        _ if ref_first == alt_first => {
            let (shift, reference, alternate) = trim_common_prefix(reference, alternate);
            return get_hgvs_from_vcf(chrom, at(shift)?, reference, alternate);
        }
        _ => {
            // End follows the alt length, matching the ids MyVariant.info
            // builds for the same variant.
            let end = at(alt_len - 1)?;
            format!("chr{}:g.{}_{}delins{}", chrom, pos, end, alternate)
        }
    };

    Ok(hgvs)
}

fn offset(chrom: &str, pos: u64, delta: u64) -> Result<u64, HgvsError> {
    pos.checked_add(delta).ok_or_else(|| HgvsError::PositionOverflow {
        chrom: chrom.to_string(),
        pos,
    })
}

/// Drop the bases ref/alt share on the left; returns the position shift
///
/// When one allele is a prefix of the other, one anchor base is kept so the
/// result is a plain insertion or deletion (`CTTTT/CT` → `TTTT/T`).
fn trim_common_prefix<'a>(reference: &'a str, alternate: &'a str) -> (u64, &'a str, &'a str) {
    let shared = reference
        .bytes()
        .zip(alternate.bytes())
        .take_while(|(r, a)| r == a)
        .count();

    let cut = if shared == reference.len() || shared == alternate.len() {
        shared - 1
    } else {
        shared
    };
    (cut as u64, &reference[cut..], &alternate[cut..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snv() {
        assert_eq!(get_hgvs_from_vcf("17", 7577120, "C", "T").unwrap(), "chr17:g.7577120C>T");
        assert_eq!(get_hgvs_from_vcf("MT", 3243, "A", "G").unwrap(), "chrMT:g.3243A>G");
    }

    #[test]
    fn test_deletion() {
        assert_eq!(get_hgvs_from_vcf("1", 100, "AT", "A").unwrap(), "chr1:g.101del");
        assert_eq!(get_hgvs_from_vcf("1", 100, "ATTG", "A").unwrap(), "chr1:g.101_103del");
    }

    #[test]
    fn test_deletion_without_anchor_is_delins() {
        assert_eq!(get_hgvs_from_vcf("1", 100, "ATT", "G").unwrap(), "chr1:g.100_102delinsG");
    }

    #[test]
    fn test_insertion() {
        assert_eq!(get_hgvs_from_vcf("2", 50, "A", "ATG").unwrap(), "chr2:g.50_51insTG");
        assert_eq!(get_hgvs_from_vcf("2", 50, "A", "GT").unwrap(), "chr2:g.50delinsGT");
    }

    #[test]
    fn test_multi_base_with_shared_prefix() {
        // CTTTT/CT → TTTT/T at pos+1 → deletion of 3 bases
        assert_eq!(get_hgvs_from_vcf("3", 10, "CTTTT", "CT").unwrap(), "chr3:g.12_14del");
        // TC/TG → C/G
        assert_eq!(get_hgvs_from_vcf("3", 10, "TC", "TG").unwrap(), "chr3:g.11C>G");
        // CA/CAGG → A/AGG → insertion
        assert_eq!(get_hgvs_from_vcf("3", 10, "CA", "CAGG").unwrap(), "chr3:g.11_12insGG");
    }

    #[test]
    fn test_multi_base_without_shared_prefix() {
        assert_eq!(get_hgvs_from_vcf("4", 20, "AC", "GT").unwrap(), "chr4:g.20_21delinsGT");
        assert_eq!(get_hgvs_from_vcf("4", 20, "ACG", "TT").unwrap(), "chr4:g.20_21delinsTT");
        assert_eq!(get_hgvs_from_vcf("4", 20, "AC", "TTT").unwrap(), "chr4:g.20_22delinsTTT");
    }

    #[test]
    fn test_invalid_alleles() {
        assert!(matches!(
            get_hgvs_from_vcf("1", 1, "-", "A"),
            Err(HgvsError::InvalidAllele { .. })
        ));
        assert!(matches!(
            get_hgvs_from_vcf("1", 1, "A", ""),
            Err(HgvsError::InvalidAllele { .. })
        ));
        assert!(matches!(
            get_hgvs_from_vcf("1", 1, "a", "G"),
            Err(HgvsError::InvalidAllele { .. })
        ));
    }

    #[test]
    fn test_identical_alleles() {
        assert!(matches!(
            get_hgvs_from_vcf("1", 1, "AC", "AC"),
            Err(HgvsError::IdenticalAlleles { .. })
        ));
    }

    #[test]
    fn test_position_overflow() {
        for (reference, alternate) in [("A", "AT"), ("AT", "A"), ("AC", "GTT"), ("CA", "CAGG")] {
            assert!(matches!(
                get_hgvs_from_vcf("1", u64::MAX, reference, alternate),
                Err(HgvsError::PositionOverflow { pos: u64::MAX, .. })
            ));
        }
        assert_eq!(
            get_hgvs_from_vcf("1", u64::MAX, "A", "G").unwrap(),
            format!("chr1:g.{}A>G", u64::MAX)
        );
    }

    #[test]
    fn test_deterministic() {
        let a = get_hgvs_from_vcf("X", 999, "G", "A").unwrap();
        let b = get_hgvs_from_vcf("X", 999, "G", "A").unwrap();
        assert_eq!(a, b);
    }
}
