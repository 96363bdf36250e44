//! Allele trimming: strip the context shared by reference and alternate.

use super::VariantKeyFields;

/// Result of trimming one reference/alternate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedAlleles {
    /// Bases removed from the front of both alleles.
    pub prefix: usize,
    /// Bases removed from the back of both alleles.
    pub suffix: usize,
    /// Minimal reference allele.
    pub reference: String,
    /// Minimal alternate allele.
    pub alternate: String,
}

impl TrimmedAlleles {
    /// Key fields of the trimmed pair for a record starting at `position`.
    pub fn key_fields(&self, position: i64, allele_index: usize) -> VariantKeyFields {
        let start = position + self.prefix as i64;
        let end = start + self.reference.len() as i64 - 1;
        VariantKeyFields::new(
            start,
            end,
            allele_index,
            self.reference.clone(),
            self.alternate.clone(),
        )
    }
}

/// Number of trailing characters shared by `a` and `b`, expressed as the index
/// (counted from the end) of the first difference.
///
/// When one string is a suffix of the other the shorter length is returned.
/// `None` means there is no difference at all.
pub fn reverse_index_of_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    let a = a.as_bytes();
    let b = b.as_bytes();
    let shared = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    Some(shared)
}

/// Index of the first differing character, or the shorter length when one
/// string is a prefix of the other. `None` for equal strings.
pub fn index_of_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    Some(shared_prefix(a.as_bytes(), b.as_bytes()))
}

fn shared_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Trim the common suffix, then the common prefix, of a reference/alternate pair.
///
/// Returns `None` when both alleles are identical. An empty allele on input
/// leaves nothing to anchor against, so no prefix is removed in that case.
pub fn trim(reference: &str, alternate: &str) -> Option<TrimmedAlleles> {
    let suffix = reverse_index_of_difference(reference, alternate)?;
    let reference = &reference.as_bytes()[..reference.len() - suffix];
    let alternate = &alternate.as_bytes()[..alternate.len() - suffix];

    let prefix = if reference.is_empty() || alternate.is_empty() {
        0
    } else {
        shared_prefix(reference, alternate)
    };

    Some(TrimmedAlleles {
        prefix,
        suffix,
        reference: String::from_utf8_lossy(&reference[prefix..]).into_owned(),
        alternate: String::from_utf8_lossy(&alternate[prefix..]).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn reverse_difference() {
        assert_eq!(reverse_index_of_difference("", ""), None);
        assert_eq!(reverse_index_of_difference("AAA", "AAC"), Some(0));
        assert_eq!(reverse_index_of_difference("ACA", "ACA"), None);
        assert_eq!(reverse_index_of_difference("GGA", "TTA"), Some(1));
        assert_eq!(reverse_index_of_difference("GGGGGGGGGGGGG", "GGG"), Some(3));
        assert_eq!(reverse_index_of_difference("GGG", "GGGGGGGGGGGGG"), Some(3));
    }

    #[test]
    fn forward_difference() {
        assert_eq!(index_of_difference("ACGT", "ACGT"), None);
        assert_eq!(index_of_difference("ACGT", "ACTT"), Some(2));
        assert_eq!(index_of_difference("AC", "ACGT"), Some(2));
        assert_eq!(index_of_difference("", "A"), Some(0));
    }

    #[test_case(100, "C", "A", 100, 100, "C", "A" ; "same")]
    #[test_case(100, "AC", "AA", 101, 101, "C", "A" ; "shared prefix")]
    #[test_case(100, "CA", "AA", 100, 100, "C", "A" ; "shared suffix")]
    #[test_case(100, "AC", "C", 100, 100, "A", "" ; "left deletion")]
    #[test_case(100, "CA", "C", 101, 101, "A", "" ; "right deletion")]
    #[test_case(100, "AAA", "A", 100, 101, "AA", "" ; "ambiguous deletion")]
    #[test_case(100, "ATC", "ACCC", 101, 101, "T", "CC" ; "indel")]
    #[test_case(100, "C", "AC", 100, 99, "", "A" ; "right insertion")]
    #[test_case(100, "C", "CA", 101, 100, "", "A" ; "left insertion")]
    #[test_case(100, "", "A", 100, 99, "", "A" ; "already minimal insertion")]
    fn trims_to_minimal_key_fields(
        position: i64,
        reference: &str,
        alternate: &str,
        start: i64,
        end: i64,
        expected_ref: &str,
        expected_alt: &str,
    ) {
        let key = trim(reference, alternate)
            .expect("alleles differ")
            .key_fields(position, 0);
        assert_eq!(key, VariantKeyFields::new(start, end, 0, expected_ref, expected_alt));
    }

    #[test]
    fn identical_alleles_have_no_key() {
        assert!(trim("ACGT", "ACGT").is_none());
    }

    #[test]
    fn trimmed_context_re_expands_to_the_original() {
        let pairs = [("AATATATATATAT", "A"), ("TACACACACAC", "TACAC"), ("GTACC", "GCC")];
        for (reference, alternate) in pairs {
            let trimmed = trim(reference, alternate).unwrap();
            let head = &reference[..trimmed.prefix];
            let tail = &reference[reference.len() - trimmed.suffix..];
            assert_eq!(format!("{head}{}{tail}", trimmed.reference), reference);
            assert_eq!(format!("{head}{}{tail}", trimmed.alternate), alternate);
        }
    }
}
