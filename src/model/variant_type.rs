#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Alleles longer than this are reported as structural insertions/deletions
/// rather than indels.
pub const SV_LENGTH_THRESHOLD: usize = 50;

/// Canonical token for the aggregate "any other allele" placeholder.
pub const NON_REF_TOKEN: &str = "<*>";

/// Legacy spelling of [`NON_REF_TOKEN`] emitted by gVCF producers.
pub const NON_REF_LEGACY_TOKEN: &str = "<NON_REF>";

/// Alternate written for reference blocks and no-variation records.
pub const NO_VARIATION_TOKEN: &str = ".";

/// Classification of a variant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VariantType {
    /// Single-nucleotide substitution.
    Snv,
    /// Multi-nucleotide substitution (equal length, more than one base).
    Mnv,
    /// Small insertion, deletion or complex length change.
    Indel,
    /// Insertion longer than [`SV_LENGTH_THRESHOLD`] or symbolic `<INS>`.
    Insertion,
    /// Deletion longer than [`SV_LENGTH_THRESHOLD`] or symbolic `<DEL>`.
    Deletion,
    /// Copy-number variant (`<CNV>`, `<CNn>`).
    Cnv,
    /// Duplication (`<DUP>`, `<DUP:TANDEM>`).
    Duplication,
    /// Inversion (`<INV>`).
    Inversion,
    /// Breakend in bracket notation.
    Breakend,
    /// Any other angle-bracket symbolic allele.
    Symbolic,
    /// Reference block or aggregate placeholder (`.`, `<*>`, `<NON_REF>`).
    NoVariation,
}

impl VariantType {
    /// Infer the type of a single reference/alternate pair.
    pub fn infer(reference: &str, alternate: &str) -> Self {
        if is_no_variation(alternate) {
            return VariantType::NoVariation;
        }
        if is_breakend(alternate) {
            return VariantType::Breakend;
        }
        if is_symbolic(alternate) {
            return Self::from_symbolic(alternate);
        }

        let ref_len = reference.len();
        let alt_len = alternate.len();
        if ref_len == alt_len {
            return if ref_len == 1 {
                VariantType::Snv
            } else {
                VariantType::Mnv
            };
        }

        if ref_len.max(alt_len) > SV_LENGTH_THRESHOLD {
            if alt_len > ref_len {
                VariantType::Insertion
            } else {
                VariantType::Deletion
            }
        } else {
            VariantType::Indel
        }
    }

    fn from_symbolic(alternate: &str) -> Self {
        let inner = alternate.trim_start_matches('<').trim_end_matches('>');
        let head = inner.split(':').next().unwrap_or_default();
        match head {
            "DEL" => VariantType::Deletion,
            "INS" => VariantType::Insertion,
            "DUP" => VariantType::Duplication,
            "INV" => VariantType::Inversion,
            "CNV" => VariantType::Cnv,
            _ if parse_copy_number_token(alternate).is_some() => VariantType::Cnv,
            _ => VariantType::Symbolic,
        }
    }
}

/// `<...>` symbolic allele (including the aggregate placeholders).
pub fn is_symbolic(alternate: &str) -> bool {
    alternate.len() > 2 && alternate.starts_with('<') && alternate.ends_with('>')
}

/// Bracket breakend notation such as `A[chr9:10[`.
pub fn is_breakend(alternate: &str) -> bool {
    alternate.contains('[') || alternate.contains(']')
}

/// `.`, `<*>` or `<NON_REF>`.
pub fn is_no_variation(alternate: &str) -> bool {
    alternate == NO_VARIATION_TOKEN || is_non_ref(alternate)
}

/// `<*>` or `<NON_REF>`.
pub fn is_non_ref(alternate: &str) -> bool {
    alternate == NON_REF_TOKEN || alternate == NON_REF_LEGACY_TOKEN
}

/// Copy number carried by a `<CNn>` token.
pub fn parse_copy_number_token(alternate: &str) -> Option<u32> {
    alternate
        .strip_prefix("<CN")?
        .strip_suffix('>')?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_sequence_types() {
        assert_eq!(VariantType::infer("C", "T"), VariantType::Snv);
        assert_eq!(VariantType::infer("CA", "TA"), VariantType::Mnv);
        assert_eq!(VariantType::infer("C", "CA"), VariantType::Indel);
        assert_eq!(VariantType::infer("", "A"), VariantType::Indel);

        let long_insertion = format!("C{}", "A".repeat(50));
        assert_eq!(VariantType::infer("C", &long_insertion), VariantType::Insertion);
        assert_eq!(VariantType::infer("", &"A".repeat(50)), VariantType::Indel);
    }

    #[test]
    fn infers_symbolic_types() {
        assert_eq!(VariantType::infer("N", "<DEL>"), VariantType::Deletion);
        assert_eq!(VariantType::infer("N", "<DUP:TANDEM>"), VariantType::Duplication);
        assert_eq!(VariantType::infer("C", "<CN0>"), VariantType::Cnv);
        assert_eq!(VariantType::infer("C", "<CNV>"), VariantType::Cnv);
        assert_eq!(VariantType::infer("A", "<NON_REF>"), VariantType::NoVariation);
        assert_eq!(VariantType::infer("A", "."), VariantType::NoVariation);
        assert_eq!(VariantType::infer("A", "A[chr9:10["), VariantType::Breakend);
        assert_eq!(VariantType::infer("A", "<MEI>"), VariantType::Symbolic);
    }

    #[test]
    fn copy_number_token() {
        assert_eq!(parse_copy_number_token("<CN3>"), Some(3));
        assert_eq!(parse_copy_number_token("<CNV>"), None);
        assert_eq!(parse_copy_number_token("CN3"), None);
    }
}
