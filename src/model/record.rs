use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{is_breakend, is_no_variation, is_symbolic, StructuralInfo, StudyEntry, VariantType};

/// A variant record: locus, alleles, structural fields and study data.
///
/// Coordinates are 1-based and closed. A pure insertion has an empty reference
/// and `end == start - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariantRecord {
    /// Contig name.
    pub chromosome: String,
    /// First reference base covered.
    pub start: i64,
    /// Last reference base covered.
    pub end: i64,
    /// Reference allele (may be empty).
    pub reference: String,
    /// Alternate alleles. Normalized records carry exactly one.
    pub alternates: Vec<String>,
    /// Variant classification.
    pub variant_type: VariantType,
    /// Structural fields, present for symbolic and breakend records.
    pub structural: Option<StructuralInfo>,
    /// Per-study data.
    pub studies: Vec<StudyEntry>,
}

impl VariantRecord {
    /// Create a record with `end` derived from the reference length.
    pub fn new(
        chromosome: impl Into<String>,
        start: i64,
        reference: impl Into<String>,
        alternates: &str,
    ) -> Self {
        let reference = reference.into();
        let end = start + reference.len() as i64 - 1;
        Self::with_end(chromosome, start, end, reference, alternates)
    }

    /// Create a record with an explicit end (symbolic alleles, reference blocks).
    ///
    /// `alternates` is a comma-separated list as written in a VCF ALT column.
    pub fn with_end(
        chromosome: impl Into<String>,
        start: i64,
        end: i64,
        reference: impl Into<String>,
        alternates: &str,
    ) -> Self {
        let reference = reference.into();
        let alternates: Vec<String> = split_alternates(alternates);
        let variant_type = alternates
            .first()
            .map(|alt| VariantType::infer(&reference, alt))
            .unwrap_or(VariantType::NoVariation);
        Self {
            chromosome: chromosome.into(),
            start,
            end,
            reference,
            alternates,
            variant_type,
            structural: None,
            studies: Vec::new(),
        }
    }

    /// Attach a study.
    pub fn with_study(mut self, study: StudyEntry) -> Self {
        self.studies.push(study);
        self
    }

    /// Primary alternate allele.
    pub fn alternate(&self) -> &str {
        self.alternates.first().map(String::as_str).unwrap_or_default()
    }

    /// Event length: the longer allele for sequence variants, the covered span otherwise.
    pub fn length(&self) -> i64 {
        let alternate = self.alternate();
        if is_symbolic(alternate) || is_breakend(alternate) || is_no_variation(alternate) {
            (self.end - self.start + 1).max(0)
        } else {
            self.reference.len().max(alternate.len()) as i64
        }
    }

    /// First study, if any.
    pub fn study(&self) -> Option<&StudyEntry> {
        self.studies.first()
    }

    /// Identifier used when reporting failures: `chrom:start:ref:alts`.
    pub fn id(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.chromosome,
            self.start,
            self.reference,
            self.alternates.join(",")
        )
    }
}

impl fmt::Display for VariantRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reference = if self.reference.is_empty() {
            "-"
        } else {
            self.reference.as_str()
        };
        let alternates = self
            .alternates
            .iter()
            .map(|alt| if alt.is_empty() { "-" } else { alt.as_str() })
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "{}:{}:{}:{}",
            self.chromosome, self.start, reference, alternates
        )
    }
}

/// Split a VCF-style ALT column. Commas inside breakend notation never occur,
/// so a plain split is sufficient.
fn split_alternates(alternates: &str) -> Vec<String> {
    if alternates.is_empty() {
        return vec![String::new()];
    }
    alternates.split(',').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_dash_for_empty_alleles() {
        let insertion = VariantRecord::with_end("22", 16349651, 16349650, "", "T");
        assert_eq!(insertion.to_string(), "22:16349651:-:T");

        let deletion = VariantRecord::new("1", 105, "T", "");
        assert_eq!(deletion.to_string(), "1:105:T:-");
        assert_eq!(deletion.end, 105);
    }

    #[test]
    fn length_of_symbolic_and_sequence_records() {
        let del = VariantRecord::with_end("1", 101, 200, "", "<DEL>");
        assert_eq!(del.length(), 100);

        let mnv = VariantRecord::new("1", 100, "CA", "TA");
        assert_eq!(mnv.variant_type, VariantType::Mnv);
        assert_eq!(mnv.length(), 2);

        let multi = VariantRecord::new("1", 100, "C", "T,CA");
        assert_eq!(multi.alternates, vec!["T", "CA"]);
        assert_eq!(multi.id(), "1:100:C:T,CA");
    }
}
