//! Multi-allelic splitting: one normalized event per alternate allele.

use crate::model::{
    is_breakend, is_no_variation, is_symbolic, AlternateCoordinate, StructuralInfo, VariantRecord,
    VariantType, NON_REF_TOKEN,
};

use super::structural::{normalize_structural, StructuralContext};
use super::trimmer::trim;
use super::{ContigNaming, NormalizeError, VariantKeyFields};

/// What an alternate allele turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlleleKind {
    /// Plain sequence, trimmed against the reference.
    Sequence,
    /// Symbolic or breakend allele.
    Structural(StructuralInfo),
    /// `<*>`, `<NON_REF>` or `.`; never emitted on its own.
    Placeholder,
    /// Identical to the reference; never emitted.
    ReferenceCopy,
}

/// One alternate of the input record after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAllele {
    /// Zero-based alternate index in the input record.
    pub allele_index: usize,
    /// Alternate as written in the input.
    pub original: String,
    /// Normalized event, absent for placeholders and reference copies.
    pub key: Option<VariantKeyFields>,
    /// Type of the normalized event.
    pub variant_type: VariantType,
    /// Classification.
    pub kind: AlleleKind,
}

impl SplitAllele {
    /// Whether this allele yields its own output record.
    pub fn is_emittable(&self) -> bool {
        self.key.is_some()
    }

    /// Whether this allele is symbolic or a breakend.
    pub fn is_structural(&self) -> bool {
        matches!(self.kind, AlleleKind::Structural(_))
    }

    /// Identity of the normalized event used to collapse duplicate alternates.
    pub fn slot_key(&self) -> String {
        match (&self.kind, &self.key) {
            (AlleleKind::Placeholder, _) => NON_REF_TOKEN.to_string(),
            (AlleleKind::ReferenceCopy, _) | (_, None) => "=".to_string(),
            (_, Some(key)) => format!("{}:{}:{}:{}", key.start, key.end, key.reference, key.alternate),
        }
    }

    /// Context entry describing this allele on a sibling record.
    pub fn coordinate(&self, record: &VariantRecord) -> AlternateCoordinate {
        match &self.key {
            Some(key) => AlternateCoordinate {
                chromosome: record.chromosome.clone(),
                start: key.start,
                end: key.end,
                reference: key.reference.clone(),
                alternate: key.alternate.clone(),
                variant_type: self.variant_type,
            },
            None => AlternateCoordinate {
                chromosome: record.chromosome.clone(),
                start: record.start,
                end: record.end,
                reference: record.reference.clone(),
                alternate: match self.kind {
                    AlleleKind::Placeholder => NON_REF_TOKEN.to_string(),
                    _ => self.original.clone(),
                },
                variant_type: VariantType::NoVariation,
            },
        }
    }
}

/// Splits records into per-alternate events.
#[derive(Debug, Clone, Copy)]
pub struct AlleleSplitter<'a> {
    naming: &'a dyn ContigNaming,
    baseline_copy_number: u32,
}

impl<'a> AlleleSplitter<'a> {
    /// Splitter using `naming` for breakend mates.
    pub fn new(naming: &'a dyn ContigNaming, baseline_copy_number: u32) -> Self {
        Self {
            naming,
            baseline_copy_number,
        }
    }

    /// Normalize every alternate of `record`, in input order.
    pub fn split(&self, record: &VariantRecord) -> Result<Vec<SplitAllele>, NormalizeError> {
        let ctx = StructuralContext {
            chromosome: &record.chromosome,
            start: record.start,
            end: record.end,
            reference: &record.reference,
            study: record.study(),
            baseline_copy_number: self.baseline_copy_number,
            naming: self.naming,
        };

        record
            .alternates
            .iter()
            .enumerate()
            .map(|(allele_index, alternate)| {
                let original = alternate.clone();
                if is_no_variation(alternate) {
                    return Ok(SplitAllele {
                        allele_index,
                        original,
                        key: None,
                        variant_type: VariantType::NoVariation,
                        kind: AlleleKind::Placeholder,
                    });
                }
                if is_symbolic(alternate) || is_breakend(alternate) {
                    let allele = normalize_structural(&ctx, allele_index, alternate)?;
                    return Ok(SplitAllele {
                        allele_index,
                        original,
                        key: Some(allele.key),
                        variant_type: allele.variant_type,
                        kind: AlleleKind::Structural(allele.info),
                    });
                }
                Ok(match trim(&record.reference, alternate) {
                    Some(trimmed) => {
                        let key = trimmed.key_fields(record.start, allele_index);
                        SplitAllele {
                            allele_index,
                            original,
                            variant_type: key.variant_type(),
                            key: Some(key),
                            kind: AlleleKind::Sequence,
                        }
                    }
                    None => SplitAllele {
                        allele_index,
                        original,
                        key: None,
                        variant_type: VariantType::NoVariation,
                        kind: AlleleKind::ReferenceCopy,
                    },
                })
            })
            .collect()
    }
}
