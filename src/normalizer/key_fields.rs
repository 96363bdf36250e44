use std::fmt;

use crate::model::VariantType;

/// Minimal coordinates and alleles of one normalized event.
///
/// `end - start == reference.len() - 1`, so a pure insertion has
/// `start == end + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKeyFields {
    /// 1-based start.
    pub start: i64,
    /// 1-based inclusive end.
    pub end: i64,
    /// Index of the source alternate in the original record.
    pub allele_index: usize,
    /// Trimmed reference.
    pub reference: String,
    /// Trimmed alternate. Empty for deletions and reference blocks.
    pub alternate: String,
    /// Phase link shared by the fragments of one decomposed event.
    pub phase_set: Option<String>,
    /// Whether this is a no-variation filler.
    pub reference_block: bool,
}

impl VariantKeyFields {
    /// Event key fields.
    pub fn new(
        start: i64,
        end: i64,
        allele_index: usize,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            allele_index,
            reference: reference.into(),
            alternate: alternate.into(),
            phase_set: None,
            reference_block: false,
        }
    }

    /// Reference block spanning `[start, end]`; `base` is the first reference base.
    pub fn reference_block(start: i64, end: i64, base: impl Into<String>) -> Self {
        Self {
            start,
            end,
            allele_index: 0,
            reference: base.into(),
            alternate: String::new(),
            phase_set: None,
            reference_block: true,
        }
    }

    /// Attach a phase link.
    pub fn with_phase_set(mut self, phase_set: impl Into<String>) -> Self {
        self.phase_set = Some(phase_set.into());
        self
    }

    /// Whether this fragment covers no reference base.
    pub fn is_insertion(&self) -> bool {
        self.end < self.start
    }

    /// Type of the trimmed pair.
    pub fn variant_type(&self) -> VariantType {
        if self.reference_block {
            VariantType::NoVariation
        } else {
            VariantType::infer(&self.reference, &self.alternate)
        }
    }
}

impl fmt::Display for VariantKeyFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}:{}:{}",
            self.start, self.end, self.reference, self.alternate
        )
    }
}
