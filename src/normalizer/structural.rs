//! Normalization of symbolic and breakend alternates.
//!
//! Symbolic alleles keep their end; a single-base anchor reference is dropped
//! and the start moves past it. Confidence intervals are read from `CIPOS` and
//! `CIEND` relative to the original start and end. Copy-number tokens are
//! classified against a baseline copy number.

use tracing::debug;

use crate::model::{
    is_breakend, parse_copy_number_token, StructuralInfo, StructuralType, StudyEntry, VariantType,
};

use super::breakend::normalize_breakend;
use super::{ContigNaming, NormalizeError, VariantKeyFields};

const CIPOS: &str = "CIPOS";
const CIEND: &str = "CIEND";
const COPY_NUMBER: &str = "CN";
const INSERTED_SEQUENCE: &str = "SVINSSEQ";
const LEFT_INSERTED_SEQUENCE: &str = "LEFT_SVINSSEQ";
const RIGHT_INSERTED_SEQUENCE: &str = "RIGHT_SVINSSEQ";
const TANDEM_DUPLICATION: &str = "<DUP:TANDEM>";
const UNSPECIFIED_COPY_NUMBER: &str = "<CNV>";
const SYMBOLIC_INSERTION: &str = "<INS>";

/// Locus and attributes shared by every structural alternate of one record.
#[derive(Debug, Clone, Copy)]
pub struct StructuralContext<'a> {
    /// Contig of the record.
    pub chromosome: &'a str,
    /// Original start.
    pub start: i64,
    /// Original end.
    pub end: i64,
    /// Original reference allele.
    pub reference: &'a str,
    /// First study of the record, source of `CIPOS`, `CN` and friends.
    pub study: Option<&'a StudyEntry>,
    /// Neutral copy number.
    pub baseline_copy_number: u32,
    /// Mate contig convention.
    pub naming: &'a dyn ContigNaming,
}

/// One structural alternate on canonical coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralAllele {
    /// Coordinates and (possibly rewritten) alleles.
    pub key: VariantKeyFields,
    /// Type of the normalized alternate.
    pub variant_type: VariantType,
    /// Structural annotations.
    pub info: StructuralInfo,
}

impl StructuralContext<'_> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.study.and_then(|study| study.attribute(key))
    }

    fn confidence_interval(&self, key: &str, anchor: i64) -> Option<(i64, i64)> {
        let raw = self.attribute(key)?;
        let parsed = raw
            .split_once(',')
            .and_then(|(left, right)| Some((left.trim().parse::<i64>().ok()?, right.trim().parse::<i64>().ok()?)));
        match parsed {
            Some((left, right)) => Some((anchor + left, anchor + right)),
            None => {
                debug!(key, value = raw, "ignoring non-numeric confidence interval");
                None
            }
        }
    }

    /// Copy number of an unspecified `<CNV>`: the `CN` attribute, or the value
    /// every sample of the first study agrees on.
    fn declared_copy_number(&self) -> Option<u32> {
        if let Some(value) = self.attribute(COPY_NUMBER) {
            return value.parse().ok();
        }
        let study = self.study?;
        let idx = study.format_index(COPY_NUMBER)?;
        let mut agreed = None;
        for sample in &study.samples {
            let Some(value) = sample.values.get(idx).filter(|value| value.as_str() != ".") else {
                continue;
            };
            let copy_number: u32 = value.parse().ok()?;
            match agreed {
                None => agreed = Some(copy_number),
                Some(previous) if previous != copy_number => return None,
                Some(_) => {}
            }
        }
        agreed
    }

    fn classify(&self, copy_number: u32) -> Option<StructuralType> {
        match copy_number.cmp(&self.baseline_copy_number) {
            std::cmp::Ordering::Greater => Some(StructuralType::CopyNumberGain),
            std::cmp::Ordering::Less => Some(StructuralType::CopyNumberLoss),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn base_info(&self) -> StructuralInfo {
        let mut info = StructuralInfo::default();
        if let Some((left, right)) = self.confidence_interval(CIPOS, self.start) {
            info.ci_start_left = Some(left);
            info.ci_start_right = Some(right);
        }
        if let Some((left, right)) = self.confidence_interval(CIEND, self.end) {
            info.ci_end_left = Some(left);
            info.ci_end_right = Some(right);
        }
        info
    }
}

/// Normalize one symbolic or breakend alternate of a record.
pub fn normalize_structural(
    ctx: &StructuralContext<'_>,
    allele_index: usize,
    alternate: &str,
) -> Result<StructuralAllele, NormalizeError> {
    let mut info = ctx.base_info();

    if is_breakend(alternate) {
        let normalized = normalize_breakend(
            ctx.chromosome,
            ctx.start,
            ctx.end,
            ctx.reference,
            alternate,
            ctx.naming,
        )?;
        let alternate = normalized.alternate();
        info.inserted_sequence = normalized.inserted_sequence;
        info.breakend = Some(normalized.breakend);
        return Ok(StructuralAllele {
            key: VariantKeyFields::new(
                normalized.start,
                normalized.end,
                allele_index,
                normalized.reference,
                alternate,
            ),
            variant_type: VariantType::Breakend,
            info,
        });
    }

    let (start, reference) = if ctx.reference.len() == 1 {
        (ctx.start + 1, "")
    } else {
        (ctx.start, ctx.reference)
    };

    let mut alternate = alternate.to_string();
    if alternate == UNSPECIFIED_COPY_NUMBER {
        if let Some(copy_number) = ctx.declared_copy_number() {
            alternate = format!("<CN{copy_number}>");
        }
    }

    if let Some(copy_number) = parse_copy_number_token(&alternate) {
        info.copy_number = Some(copy_number);
        info.structural_type = ctx.classify(copy_number);
    } else if alternate == TANDEM_DUPLICATION {
        info.structural_type = Some(StructuralType::TandemDuplication);
    } else if alternate == SYMBOLIC_INSERTION {
        if let Some(sequence) = ctx.attribute(INSERTED_SEQUENCE) {
            alternate = sequence.to_string();
        }
        info.left_inserted_sequence = ctx.attribute(LEFT_INSERTED_SEQUENCE).map(str::to_string);
        info.right_inserted_sequence = ctx.attribute(RIGHT_INSERTED_SEQUENCE).map(str::to_string);
    }

    let variant_type = match VariantType::infer(reference, &alternate) {
        // A resolved insertion sequence is still an insertion, whatever its length.
        VariantType::Indel if reference.is_empty() => VariantType::Insertion,
        other => other,
    };

    Ok(StructuralAllele {
        key: VariantKeyFields::new(start, ctx.end, allele_index, reference, alternate),
        variant_type,
        info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::PrefixAliasNaming;

    fn context<'a>(
        study: Option<&'a StudyEntry>,
        reference: &'a str,
        naming: &'a PrefixAliasNaming,
    ) -> StructuralContext<'a> {
        StructuralContext {
            chromosome: "1",
            start: 100,
            end: 200,
            reference,
            study,
            baseline_copy_number: 2,
            naming,
        }
    }

    #[test]
    fn copy_number_loss_with_intervals() {
        let naming = PrefixAliasNaming::default();
        let study = StudyEntry::new("s", ["GT"])
            .with_attribute("CIPOS", "-14,50")
            .with_attribute("CIEND", "-50,11");
        let ctx = context(Some(&study), "C", &naming);
        let allele = normalize_structural(&ctx, 0, "<CN0>").unwrap();

        assert_eq!(allele.key.start, 101);
        assert_eq!(allele.key.end, 200);
        assert_eq!(allele.key.reference, "");
        assert_eq!(allele.key.alternate, "<CN0>");
        assert_eq!(allele.variant_type, VariantType::Cnv);
        assert_eq!(allele.info.ci_start_left, Some(86));
        assert_eq!(allele.info.ci_start_right, Some(150));
        assert_eq!(allele.info.ci_end_left, Some(150));
        assert_eq!(allele.info.ci_end_right, Some(211));
        assert_eq!(allele.info.copy_number, Some(0));
        assert_eq!(allele.info.structural_type, Some(StructuralType::CopyNumberLoss));
    }

    #[test]
    fn baseline_copy_number_is_neutral() {
        let naming = PrefixAliasNaming::default();
        let ctx = context(None, "C", &naming);
        let neutral = normalize_structural(&ctx, 1, "<CN2>").unwrap();
        assert_eq!(neutral.info.structural_type, None);
        let gain = normalize_structural(&ctx, 2, "<CN3>").unwrap();
        assert_eq!(gain.info.structural_type, Some(StructuralType::CopyNumberGain));
    }

    #[test]
    fn unspecified_copy_number_resolved_from_samples() {
        let naming = PrefixAliasNaming::default();
        let agreeing = StudyEntry::new("s", ["GT", "CN"]).with_sample("S1", ["0|1", "3"]);
        let ctx = context(Some(&agreeing), "C", &naming);
        let allele = normalize_structural(&ctx, 0, "<CNV>").unwrap();
        assert_eq!(allele.key.alternate, "<CN3>");
        assert_eq!(allele.info.copy_number, Some(3));

        let disagreeing = agreeing.clone().with_sample("S2", ["0|1", "4"]);
        let ctx = context(Some(&disagreeing), "C", &naming);
        let allele = normalize_structural(&ctx, 0, "<CNV>").unwrap();
        assert_eq!(allele.key.alternate, "<CNV>");
        assert_eq!(allele.info.copy_number, None);
    }

    #[test]
    fn symbolic_insertion_takes_sequence() {
        let naming = PrefixAliasNaming::default();
        let study = StudyEntry::new("s", ["GT"])
            .with_attribute("SVINSSEQ", "ACGTACGT")
            .with_attribute("LEFT_SVINSSEQ", "ACG");
        let ctx = StructuralContext {
            end: 100,
            ..context(Some(&study), "N", &naming)
        };
        let allele = normalize_structural(&ctx, 0, "<INS>").unwrap();
        assert_eq!((allele.key.start, allele.key.end), (101, 100));
        assert_eq!(allele.key.alternate, "ACGTACGT");
        assert_eq!(allele.variant_type, VariantType::Insertion);
        assert_eq!(allele.info.left_inserted_sequence.as_deref(), Some("ACG"));
    }

    #[test]
    fn malformed_interval_is_ignored() {
        let naming = PrefixAliasNaming::default();
        let study = StudyEntry::new("s", ["GT"]).with_attribute("CIPOS", "x,10");
        let ctx = context(Some(&study), "N", &naming);
        let allele = normalize_structural(&ctx, 0, "<DEL>").unwrap();
        assert_eq!(allele.info, StructuralInfo::default());
        assert_eq!(allele.variant_type, VariantType::Deletion);
    }

    #[test]
    fn tandem_duplication() {
        let naming = PrefixAliasNaming::default();
        let ctx = context(None, "N", &naming);
        let allele = normalize_structural(&ctx, 0, "<DUP:TANDEM>").unwrap();
        assert_eq!(allele.info.structural_type, Some(StructuralType::TandemDuplication));
        assert_eq!(allele.variant_type, VariantType::Duplication);
    }
}
