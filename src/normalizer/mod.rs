//! Variant normalization pipeline.
//!
//! Every input record is split into one record per distinct alternate, each
//! trimmed to its minimal representation. Sample genotypes and
//! allele-indexed arrays are rewritten into the allele space of the split
//! record. Optionally MNVs are decomposed into phased fragments and the
//! uncovered part of the original reference span is filled with reference
//! blocks.
//!
//! ```
//! use varnorm::model::VariantRecord;
//! use varnorm::normalizer::{NormalizerConfig, VariantNormalizer};
//!
//! let normalizer = VariantNormalizer::new(NormalizerConfig::default());
//! let records = normalizer
//!     .normalize_record(&VariantRecord::new("1", 100, "GT", "G,GTT"))
//!     .unwrap();
//! assert_eq!(records.len(), 2);
//! ```

mod breakend;
mod config;
mod contig;
mod genotype;
pub mod genotype_index;
mod key_fields;
mod layout;
mod mnv;
mod reference_blocks;
mod samples;
mod splitter;
mod structural;
mod trimmer;

use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{
    is_no_variation, is_non_ref, OriginalCall, StudyEntry, VariantRecord, VariantType,
    NON_REF_TOKEN, NO_VARIATION_TOKEN, PHASE_SET_FIELD,
};

pub use breakend::{normalize_breakend, parse_breakend, NormalizedBreakend};
pub use config::{FieldNumber, NormalizerConfig, DEFAULT_BASELINE_COPY_NUMBER};
pub use contig::{ContigNaming, PrefixAliasNaming, VerbatimNaming};
pub use genotype::{Genotype, GenotypeParseError, Separator};
pub use key_fields::VariantKeyFields;
pub use layout::AlleleLayout;
pub use mnv::{decompose, is_decomposable};
pub use reference_blocks::reference_blocks;
pub use samples::{reference_block_samples, rewrite_samples};
pub use splitter::{AlleleKind, AlleleSplitter, SplitAllele};
pub use structural::{normalize_structural, StructuralAllele, StructuralContext};
pub use trimmer::{index_of_difference, reverse_index_of_difference, trim, TrimmedAlleles};

/// Errors raised while normalizing a single record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A sample value cannot be interpreted against the record's alleles.
    #[error("sample {sample}: invalid {field} value '{value}': {reason}")]
    NonStandardCompliantSampleField {
        /// Sample identifier.
        sample: String,
        /// Format field name.
        field: String,
        /// Offending value.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Breakend notation that cannot be parsed unambiguously.
    #[error("invalid breakend '{alternate}': {reason}")]
    InvalidBreakend {
        /// Alternate allele as written.
        alternate: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Record-level inconsistency.
    #[error("invalid record: {reason}")]
    InvalidRecord {
        /// What is wrong with it.
        reason: String,
    },
}

impl NormalizeError {
    pub(crate) fn sample_field(
        sample: &str,
        field: &str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        NormalizeError::NonStandardCompliantSampleField {
            sample: sample.to_string(),
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// A record that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Position of the record in the input batch.
    pub index: usize,
    /// `chrom:pos:ref:alts` of the input record.
    pub record_id: String,
    /// Cause.
    pub error: NormalizeError,
}

/// Result of normalizing a batch: emitted records plus per-record failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Normalized records, grouped by input record in input order.
    pub records: Vec<VariantRecord>,
    /// Records that failed; they contribute nothing to `records`.
    pub failures: Vec<RecordFailure>,
}

impl BatchOutcome {
    fn absorb(
        &mut self,
        index: usize,
        record: &VariantRecord,
        result: Result<Vec<VariantRecord>, NormalizeError>,
    ) {
        match result {
            Ok(records) => self.records.extend(records),
            Err(error) => {
                let record_id = record.id();
                warn!(index, record = %record_id, %error, "record failed normalization");
                self.failures.push(RecordFailure {
                    index,
                    record_id,
                    error,
                });
            }
        }
    }

    /// Whether every record was normalized.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Stateless normalizer parameterized by its configuration.
#[derive(Debug, Clone)]
pub struct VariantNormalizer {
    config: NormalizerConfig,
    naming: Arc<dyn ContigNaming>,
}

impl Default for VariantNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl VariantNormalizer {
    /// Normalizer using the `chr` alias convention for breakend mates.
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            naming: Arc::new(PrefixAliasNaming::default()),
        }
    }

    /// Replace the contig naming convention.
    pub fn with_contig_naming(mut self, naming: impl ContigNaming + 'static) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a batch sequentially.
    pub fn normalize(&self, records: &[VariantRecord]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (index, record) in records.iter().enumerate() {
            outcome.absorb(index, record, self.normalize_record(record));
        }
        outcome
    }

    /// Normalize a batch on the rayon pool; output order matches `normalize`.
    pub fn normalize_par(&self, records: &[VariantRecord]) -> BatchOutcome {
        let results: Vec<_> = records
            .par_iter()
            .map(|record| self.normalize_record(record))
            .collect();

        let mut outcome = BatchOutcome::default();
        for (index, (record, result)) in records.iter().zip(results).enumerate() {
            outcome.absorb(index, record, result);
        }
        outcome
    }

    /// Normalize one record into its fragments, sorted by start.
    pub fn normalize_record(&self, record: &VariantRecord) -> Result<Vec<VariantRecord>, NormalizeError> {
        if record.alternates.is_empty() {
            return Err(NormalizeError::InvalidRecord {
                reason: "no alternate alleles".to_string(),
            });
        }
        if record.alternates.iter().all(|alternate| is_no_variation(alternate)) {
            return Ok(vec![canonical_no_variation(record)]);
        }

        let splitter = AlleleSplitter::new(self.naming.as_ref(), self.config.baseline_copy_number);
        let alleles = splitter.split(record)?;
        let slot_keys: Vec<String> = alleles.iter().map(SplitAllele::slot_key).collect();

        let mut emitted: Vec<&SplitAllele> = Vec::new();
        for allele in alleles.iter().filter(|allele| allele.is_emittable()) {
            if emitted
                .iter()
                .any(|kept| slot_keys[kept.allele_index] == slot_keys[allele.allele_index])
            {
                debug!(record = %record, allele = %allele.original, "duplicate alternate collapsed");
                continue;
            }
            emitted.push(allele);
        }
        if emitted.is_empty() {
            debug!(record = %record, "no alternate differs from the reference");
            return Ok(vec![record.clone()]);
        }

        let multi_allelic = record.alternates.len() > 1;
        // Fragments of an earlier split keep genotypes indexed over their secondary alternates.
        let carries_secondaries = record
            .studies
            .iter()
            .any(|study| !study.secondary_alternates.is_empty());
        let mut output = Vec::with_capacity(emitted.len());
        let mut covered = Vec::with_capacity(emitted.len());

        for allele in &emitted {
            let Some(key) = allele.key.as_ref() else {
                continue;
            };
            let changed = multi_allelic
                || key.start != record.start
                || key.end != record.end
                || key.reference != record.reference
                || key.alternate != allele.original;

            let studies = record
                .studies
                .iter()
                .map(|study| self.split_study(record, study, &alleles, &slot_keys, allele.allele_index, changed))
                .collect::<Result<Vec<_>, _>>()?;

            let structural = match &allele.kind {
                AlleleKind::Structural(info) if !changed => {
                    Some(record.structural.clone().unwrap_or_else(|| info.clone()))
                }
                AlleleKind::Structural(info) => Some(info.clone()),
                _ => None,
            };

            let split = VariantRecord {
                chromosome: record.chromosome.clone(),
                start: key.start,
                end: key.end,
                reference: key.reference.clone(),
                alternates: vec![key.alternate.clone()],
                variant_type: allele.variant_type,
                structural,
                studies,
            };

            if self.config.decompose_mnvs
                && !multi_allelic
                && !carries_secondaries
                && allele.kind == AlleleKind::Sequence
            {
                let fragments = decompose(key, &record.id(), self.config.generate_reference_blocks);
                if fragments.len() > 1 {
                    debug!(record = %record, fragments = fragments.len(), "decomposed MNV");
                    for fragment in &fragments {
                        output.push(self.fragment_record(record, &split, fragment)?);
                    }
                    covered.extend(fragments);
                    continue;
                }
            }

            covered.push(key.clone());
            output.push(split);
        }

        if self.config.generate_reference_blocks && !emitted.iter().any(|allele| allele.is_structural()) {
            for block in reference_blocks(record.start, record.end, &record.reference, &covered) {
                output.push(self.reference_block_record(record, &block)?);
            }
        }

        output.sort_by_key(|fragment| fragment.start);
        debug!(record = %record, emitted = output.len(), "normalized record");
        Ok(output)
    }

    fn split_study(
        &self,
        record: &VariantRecord,
        study: &StudyEntry,
        alleles: &[SplitAllele],
        slot_keys: &[String],
        primary: usize,
        changed: bool,
    ) -> Result<StudyEntry, NormalizeError> {
        // Secondary alternates already carried by the input stay behind the record's own alternates.
        let mut keys = slot_keys.to_vec();
        keys.extend((0..study.secondary_alternates.len()).map(|idx| format!("secondary:{idx}")));
        let layout = AlleleLayout::for_primary(primary, &keys);

        let samples = rewrite_samples(study, &layout, &self.config)?;
        let secondary_alternates = layout
            .secondary_alternates()
            .filter_map(|alt| match alleles.get(alt) {
                Some(allele) => Some(allele.coordinate(record)),
                None => study.secondary_alternates.get(alt - alleles.len()).cloned(),
            })
            .collect();

        let call = study
            .call
            .clone()
            .or_else(|| changed.then(|| original_call(record, primary)));

        Ok(StudyEntry {
            study_id: study.study_id.clone(),
            format: study.format.clone(),
            samples,
            secondary_alternates,
            file_attributes: study.file_attributes.clone(),
            call,
        })
    }

    fn fragment_record(
        &self,
        record: &VariantRecord,
        split: &VariantRecord,
        fragment: &VariantKeyFields,
    ) -> Result<VariantRecord, NormalizeError> {
        if fragment.reference_block {
            return self.reference_block_record(record, fragment);
        }

        let allele_index = fragment.allele_index;
        let studies = split
            .studies
            .iter()
            .map(|study| {
                let mut study = study.clone();
                if let Some(phase_set) = &fragment.phase_set {
                    study.set_field_for_all_samples(PHASE_SET_FIELD, phase_set);
                }
                study.secondary_alternates.clear();
                study.call.get_or_insert_with(|| original_call(record, allele_index));
                study
            })
            .collect();

        Ok(VariantRecord {
            chromosome: record.chromosome.clone(),
            start: fragment.start,
            end: fragment.end,
            reference: fragment.reference.clone(),
            alternates: vec![fragment.alternate.clone()],
            variant_type: fragment.variant_type(),
            structural: None,
            studies,
        })
    }

    fn reference_block_record(
        &self,
        record: &VariantRecord,
        block: &VariantKeyFields,
    ) -> Result<VariantRecord, NormalizeError> {
        let studies = record
            .studies
            .iter()
            .map(|study| -> Result<StudyEntry, NormalizeError> {
                let mut entry = StudyEntry {
                    study_id: study.study_id.clone(),
                    format: study.format.clone(),
                    samples: reference_block_samples(study, &self.config)?,
                    secondary_alternates: Vec::new(),
                    file_attributes: study.file_attributes.clone(),
                    call: Some(original_call(record, 0)),
                };
                entry.remove_field(PHASE_SET_FIELD);
                Ok(entry)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VariantRecord {
            chromosome: record.chromosome.clone(),
            start: block.start,
            end: block.end,
            reference: block.reference.clone(),
            alternates: vec![NO_VARIATION_TOKEN.to_string()],
            variant_type: VariantType::NoVariation,
            structural: None,
            studies,
        })
    }
}

fn original_call(record: &VariantRecord, allele_index: usize) -> OriginalCall {
    OriginalCall {
        start: record.start,
        reference: record.reference.clone(),
        alternates: record.alternates.clone(),
        allele_index,
    }
}

fn canonical_no_variation(record: &VariantRecord) -> VariantRecord {
    let mut out = record.clone();
    for alternate in &mut out.alternates {
        if is_non_ref(alternate) {
            *alternate = NON_REF_TOKEN.to_string();
        }
    }
    out.variant_type = VariantType::NoVariation;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genotyped(record: VariantRecord, genotypes: &[(&str, &str)]) -> VariantRecord {
        let study = genotypes
            .iter()
            .fold(StudyEntry::new("s", ["GT"]), |study, (id, gt)| study.with_sample(*id, [*gt]));
        record.with_study(study)
    }

    #[test]
    fn empty_alternate_list_is_rejected() {
        let mut record = VariantRecord::new("1", 100, "A", "C");
        record.alternates.clear();
        let err = VariantNormalizer::default().normalize_record(&record).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidRecord { .. }));
    }

    #[test]
    fn minimal_biallelic_record_is_untouched() {
        let record = genotyped(VariantRecord::new("1", 100, "A", "T"), &[("S1", "0/1")]);
        let out = VariantNormalizer::default().normalize_record(&record).unwrap();
        assert_eq!(out, vec![record]);
    }

    #[test]
    fn duplicate_alternates_collapse() {
        let record = genotyped(VariantRecord::new("1", 100, "AC", "A,AC,A"), &[("S1", "1/3")]);
        let out = VariantNormalizer::default().normalize_record(&record).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].studies[0].sample_value("S1", "GT"), Some("1/1"));
    }

    #[test]
    fn batch_reports_failures_in_order() {
        let records = vec![
            VariantRecord::new("1", 100, "A", "T"),
            VariantRecord::new("1", 200, "A", "A]chr9:10["),
            VariantRecord::new("1", 300, "A", "G,C"),
        ];
        let normalizer = VariantNormalizer::default();
        let sequential = normalizer.normalize(&records);
        assert_eq!(sequential.records.len(), 3);
        assert_eq!(sequential.failures.len(), 1);
        assert_eq!(sequential.failures[0].index, 1);
        assert_eq!(sequential.failures[0].record_id, "1:200:A:A]chr9:10[");
        assert_eq!(normalizer.normalize_par(&records), sequential);
    }
}
