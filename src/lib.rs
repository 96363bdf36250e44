//! # Variant normalization
//!
//! Rewrites variant calls into a canonical, minimal representation so that
//! the same biological event always gets the same coordinates and alleles.
//!
//! ## Pipeline
//!
//! 1. **Trimming**: strip the bases shared by reference and alternate
//! 2. **Splitting**: one record per distinct alternate of a multi-allelic call
//! 3. **Genotype rewriting**: `GT`, `GL`/`PL`/`GP` and `AD` follow the new allele order
//! 4. **Structural normalization**: symbolic alleles, copy numbers and breakends
//! 5. **Optional**: MNV decomposition and reference blocks over uncovered spans
//!
//! ## Usage Example
//!
//! ```
//! use varnorm::{NormalizerConfig, StudyEntry, VariantNormalizer, VariantRecord};
//!
//! let record = VariantRecord::new("1", 100, "A", "T,C")
//!     .with_study(StudyEntry::new("study", ["GT"]).with_sample("S1", ["1/2"]));
//!
//! let normalizer = VariantNormalizer::new(NormalizerConfig::default());
//! let split = normalizer.normalize_record(&record).unwrap();
//!
//! assert_eq!(split.len(), 2);
//! assert_eq!(split[1].alternate(), "C");
//! assert_eq!(split[1].studies[0].sample_value("S1", "GT"), Some("2/1"));
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod model; // Records, studies and structural annotations
pub mod normalizer; // Trimming, splitting, genotype and structural rewriting
pub mod vcf; // Tab-separated text codec

pub use model::{StudyEntry, VariantRecord, VariantType};
pub use normalizer::{
    BatchOutcome, NormalizeError, NormalizerConfig, RecordFailure, VariantKeyFields,
    VariantNormalizer,
};
