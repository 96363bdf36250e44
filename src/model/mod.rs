//! In-memory variant model consumed and produced by the normalizer.
//!
//! The shape mirrors a parsed VCF line: locus, reference, alternates and
//! per-study sample data. No file format is owned here.

mod record;
mod structural;
mod study;
mod variant_type;

pub use record::VariantRecord;
pub use structural::{AnchorSide, Breakend, MateJoin, StructuralInfo, StructuralType};
pub use study::{
    AlternateCoordinate, OriginalCall, SampleData, StudyEntry, GENOTYPE_FIELD, PHASE_SET_FIELD,
};
pub use variant_type::{
    is_breakend, is_no_variation, is_non_ref, is_symbolic, parse_copy_number_token, VariantType,
    NON_REF_LEGACY_TOKEN, NON_REF_TOKEN, NO_VARIATION_TOKEN, SV_LENGTH_THRESHOLD,
};
