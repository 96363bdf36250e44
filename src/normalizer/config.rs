use std::collections::BTreeMap;

/// Copy number of a diploid reference; `<CNn>` above it is a gain, below a loss.
pub const DEFAULT_BASELINE_COPY_NUMBER: u32 = 2;

/// How a per-sample array field is indexed by alleles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldNumber {
    /// One value per unordered genotype (`Number=G`, e.g. `GL`, `PL`).
    Genotypes,
    /// One value per allele including the reference (`Number=R`, e.g. `AD`).
    Alleles,
    /// One value per alternate allele (`Number=A`).
    Alternates,
}

/// Options fixed before normalization and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Fill uncovered reference spans with no-variation records.
    pub generate_reference_blocks: bool,
    /// Split MNVs and complex substitutions into phased fragments.
    pub decompose_mnvs: bool,
    /// Sort allele indices of unphased genotypes after rewriting.
    pub normalize_alleles: bool,
    /// Copy number considered neutral when classifying `<CNn>` alleles.
    pub baseline_copy_number: u32,
    /// Per-sample fields that must be re-indexed when alleles are split.
    pub allele_indexed_fields: BTreeMap<String, FieldNumber>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        let allele_indexed_fields = [
            ("GL", FieldNumber::Genotypes),
            ("PL", FieldNumber::Genotypes),
            ("GP", FieldNumber::Genotypes),
            ("AD", FieldNumber::Alleles),
        ]
        .into_iter()
        .map(|(name, number)| (name.to_string(), number))
        .collect();

        Self {
            generate_reference_blocks: false,
            decompose_mnvs: false,
            normalize_alleles: false,
            baseline_copy_number: DEFAULT_BASELINE_COPY_NUMBER,
            allele_indexed_fields,
        }
    }
}

impl NormalizerConfig {
    /// Enable or disable reference-block generation.
    pub fn with_reference_blocks(mut self, enabled: bool) -> Self {
        self.generate_reference_blocks = enabled;
        self
    }

    /// Enable or disable MNV decomposition.
    pub fn with_mnv_decomposition(mut self, enabled: bool) -> Self {
        self.decompose_mnvs = enabled;
        self
    }

    /// Enable or disable genotype allele sorting.
    pub fn with_allele_normalization(mut self, enabled: bool) -> Self {
        self.normalize_alleles = enabled;
        self
    }

    /// Override the neutral copy number.
    pub fn with_baseline_copy_number(mut self, copy_number: u32) -> Self {
        self.baseline_copy_number = copy_number;
        self
    }

    /// Declare (or redeclare) an allele-indexed sample field.
    pub fn with_allele_indexed_field(mut self, name: impl Into<String>, number: FieldNumber) -> Self {
        self.allele_indexed_fields.insert(name.into(), number);
        self
    }

    /// Cardinality of a sample field, if it is allele-indexed.
    pub fn field_number(&self, name: &str) -> Option<FieldNumber> {
        self.allele_indexed_fields.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_likelihood_fields() {
        let config = NormalizerConfig::default();
        assert_eq!(config.field_number("PL"), Some(FieldNumber::Genotypes));
        assert_eq!(config.field_number("AD"), Some(FieldNumber::Alleles));
        assert_eq!(config.field_number("DP"), None);
        assert!(!config.generate_reference_blocks);
    }

    #[test]
    fn builder_overrides() {
        let config = NormalizerConfig::default()
            .with_reference_blocks(true)
            .with_mnv_decomposition(true)
            .with_allele_indexed_field("AF", FieldNumber::Alternates);
        assert!(config.generate_reference_blocks);
        assert!(config.decompose_mnvs);
        assert_eq!(config.field_number("AF"), Some(FieldNumber::Alternates));
    }
}
