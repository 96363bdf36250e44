use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::VariantType;

/// Genotype format field.
pub const GENOTYPE_FIELD: &str = "GT";
/// Phase-set format field linking fragments of one decomposed event.
pub const PHASE_SET_FIELD: &str = "PS";

/// Per-sample values, ordered like the study's format list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleData {
    /// Sample identifier.
    pub id: String,
    /// One value per format field.
    pub values: Vec<String>,
}

/// An alternate allele of the original call kept as context on a split record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlternateCoordinate {
    /// Contig name.
    pub chromosome: String,
    /// Start after trimming against the shared reference.
    pub start: i64,
    /// End after trimming against the shared reference.
    pub end: i64,
    /// Trimmed reference allele.
    pub reference: String,
    /// Trimmed alternate allele.
    pub alternate: String,
    /// Type of the trimmed pair.
    pub variant_type: VariantType,
}

/// The input call a normalized record was derived from.
///
/// Rendered as `start:reference:alt1,alt2:allele_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OriginalCall {
    /// Original start.
    pub start: i64,
    /// Original reference allele.
    pub reference: String,
    /// Original alternate alleles, as written.
    pub alternates: Vec<String>,
    /// Zero-based index of the alternate this record represents.
    pub allele_index: usize,
}

impl fmt::Display for OriginalCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.start,
            self.reference,
            self.alternates.join(","),
            self.allele_index
        )
    }
}

/// Study-level data attached to a variant: format, samples and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StudyEntry {
    /// Study identifier.
    pub study_id: String,
    /// Ordered format field names.
    pub format: Vec<String>,
    /// Samples in input order.
    pub samples: Vec<SampleData>,
    /// Other alleles of the original call.
    pub secondary_alternates: Vec<AlternateCoordinate>,
    /// Free-form per-file attributes (INFO-style).
    pub file_attributes: BTreeMap<String, String>,
    /// Original call, present when normalization changed the record.
    pub call: Option<OriginalCall>,
}

impl StudyEntry {
    /// Create an empty study with the given format.
    pub fn new<S: Into<String>>(study_id: impl Into<String>, format: impl IntoIterator<Item = S>) -> Self {
        Self {
            study_id: study_id.into(),
            format: format.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Append a sample. Values follow the format order.
    pub fn with_sample<S: Into<String>>(
        mut self,
        id: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.samples.push(SampleData {
            id: id.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Set a file attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.file_attributes.insert(key.into(), value.into());
        self
    }

    /// Position of a field in the format list.
    pub fn format_index(&self, field: &str) -> Option<usize> {
        self.format.iter().position(|name| name == field)
    }

    /// Value of `field` for `sample`.
    pub fn sample_value(&self, sample: &str, field: &str) -> Option<&str> {
        let idx = self.format_index(field)?;
        self.samples
            .iter()
            .find(|data| data.id == sample)
            .and_then(|data| data.values.get(idx))
            .map(String::as_str)
    }

    /// Attribute lookup.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.file_attributes.get(key).map(String::as_str)
    }

    /// Set `field` to `value` on every sample, appending it to the format list if absent.
    pub fn set_field_for_all_samples(&mut self, field: &str, value: &str) {
        let idx = match self.format_index(field) {
            Some(idx) => idx,
            None => {
                self.format.push(field.to_string());
                self.format.len() - 1
            }
        };
        for sample in &mut self.samples {
            if sample.values.len() <= idx {
                sample.values.resize(idx + 1, ".".to_string());
            }
            sample.values[idx] = value.to_string();
        }
    }

    /// Drop `field` from the format list and every sample.
    pub fn remove_field(&mut self, field: &str) {
        if let Some(idx) = self.format_index(field) {
            self.format.remove(idx);
            for sample in &mut self.samples {
                if idx < sample.values.len() {
                    sample.values.remove(idx);
                }
            }
        }
    }
}
