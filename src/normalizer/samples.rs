//! Per-sample rewriting: genotypes and allele-indexed arrays.

use crate::model::{SampleData, StudyEntry, GENOTYPE_FIELD};

use super::genotype::Genotype;
use super::genotype_index::{genotype_count, infer_ploidy, remap_genotype_indices};
use super::{AlleleLayout, FieldNumber, NormalizeError, NormalizerConfig};

/// Rewrite every sample of `study` into the allele space described by `layout`.
///
/// Genotype alleles are mapped through the layout (and sorted when allele
/// normalization is enabled). Fields declared allele-indexed are reordered;
/// everything else is copied verbatim.
pub fn rewrite_samples(
    study: &StudyEntry,
    layout: &AlleleLayout,
    config: &NormalizerConfig,
) -> Result<Vec<SampleData>, NormalizeError> {
    let genotype_idx = study.format_index(GENOTYPE_FIELD);

    study
        .samples
        .iter()
        .map(|sample| -> Result<SampleData, NormalizeError> {
            let genotype = match genotype_idx.and_then(|idx| sample.values.get(idx)) {
                Some(value) => Some(checked_genotype(sample, value, layout.original_allele_count())?),
                None => None,
            };
            let ploidy = genotype.as_ref().map(Genotype::ploidy);

            let mut values = Vec::with_capacity(sample.values.len());
            for (idx, value) in sample.values.iter().enumerate() {
                let field = study.format.get(idx).map(String::as_str).unwrap_or_default();
                let rewritten = if Some(idx) == genotype_idx {
                    let mapped = genotype
                        .as_ref()
                        .map(|gt| gt.map_alleles(|allele| layout.target_of(allele).unwrap_or(allele)));
                    match mapped {
                        Some(gt) if config.normalize_alleles => gt.sorted().to_string(),
                        Some(gt) => gt.to_string(),
                        None => value.clone(),
                    }
                } else {
                    match config.field_number(field) {
                        Some(number) => remap_array(value, number, ploidy, layout)
                            .map_err(|reason| NormalizeError::sample_field(&sample.id, field, value, reason))?,
                        None => value.clone(),
                    }
                };
                values.push(rewritten);
            }

            Ok(SampleData {
                id: sample.id.clone(),
                values,
            })
        })
        .collect()
}

/// Samples of a reference block derived from `study`.
///
/// Called alleles become `0` (missing ones, ploidy and separators are kept) and
/// allele-indexed arrays are blanked.
pub fn reference_block_samples(
    study: &StudyEntry,
    config: &NormalizerConfig,
) -> Result<Vec<SampleData>, NormalizeError> {
    study
        .samples
        .iter()
        .map(|sample| -> Result<SampleData, NormalizeError> {
            let values = sample
                .values
                .iter()
                .enumerate()
                .map(|(idx, value)| {
                    let field = study.format.get(idx).map(String::as_str).unwrap_or_default();
                    if field == GENOTYPE_FIELD {
                        let genotype = Genotype::parse(value).map_err(|err| {
                            NormalizeError::sample_field(&sample.id, field, value, err.to_string())
                        })?;
                        Ok(genotype.map_alleles(|_| 0).to_string())
                    } else if config.field_number(field).is_some() {
                        Ok(".".to_string())
                    } else {
                        Ok(value.clone())
                    }
                })
                .collect::<Result<Vec<_>, NormalizeError>>()?;
            Ok(SampleData {
                id: sample.id.clone(),
                values,
            })
        })
        .collect()
}

fn checked_genotype(
    sample: &SampleData,
    value: &str,
    allele_count: usize,
) -> Result<Genotype, NormalizeError> {
    let genotype = Genotype::parse(value)
        .map_err(|err| NormalizeError::sample_field(&sample.id, GENOTYPE_FIELD, value, err.to_string()))?;
    if let Some(max) = genotype.max_allele() {
        if max >= allele_count {
            return Err(NormalizeError::sample_field(
                &sample.id,
                GENOTYPE_FIELD,
                value,
                format!("allele {max} out of range for {allele_count} alleles"),
            ));
        }
    }
    Ok(genotype)
}

fn remap_array(
    value: &str,
    number: FieldNumber,
    ploidy: Option<usize>,
    layout: &AlleleLayout,
) -> Result<String, String> {
    if value == "." {
        return Ok(value.to_string());
    }
    let entries: Vec<&str> = value.split(',').collect();
    if let Some(bad) = entries
        .iter()
        .find(|entry| **entry != "." && entry.parse::<f64>().is_err())
    {
        return Err(format!("non-numeric entry '{bad}'"));
    }

    let allele_count = layout.original_allele_count();
    let target_to_original = layout.target_to_original();
    let picked: Vec<&str> = match number {
        FieldNumber::Genotypes => {
            let ploidy = ploidy
                .filter(|&p| genotype_count(allele_count, p) == entries.len())
                .or_else(|| infer_ploidy(allele_count, entries.len()))
                .ok_or_else(|| {
                    format!(
                        "{} entries match no ploidy over {allele_count} alleles",
                        entries.len()
                    )
                })?;
            remap_genotype_indices(ploidy, allele_count, target_to_original)
                .into_iter()
                .map(|idx| entries[idx])
                .collect()
        }
        FieldNumber::Alleles => {
            if entries.len() != allele_count {
                return Err(format!("expected {allele_count} entries, found {}", entries.len()));
            }
            target_to_original.iter().map(|&idx| entries[idx]).collect()
        }
        FieldNumber::Alternates => {
            if entries.len() + 1 != allele_count {
                return Err(format!(
                    "expected {} entries, found {}",
                    allele_count - 1,
                    entries.len()
                ));
            }
            target_to_original[1..]
                .iter()
                .map(|&idx| entries[idx - 1])
                .collect()
        }
    };
    Ok(picked.join(","))
}
