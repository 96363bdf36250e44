//! Decomposition of MNVs and complex substitutions into phased fragments.
//!
//! Equal-length alleles are compared column by column. Unequal alleles are
//! globally aligned first so that indels land in a single place. Consecutive
//! differing columns form one fragment; identical runs between two fragments
//! become reference blocks when requested.

use bio::alignment::pairwise::{Aligner, Scoring};
use bio::alignment::AlignmentOperation;

use super::trimmer::trim;
use super::VariantKeyFields;

const MATCH_SCORE: i32 = 1;
const MISMATCH_SCORE: i32 = -1;
const GAP_OPEN: i32 = -5;
const GAP_EXTEND: i32 = -1;

/// One alignment column: reference base and alternate base, `None` for a gap.
type Column = (Option<u8>, Option<u8>);

/// Whether `key` is a candidate for decomposition.
pub fn is_decomposable(key: &VariantKeyFields) -> bool {
    !key.reference_block
        && !key.reference.is_empty()
        && !key.alternate.is_empty()
        && key.reference.len().max(key.alternate.len()) > 1
}

/// Split `key` into its elementary fragments, left to right.
///
/// Variant fragments carry `phase_set`. When fewer than two variant fragments
/// result, `key` is returned unchanged.
pub fn decompose(key: &VariantKeyFields, phase_set: &str, with_reference_blocks: bool) -> Vec<VariantKeyFields> {
    if !is_decomposable(key) {
        return vec![key.clone()];
    }

    let reference = key.reference.as_bytes();
    let alternate = key.alternate.as_bytes();
    let columns: Vec<Column> = if reference.len() == alternate.len() {
        reference
            .iter()
            .zip(alternate)
            .map(|(&r, &a)| (Some(r), Some(a)))
            .collect()
    } else {
        aligned_columns(reference, alternate)
    };

    let mut fragments = Vec::new();
    let mut variants = 0;
    let mut offset = 0i64;
    let mut pending_block: Option<VariantKeyFields> = None;

    for run in columns.chunk_by(|a, b| differs(a) == differs(b)) {
        let run_reference: Vec<u8> = run.iter().filter_map(|(r, _)| *r).collect();
        let run_alternate: Vec<u8> = run.iter().filter_map(|(_, a)| *a).collect();
        let start = key.start + offset;

        if differs(&run[0]) {
            let reference = String::from_utf8_lossy(&run_reference);
            let alternate = String::from_utf8_lossy(&run_alternate);
            if let Some(trimmed) = trim(&reference, &alternate) {
                if variants > 0 {
                    fragments.extend(pending_block.take());
                }
                pending_block = None;
                fragments.push(
                    trimmed
                        .key_fields(start, key.allele_index)
                        .with_phase_set(phase_set),
                );
                variants += 1;
            }
        } else if with_reference_blocks && variants > 0 && !run_reference.is_empty() {
            let base = String::from_utf8_lossy(&run_reference[..1]).into_owned();
            pending_block = Some(VariantKeyFields::reference_block(
                start,
                start + run_reference.len() as i64 - 1,
                base,
            ));
        }
        offset += run_reference.len() as i64;
    }

    if variants < 2 {
        return vec![key.clone()];
    }
    fragments
}

fn differs(column: &Column) -> bool {
    column.0 != column.1
}

fn aligned_columns(reference: &[u8], alternate: &[u8]) -> Vec<Column> {
    let scoring = Scoring::from_scores(GAP_OPEN, GAP_EXTEND, MATCH_SCORE, MISMATCH_SCORE);
    let mut aligner = Aligner::with_capacity_and_scoring(reference.len(), alternate.len(), scoring);
    let alignment = aligner.global(reference, alternate);

    let (mut x, mut y) = (alignment.xstart, alignment.ystart);
    let mut columns = Vec::with_capacity(alignment.operations.len());
    for operation in &alignment.operations {
        match operation {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                columns.push((reference.get(x).copied(), alternate.get(y).copied()));
                x += 1;
                y += 1;
            }
            // Base present in the reference only.
            AlignmentOperation::Ins => {
                columns.push((reference.get(x).copied(), None));
                x += 1;
            }
            // Base present in the alternate only.
            AlignmentOperation::Del => {
                columns.push((None, alternate.get(y).copied()));
                y += 1;
            }
            AlignmentOperation::Xclip(len) => x += len,
            AlignmentOperation::Yclip(len) => y += len,
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "1:100:ACTCGTAAA:ATTCGAAA";

    #[test]
    fn complex_substitution_with_blocks() {
        // ACTCGTAAA -> ATTCGAAA, trimmed to CTCGT -> TTCG at 101.
        let key = VariantKeyFields::new(101, 105, 0, "CTCGT", "TTCG");
        let fragments = decompose(&key, LINK, true);
        let rendered: Vec<String> = fragments.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["101-101:C:T", "102-104:T:", "105-105:T:"]);
        assert!(fragments[1].reference_block);
        assert_eq!(fragments[0].phase_set.as_deref(), Some(LINK));
        assert_eq!(fragments[2].phase_set.as_deref(), Some(LINK));
        assert_eq!(fragments[1].phase_set, None);
    }

    #[test]
    fn equal_length_runs_are_grouped() {
        let key = VariantKeyFields::new(100, 104, 0, "ACGTA", "TTGAC");
        let fragments = decompose(&key, LINK, false);
        let rendered: Vec<String> = fragments.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["100-101:AC:TT", "103-104:TA:AC"]);
    }

    #[test]
    fn single_fragment_is_kept_whole() {
        let key = VariantKeyFields::new(100, 101, 0, "CA", "TA");
        assert_eq!(decompose(&key, LINK, true), vec![key]);

        let insertion = VariantKeyFields::new(101, 100, 0, "", "TT");
        assert_eq!(decompose(&insertion, LINK, true), vec![insertion]);
    }
}
