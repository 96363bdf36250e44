//! Reference blocks covering the span of a call that no fragment covers.

use super::VariantKeyFields;

/// Maximal intervals of `[start, end]` not covered by any of `fragments`.
///
/// Insertions cover nothing. Each block carries the reference base at its own
/// start (`N` when `reference` does not reach that far).
pub fn reference_blocks(
    start: i64,
    end: i64,
    reference: &str,
    fragments: &[VariantKeyFields],
) -> Vec<VariantKeyFields> {
    let mut covered: Vec<(i64, i64)> = fragments
        .iter()
        .filter(|fragment| !fragment.is_insertion())
        .map(|fragment| (fragment.start, fragment.end))
        .collect();
    covered.sort_unstable();

    let base_at = |position: i64| -> String {
        usize::try_from(position - start)
            .ok()
            .and_then(|offset| reference.get(offset..offset + 1))
            .unwrap_or("N")
            .to_string()
    };

    let mut blocks = Vec::new();
    let mut cursor = start;
    for (block_start, block_end) in covered {
        if block_start > cursor {
            let gap_end = (block_start - 1).min(end);
            if cursor <= gap_end {
                blocks.push(VariantKeyFields::reference_block(cursor, gap_end, base_at(cursor)));
            }
        }
        cursor = cursor.max(block_end + 1);
    }
    if cursor <= end {
        blocks.push(VariantKeyFields::reference_block(cursor, end, base_at(cursor)));
    }
    blocks
}
