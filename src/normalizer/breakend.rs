//! Breakend bracket notation: parsing and anchor canonicalization.

use crate::model::{AnchorSide, Breakend, MateJoin};

use super::{ContigNaming, NormalizeError};

/// Breakend placed on canonical, anchor-free coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBreakend {
    /// Start after anchor removal.
    pub start: i64,
    /// End after anchor removal.
    pub end: i64,
    /// Remaining reference allele (empty once the anchor is dropped).
    pub reference: String,
    /// Canonical breakend.
    pub breakend: Breakend,
    /// Bases between the junction and the dropped reference base.
    pub inserted_sequence: Option<String>,
}

impl NormalizedBreakend {
    /// Canonical alternate string.
    pub fn alternate(&self) -> String {
        self.breakend.to_string()
    }
}

/// Parse one of `t[p[`, `t]p]`, `]p]t`, `[p[t`.
///
/// `t` may be `.` for an anchor-free breakend; `p` is `chrom:pos`.
pub fn parse_breakend(alternate: &str) -> Result<Breakend, NormalizeError> {
    let invalid = |reason: &str| NormalizeError::InvalidBreakend {
        alternate: alternate.to_string(),
        reason: reason.to_string(),
    };

    let first = alternate
        .find(['[', ']'])
        .ok_or_else(|| invalid("missing '[' or ']'"))?;
    let bracket = alternate[first..]
        .chars()
        .next()
        .ok_or_else(|| invalid("missing bracket"))?;
    let mate_join = MateJoin::from_bracket(bracket).ok_or_else(|| invalid("missing bracket"))?;
    let other = if bracket == '[' { ']' } else { '[' };
    if alternate.contains(other) {
        return Err(invalid("mixed bracket directions"));
    }
    if alternate.matches(bracket).count() != 2 {
        return Err(invalid("expected exactly two brackets"));
    }

    let second = first
        + 1
        + alternate[first + 1..]
            .find(bracket)
            .ok_or_else(|| invalid("unterminated mate locus"))?;
    let locus = &alternate[first + 1..second];
    let (mate_chromosome, position) = locus
        .rsplit_once(':')
        .ok_or_else(|| invalid("mate locus is not chrom:pos"))?;
    if mate_chromosome.is_empty() {
        return Err(invalid("empty mate contig"));
    }
    let mate_position: i64 = position
        .parse()
        .map_err(|_| invalid("mate position is not numeric"))?;

    let before = &alternate[..first];
    let after = &alternate[second + 1..];
    let (anchor_side, anchor) = match (before.is_empty(), after.is_empty()) {
        (false, true) => (AnchorSide::Before, before),
        (true, false) => (AnchorSide::After, after),
        (true, true) => return Err(invalid("missing anchor sequence")),
        (false, false) => return Err(invalid("anchor on both sides of the mate locus")),
    };
    let anchor = if anchor == "." { "" } else { anchor };

    Ok(Breakend {
        anchor: anchor.to_string(),
        anchor_side,
        mate_join,
        mate_chromosome: mate_chromosome.to_string(),
        mate_position,
    })
}

/// Canonicalize a breakend record.
///
/// The mate contig follows the record's naming convention. When the anchor
/// repeats the reference allele (as a prefix for `t[p[`/`t]p]`, as a suffix for
/// `]p]t`/`[p[t`) the reference is dropped; a leading anchor shifts the record
/// right by the reference length.
pub fn normalize_breakend(
    chromosome: &str,
    start: i64,
    end: i64,
    reference: &str,
    alternate: &str,
    naming: &dyn ContigNaming,
) -> Result<NormalizedBreakend, NormalizeError> {
    let mut breakend = parse_breakend(alternate)?;
    breakend.mate_chromosome = naming.canonical_mate(chromosome, &breakend.mate_chromosome);

    let stripped = if reference.is_empty() {
        None
    } else {
        match breakend.anchor_side {
            AnchorSide::Before => breakend
                .anchor
                .strip_prefix(reference)
                .map(|rest| (rest.to_string(), reference.len() as i64)),
            AnchorSide::After => breakend
                .anchor
                .strip_suffix(reference)
                .map(|rest| (rest.to_string(), 0)),
        }
    };

    let (start, end, reference) = match stripped {
        Some((rest, shift)) => {
            breakend.anchor = rest;
            let start = start + shift;
            (start, start - 1, String::new())
        }
        None => (start, end, reference.to_string()),
    };

    let inserted_sequence = if reference.is_empty() && !breakend.anchor.is_empty() {
        Some(breakend.anchor.clone())
    } else {
        None
    };

    Ok(NormalizedBreakend {
        start,
        end,
        reference,
        breakend,
        inserted_sequence,
    })
}
