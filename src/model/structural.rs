use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structural subtype derived from copy number or symbolic allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StructuralType {
    /// Copy number above the baseline.
    CopyNumberGain,
    /// Copy number below the baseline.
    CopyNumberLoss,
    /// `<DUP:TANDEM>`.
    TandemDuplication,
}

/// Which side of the bracketed mate locus the anchor sequence sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnchorSide {
    /// `t[p[` and `t]p]`: the join follows the anchor.
    Before,
    /// `[p[t` and `]p]t`: the join precedes the anchor.
    After,
}

/// Direction in which the joined mate sequence extends from `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MateJoin {
    /// `[`: the piece extending to the right of `p` is joined.
    ExtendsRight,
    /// `]`: the piece extending to the left of `p` is joined.
    ExtendsLeft,
}

impl MateJoin {
    /// Bracket character used in the notation.
    pub fn bracket(self) -> char {
        match self {
            MateJoin::ExtendsRight => '[',
            MateJoin::ExtendsLeft => ']',
        }
    }

    pub(crate) fn from_bracket(bracket: char) -> Option<Self> {
        match bracket {
            '[' => Some(MateJoin::ExtendsRight),
            ']' => Some(MateJoin::ExtendsLeft),
            _ => None,
        }
    }
}

/// Parsed breakend alternate (`t[p[`, `t]p]`, `]p]t`, `[p[t`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Breakend {
    /// Anchor sequence; empty when written as `.`.
    pub anchor: String,
    /// Position of the anchor relative to the mate locus.
    pub anchor_side: AnchorSide,
    /// Bracket direction.
    pub mate_join: MateJoin,
    /// Mate contig name.
    pub mate_chromosome: String,
    /// Mate position (1-based).
    pub mate_position: i64,
}

impl fmt::Display for Breakend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bracket = self.mate_join.bracket();
        let anchor = if self.anchor.is_empty() {
            "."
        } else {
            self.anchor.as_str()
        };
        match self.anchor_side {
            AnchorSide::Before => write!(
                f,
                "{anchor}{bracket}{}:{}{bracket}",
                self.mate_chromosome, self.mate_position
            ),
            AnchorSide::After => write!(
                f,
                "{bracket}{}:{}{bracket}{anchor}",
                self.mate_chromosome, self.mate_position
            ),
        }
    }
}

/// Canonical structural fields computed from symbolic alleles and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructuralInfo {
    /// Left bound of the start confidence interval.
    pub ci_start_left: Option<i64>,
    /// Right bound of the start confidence interval.
    pub ci_start_right: Option<i64>,
    /// Left bound of the end confidence interval.
    pub ci_end_left: Option<i64>,
    /// Right bound of the end confidence interval.
    pub ci_end_right: Option<i64>,
    /// Absolute copy number.
    pub copy_number: Option<u32>,
    /// Bases inserted at a breakend junction.
    pub inserted_sequence: Option<String>,
    /// Assembled left flank of a partially resolved insertion.
    pub left_inserted_sequence: Option<String>,
    /// Assembled right flank of a partially resolved insertion.
    pub right_inserted_sequence: Option<String>,
    /// Structural subtype.
    pub structural_type: Option<StructuralType>,
    /// Mate information for breakends.
    pub breakend: Option<Breakend>,
}
