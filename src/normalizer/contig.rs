//! Contig naming conventions used to canonicalize breakend mate loci.

use std::fmt::Debug;

/// Decides how a mate contig is spelled on a record of a given contig.
pub trait ContigNaming: Debug + Send + Sync {
    /// Rewrite `mate` so it follows the naming used by `record_contig`.
    fn canonical_mate(&self, record_contig: &str, mate: &str) -> String;
}

/// Leaves mate contig names untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct VerbatimNaming;

impl ContigNaming for VerbatimNaming {
    fn canonical_mate(&self, _record_contig: &str, mate: &str) -> String {
        mate.to_string()
    }
}

/// Adds or strips an alias prefix (`chr` by default) so the mate matches the record.
///
/// `chr9` on a record named `1` becomes `9`; `9` on a record named `chr1`
/// becomes `chr9`. Prefix matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct PrefixAliasNaming {
    prefix: String,
}

impl PrefixAliasNaming {
    /// Convention for an arbitrary alias prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn strip<'a>(&self, contig: &'a str) -> Option<&'a str> {
        let len = self.prefix.len();
        if contig.len() > len
            && contig.is_char_boundary(len)
            && contig[..len].eq_ignore_ascii_case(&self.prefix)
        {
            Some(&contig[len..])
        } else {
            None
        }
    }
}

impl Default for PrefixAliasNaming {
    fn default() -> Self {
        Self::new("chr")
    }
}

impl ContigNaming for PrefixAliasNaming {
    fn canonical_mate(&self, record_contig: &str, mate: &str) -> String {
        // Assembly-local contigs such as `<ctg1>` are never aliased.
        if mate.starts_with('<') {
            return mate.to_string();
        }
        match (self.strip(record_contig), self.strip(mate)) {
            (None, Some(bare)) => bare.to_string(),
            (Some(_), None) => {
                let record_prefix = &record_contig[..self.prefix.len()];
                format!("{record_prefix}{mate}")
            }
            _ => mate.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_alias_missing_from_record() {
        let naming = PrefixAliasNaming::default();
        assert_eq!(naming.canonical_mate("1", "chr9"), "9");
        assert_eq!(naming.canonical_mate("1", "CHR22"), "22");
        assert_eq!(naming.canonical_mate("1", "9"), "9");
    }

    #[test]
    fn adds_alias_used_by_record() {
        let naming = PrefixAliasNaming::default();
        assert_eq!(naming.canonical_mate("chr1", "9"), "chr9");
        assert_eq!(naming.canonical_mate("Chr1", "9"), "Chr9");
        assert_eq!(naming.canonical_mate("chr1", "chr9"), "chr9");
        assert_eq!(naming.canonical_mate("chr1", "<ctg1>"), "<ctg1>");
    }

    #[test]
    fn verbatim_keeps_spelling() {
        assert_eq!(VerbatimNaming.canonical_mate("1", "chr9"), "chr9");
    }
}
