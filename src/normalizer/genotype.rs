//! Genotype strings (`0/1`, `1|0`, `./.`, `1`).

use std::fmt;

use thiserror::Error;

/// Allele separator between two genotype calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `/`
    Unphased,
    /// `|`
    Phased,
}

impl Separator {
    fn as_char(self) -> char {
        match self {
            Separator::Unphased => '/',
            Separator::Phased => '|',
        }
    }
}

/// Reason a genotype string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct GenotypeParseError(pub String);

/// Parsed genotype: allele indices (`None` = missing) and their separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    alleles: Vec<Option<usize>>,
    separators: Vec<Separator>,
}

impl Genotype {
    /// Parse a genotype string.
    pub fn parse(value: &str) -> Result<Self, GenotypeParseError> {
        let mut alleles = Vec::new();
        let mut separators = Vec::new();
        let mut token_start = 0;

        for (idx, ch) in value.char_indices() {
            let separator = match ch {
                '/' => Separator::Unphased,
                '|' => Separator::Phased,
                _ => continue,
            };
            alleles.push(parse_allele(&value[token_start..idx])?);
            separators.push(separator);
            token_start = idx + 1;
        }
        alleles.push(parse_allele(&value[token_start..])?);

        Ok(Self {
            alleles,
            separators,
        })
    }

    /// Number of allele copies.
    pub fn ploidy(&self) -> usize {
        self.alleles.len()
    }

    /// Allele indices in call order.
    pub fn alleles(&self) -> &[Option<usize>] {
        &self.alleles
    }

    /// Whether any separator is `|`.
    pub fn is_phased(&self) -> bool {
        self.separators.contains(&Separator::Phased)
    }

    /// Largest called allele index.
    pub fn max_allele(&self) -> Option<usize> {
        self.alleles.iter().flatten().copied().max()
    }

    /// Apply `f` to every called allele; missing alleles stay missing.
    pub fn map_alleles(&self, mut f: impl FnMut(usize) -> usize) -> Self {
        Self {
            alleles: self.alleles.iter().map(|allele| allele.map(&mut f)).collect(),
            separators: self.separators.clone(),
        }
    }

    /// Sort allele indices of an unphased genotype, missing alleles first.
    pub fn sorted(mut self) -> Self {
        if !self.is_phased() {
            self.alleles.sort_by_key(|allele| allele.map_or(0, |idx| idx + 1));
        }
        self
    }
}

fn parse_allele(token: &str) -> Result<Option<usize>, GenotypeParseError> {
    if token == "." {
        return Ok(None);
    }
    token
        .parse::<usize>()
        .map(Some)
        .map_err(|_| GenotypeParseError(format!("invalid allele token '{token}'")))
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, allele) in self.alleles.iter().enumerate() {
            if idx > 0 {
                write!(f, "{}", self.separators[idx - 1].as_char())?;
            }
            match allele {
                Some(allele) => write!(f, "{allele}")?,
                None => f.write_str(".")?,
            }
        }
        Ok(())
    }
}
