//! Genotype index arithmetic for genotype-indexed arrays (`Number=G`).
//!
//! A sample of ploidy `p` over `m` alleles has one entry per unordered
//! genotype, i.e. per multiset of size `p` drawn from `m` alleles. Entries are
//! in colex order: `(a_1 <= ... <= a_p)` is compared from `a_p` down, which for
//! diploids gives `00, 01, 11, 02, 12, 22, ...`.

/// Largest ploidy considered when inferring ploidy from an array length.
pub const MAX_INFERRED_PLOIDY: usize = 16;

/// Binomial coefficient `C(n, k)`, saturating at `usize::MAX`.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // result * (n - i) is divisible by i + 1 at every step
        result = match result.checked_mul((n - i) as u128) {
            Some(product) => product / (i as u128 + 1),
            None => return usize::MAX,
        };
        if result > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    result as usize
}

/// Number of unordered genotypes for `allele_count` alleles: `C(m + p - 1, p)`.
pub fn genotype_count(allele_count: usize, ploidy: usize) -> usize {
    if allele_count == 0 {
        return 0;
    }
    binomial(allele_count + ploidy - 1, ploidy)
}

/// Colex index of a genotype. The alleles need not be sorted.
pub fn genotype_index(alleles: &[usize]) -> usize {
    let mut sorted = alleles.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .map(|(i, &allele)| binomial(allele + i, i + 1))
        .sum()
}

/// All genotypes of the given ploidy over `allele_count` alleles, in index order.
pub fn genotypes(allele_count: usize, ploidy: usize) -> Vec<Vec<usize>> {
    fn extend(max_allele: usize, remaining: usize, suffix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining == 0 {
            let mut genotype = suffix.clone();
            genotype.reverse();
            out.push(genotype);
            return;
        }
        for allele in 0..=max_allele {
            suffix.push(allele);
            extend(allele, remaining - 1, suffix, out);
            suffix.pop();
        }
    }

    let mut out = Vec::with_capacity(genotype_count(allele_count, ploidy));
    if ploidy == 0 {
        out.push(Vec::new());
        return out;
    }
    // The last (largest) allele varies slowest in colex order.
    for last in 0..allele_count {
        let mut suffix = vec![last];
        extend(last, ploidy - 1, &mut suffix, &mut out);
    }
    out
}

/// Ploidy whose genotype count over `allele_count` alleles equals `len`.
pub fn infer_ploidy(allele_count: usize, len: usize) -> Option<usize> {
    if allele_count < 2 {
        return None;
    }
    (1..=MAX_INFERRED_PLOIDY)
        .map(|ploidy| (ploidy, genotype_count(allele_count, ploidy)))
        .take_while(|&(_, count)| count <= len)
        .find(|&(_, count)| count == len)
        .map(|(ploidy, _)| ploidy)
}

/// For every genotype over the target alleles, the index of the corresponding
/// genotype over the original alleles.
///
/// `target_to_original[t]` is the original allele shown as target allele `t`.
/// The result has `C(m' + p - 1, p)` entries where `m' = target_to_original.len()`.
pub fn remap_genotype_indices(
    ploidy: usize,
    original_allele_count: usize,
    target_to_original: &[usize],
) -> Vec<usize> {
    debug_assert!(target_to_original
        .iter()
        .all(|&allele| allele < original_allele_count));
    genotypes(target_to_original.len(), ploidy)
        .into_iter()
        .map(|genotype| {
            let original: Vec<usize> = genotype
                .iter()
                .map(|&allele| target_to_original[allele])
                .collect();
            genotype_index(&original)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diploid_order() {
        assert_eq!(
            genotypes(3, 2),
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![1, 1],
                vec![0, 2],
                vec![1, 2],
                vec![2, 2]
            ]
        );
    }

    #[test]
    fn index_matches_enumeration() {
        for ploidy in 1..=4 {
            for allele_count in 1..=5 {
                let all = genotypes(allele_count, ploidy);
                assert_eq!(all.len(), genotype_count(allele_count, ploidy));
                for (idx, genotype) in all.iter().enumerate() {
                    assert_eq!(genotype_index(genotype), idx);
                }
            }
        }
    }

    #[test]
    fn oversized_counts_saturate() {
        assert_eq!(binomial(400, 40), usize::MAX);
        assert_eq!(genotype_count(300, 16), usize::MAX);
        assert_eq!(binomial(100, 2), 4950);
    }

    #[test]
    fn ploidy_search_stops_past_length() {
        assert_eq!(infer_ploidy(101, 7), None);
        assert_eq!(infer_ploidy(101, 101), Some(1));
        assert_eq!(infer_ploidy(101, 5151), Some(2));
    }

    #[test]
    fn diploid_index_formula() {
        // b(b+1)/2 + a for a <= b
        assert_eq!(genotype_index(&[1, 2]), 4);
        assert_eq!(genotype_index(&[2, 1]), 4);
        assert_eq!(genotype_index(&[3, 3]), 9);
    }

    #[test]
    fn remap_for_swapped_alternates() {
        // A/T/C, C becomes the primary alternate.
        assert_eq!(remap_genotype_indices(2, 3, &[0, 2, 1]), vec![0, 3, 5, 1, 4, 2]);
        assert_eq!(remap_genotype_indices(1, 3, &[0, 2, 1]), vec![0, 2, 1]);
    }

    #[test]
    fn ploidy_inference() {
        assert_eq!(infer_ploidy(3, 3), Some(1));
        assert_eq!(infer_ploidy(3, 6), Some(2));
        assert_eq!(infer_ploidy(2, 4), Some(3));
        assert_eq!(infer_ploidy(3, 5), None);
    }
}
