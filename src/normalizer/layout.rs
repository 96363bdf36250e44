//! Allele index layout of one split record.
//!
//! Splitting a call with alleles `0..m` into a record for alternate `k` reorders
//! the allele space: the reference stays at 0, alternate `k` becomes 1 and the
//! remaining alternates follow in original order. Alternates that normalize to
//! the same event share a slot.

/// Mapping between the original allele indices of a call and the allele
/// indices of one split record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleLayout {
    original_to_target: Vec<usize>,
    target_to_original: Vec<usize>,
}

impl AlleleLayout {
    /// Layout for the record of alternate `primary` (zero-based alternate index).
    ///
    /// `slot_keys[i]` identifies the normalized event of alternate `i`; equal
    /// keys collapse onto one target allele, represented by the lowest original index.
    pub fn for_primary<K: PartialEq>(primary: usize, slot_keys: &[K]) -> Self {
        let allele_count = slot_keys.len() + 1;
        let mut original_to_target = vec![0; allele_count];
        let mut target_to_original = vec![0];

        let mut order = Vec::with_capacity(slot_keys.len());
        if primary < slot_keys.len() {
            order.push(primary);
        }
        order.extend((0..slot_keys.len()).filter(|&alt| alt != primary));

        for alt in order {
            let existing = target_to_original
                .iter()
                .skip(1)
                .position(|&original| slot_keys[original - 1] == slot_keys[alt]);
            let target = match existing {
                Some(offset) => offset + 1,
                None => {
                    target_to_original.push(alt + 1);
                    target_to_original.len() - 1
                }
            };
            original_to_target[alt + 1] = target;
        }

        Self {
            original_to_target,
            target_to_original,
        }
    }

    /// Alleles in the original call, reference included.
    pub fn original_allele_count(&self) -> usize {
        self.original_to_target.len()
    }

    /// Alleles in the split record, reference included.
    pub fn target_allele_count(&self) -> usize {
        self.target_to_original.len()
    }

    /// Target index of an original allele.
    pub fn target_of(&self, original: usize) -> Option<usize> {
        self.original_to_target.get(original).copied()
    }

    /// `target_to_original[t]` is the original allele shown as target `t`.
    pub fn target_to_original(&self) -> &[usize] {
        &self.target_to_original
    }

    /// Original alternate indices (zero-based) of the secondary alleles, target order.
    pub fn secondary_alternates(&self) -> impl Iterator<Item = usize> + '_ {
        self.target_to_original.iter().skip(2).map(|&original| original - 1)
    }
}
