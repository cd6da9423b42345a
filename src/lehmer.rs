//! Lehmer-code / mixed-radix ranking of (partial) permutations.
//!
//! Ports `original_source/lehmer_code.py`'s `encode`: given `k` distinct
//! values drawn from `0..n` (a full permutation when `k == n`, a k-of-n
//! selection otherwise), returns a bijective rank in `0..n!/(n-k)!`.
//!
//! The source precomputes a `2^n`-entry popcount table; this port just calls
//! `u32::count_ones`, a single hardware instruction, so there's nothing to
//! precompute (see DESIGN.md).

/// Rank of `values` (`k` distinct entries from `0..n`) among all ordered
/// k-of-n selections, in colexicographic-by-position order matching the
/// source: `rank = sum_i lehmer[i] * (n-1-i)! / (n-k)!`, where
/// `lehmer[i] = values[i] - (number of earlier entries smaller than values[i])`.
pub fn rank(values: &[u32], n: u32) -> u64 {
    let k = values.len() as u32;
    debug_assert!(n <= 32);
    debug_assert!(k <= n);

    let mut seen: u32 = 0;
    let mut total: u64 = 0;
    for (i, &v) in values.iter().enumerate() {
        debug_assert!(v < n);
        let above_mask = seen >> (n - v);
        let smaller_seen = above_mask.count_ones() as u64;
        let digit = v as u64 - smaller_seen;
        total += digit * weight(n, k, i as u32);
        seen |= 1 << (n - 1 - v);
    }
    total
}

/// `(n-1-i)! / (n-k)!`, the place-value weight of position `i` in a k-of-n
/// ranking.
fn weight(n: u32, k: u32, i: u32) -> u64 {
    let mut w = 1u64;
    let mut v = n - 1 - i;
    while v >= n - k + 1 {
        w *= v as u64;
        v -= 1;
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn identity_permutation_ranks_zero() {
        let values: Vec<u32> = (0..6).collect();
        assert_eq!(rank(&values, 6), 0);
    }

    #[test]
    fn reverse_permutation_ranks_last() {
        let values: Vec<u32> = (0..6).rev().collect();
        assert_eq!(rank(&values, 6), 719); // 6! - 1
    }

    #[test]
    fn full_permutations_of_small_n_are_bijective() {
        let n = 5u32;
        let mut ranks = std::collections::HashSet::new();
        for perm in (0..n).permutations(n as usize) {
            let r = rank(&perm, n);
            assert!(r < 120);
            assert!(ranks.insert(r), "duplicate rank for {perm:?}");
        }
        assert_eq!(ranks.len(), 120);
    }

    #[test]
    fn partial_selections_are_bijective() {
        let n = 6u32;
        let k = 3usize;
        let mut ranks = std::collections::HashSet::new();
        for perm in (0..n).permutations(k) {
            let r = rank(&perm, n);
            assert!(r < 120); // 6*5*4
            assert!(ranks.insert(r));
        }
        assert_eq!(ranks.len(), 120);
    }
}
