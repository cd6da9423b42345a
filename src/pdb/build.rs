//! Builds pattern databases by breadth-first or depth-bounded search from
//! the solved state, applying the same redundant-move pruning the searcher
//! uses (spec.md §4.4, §4.6).
//!
//! Pruning during construction is safe, not just an optimization: any state
//! reachable via a path with a redundant adjacent move pair is also
//! reachable via an equivalent, no-longer-redundant path of equal or lesser
//! length (the pair folds into one move, or the canonical ordering of a
//! commuting pair is used instead) — so every reachable key still gets its
//! true minimum distance, just without generating the duplicate work.

use enum_iterator::all;
use log::info;

use crate::cube::{is_move_redundant, Move, RubikState};

/// Cells never reached fall back to this many plies past the deepest level
/// actually explored, so they remain a safe (if loose) upper bound rather
/// than a raw, overflow-prone sentinel.
const UNREACHED_PAST_BFS: u8 = 20;

/// Full level-synchronous BFS from the solved state, filling every reachable
/// key with its exact distance. Used for the corner PDB and both edge-split
/// PDBs, whose full state spaces (8!*3^7 and 12P7*2^7 respectively) are
/// entirely reachable. `max_depth`, when given, stops the BFS early (used by
/// tests to bound a probe over a small key space; production callers pass
/// `None` and let it run to exhaustion).
pub fn build_bfs(num_keys: u64, key_fn: impl Fn(&RubikState) -> u64, max_depth: Option<u8>) -> Vec<u8> {
    let mut depths = vec![u8::MAX; num_keys as usize];
    let start = RubikState::solved();
    depths[key_fn(&start) as usize] = 0;

    let mut frontier: Vec<(RubikState, Option<Move>)> = vec![(start, None)];
    let mut depth: u8 = 0;
    let mut filled: u64 = 1;

    while !frontier.is_empty() && max_depth.map_or(true, |m| depth < m) {
        let mut next = Vec::new();
        for (state, last) in &frontier {
            for m in all::<Move>() {
                if is_move_redundant(*last, m) {
                    continue;
                }
                let child = state.apply(m);
                let key = key_fn(&child) as usize;
                if depths[key] == u8::MAX {
                    depths[key] = depth + 1;
                    filled += 1;
                    next.push((child, Some(m)));
                }
            }
        }
        depth += 1;
        info!("pdb bfs: depth {depth} reached {} new states ({filled} total)", next.len());
        frontier = next;
    }

    if max_depth.is_none() {
        for d in depths.iter_mut() {
            if *d == u8::MAX {
                *d = UNREACHED_PAST_BFS;
            }
        }
    }
    depths
}

/// Depth-bounded DFS from the solved state, recording the minimum depth seen
/// per key up to `max_depth` plies. Used for the all-edge PDB, whose full
/// space (12! = ~479M) is reachable but too large to explore past depth 9 in
/// a reasonable time; cells never reached within the bound are clamped to
/// `max_depth + 1`, an honest (if loose) lower-bound heuristic value rather
/// than a raw sentinel.
pub fn build_dfs_bounded(num_keys: u64, key_fn: impl Fn(&RubikState) -> u64, max_depth: u8) -> Vec<u8> {
    let mut depths = vec![u8::MAX; num_keys as usize];
    let start = RubikState::solved();
    depths[key_fn(&start) as usize] = 0;

    recurse(&start, 0, None, max_depth, &mut depths, &key_fn);

    for d in depths.iter_mut() {
        if *d == u8::MAX {
            *d = max_depth + 1;
        }
    }
    depths
}

fn recurse(
    state: &RubikState,
    depth: u8,
    last: Option<Move>,
    max_depth: u8,
    depths: &mut [u8],
    key_fn: &impl Fn(&RubikState) -> u64,
) {
    if depth == max_depth {
        return;
    }
    for m in all::<Move>() {
        if is_move_redundant(last, m) {
            continue;
        }
        let child = state.apply(m);
        let key = key_fn(&child) as usize;
        let next_depth = depth + 1;
        // Only descend if this path beats (or ties, for depth 0) whatever
        // already reached this key: a longer-or-equal arrival can never
        // uncover anything the shorter arrival's own expansion won't.
        if next_depth < depths[key] {
            depths[key] = next_depth;
            recurse(&child, next_depth, Some(m), max_depth, depths, key_fn);
        }
    }
    if depth == 0 {
        info!("pdb dfs: explored to depth {max_depth}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdbkey;

    #[test]
    fn bfs_bounded_probe_matches_hand_verified_depths() {
        // Bound the real all-edge key space to a shallow probe: depth 0 is
        // just the solved state, depth 1 is every single non-redundant
        // move's immediate result.
        let depths = build_bfs(pdbkey::N_ALLEDGE_KEYS, pdbkey::key_alledges, Some(2));
        assert_eq!(depths[pdbkey::key_alledges(&RubikState::solved()) as usize], 0);
        for m in all::<Move>() {
            let s = RubikState::solved().apply(m);
            let d = depths[pdbkey::key_alledges(&s) as usize];
            assert!(d <= 1, "single move {m} should be depth <= 1, got {d}");
        }
    }

    #[test]
    fn dfs_bounded_never_exceeds_max_depth_plus_one() {
        let depths = build_dfs_bounded(pdbkey::N_ALLEDGE_KEYS, pdbkey::key_alledges, 3);
        assert!(depths.iter().all(|&d| d <= 4));
        assert_eq!(depths[0], 0);
    }

    #[test]
    fn corner_pdb_single_move_from_solved_is_depth_one() {
        let depths = build_bfs(pdbkey::N_CORNER_KEYS, pdbkey::key_corners, Some(2));
        assert_eq!(depths[pdbkey::key_corners(&RubikState::solved()) as usize], 0);
        for m in all::<Move>() {
            let s = RubikState::solved().apply(m);
            let key = pdbkey::key_corners(&s) as usize;
            assert_eq!(depths[key], 1, "move {m} should put the corner PDB at depth 1");
        }
    }

    #[test]
    fn dfs_bounded_agrees_with_bfs_within_the_bound() {
        let bfs = build_bfs(pdbkey::N_ALLEDGE_KEYS, pdbkey::key_alledges, Some(2));
        let dfs = build_dfs_bounded(pdbkey::N_ALLEDGE_KEYS, pdbkey::key_alledges, 2);
        for (key, &bd) in bfs.iter().enumerate() {
            if bd <= 2 {
                assert_eq!(dfs[key], bd, "mismatch at key {key}");
            }
        }
    }
}
