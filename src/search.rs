//! Top-level optimal solve: iterative deepening over admissible bound `g+h`,
//! switching from a single-threaded search to the root-split parallel driver
//! once the bound grows past the initial heuristic by a configurable
//! margin (spec.md §4.7).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use enum_iterator::all;
use log::{debug, info};

use crate::cube::{is_move_redundant, Move, RubikState};
use crate::error::SolverError;
use crate::parallel;
use crate::pdb::PdbSet;

/// Runtime knobs for a solve, reachable from both the CLI and library
/// callers.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Worker count for the root-split phase. `None` defers to rayon's
    /// global pool (`rayon::current_num_threads`).
    pub threads: Option<usize>,
    /// God's number; never search past this many moves.
    pub max_depth: u8,
    pub timeout: Option<Duration>,
    /// How many bounds past the initial heuristic to search single-threaded
    /// before switching to the root-split driver.
    pub root_split_margin: u8,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            threads: None,
            max_depth: 20,
            timeout: None,
            root_split_margin: 4,
        }
    }
}

/// Finds an optimal (shortest quarter/half-turn-metric) solution for
/// `start`.
pub fn solve(start: &RubikState, pdbs: &PdbSet, config: &SolverConfig) -> Result<Vec<Move>, SolverError> {
    if let Some(threads) = config.threads {
        return solve_with_pool(start, pdbs, config, threads);
    }
    solve_inner(start, pdbs, config)
}

fn solve_with_pool(
    start: &RubikState,
    pdbs: &PdbSet,
    config: &SolverConfig,
    threads: usize,
) -> Result<Vec<Move>, SolverError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .expect("failed to build rayon thread pool");
    pool.install(|| solve_inner(start, pdbs, config))
}

fn solve_inner(start: &RubikState, pdbs: &PdbSet, config: &SolverConfig) -> Result<Vec<Move>, SolverError> {
    let deadline = config.timeout.map(|d| Instant::now() + d);
    let initial_h = pdbs.heuristic(start);
    let mut bound = initial_h;

    loop {
        if bound > config.max_depth {
            return Err(SolverError::SearchExhausted);
        }
        info!("opening IDA* bound {bound}");
        let deep = bound.saturating_sub(initial_h) > config.root_split_margin;

        let found = if deep {
            parallel::root_split_search(start, pdbs, bound, deadline)?
        } else {
            // Nothing to cancel in the single-threaded path; a fresh,
            // never-set flag keeps `dfs`'s signature uniform across callers.
            let cancelled = AtomicBool::new(false);
            let mut path = Vec::new();
            let mut visited = 0u64;
            let hit = dfs(start, 0, None, bound, pdbs, deadline, &cancelled, &mut visited, &mut path)?;
            if hit {
                Some(path)
            } else {
                None
            }
        };

        match found {
            Some(moves) => return Ok(moves),
            None => bound += 1,
        }
    }
}

/// One bounded depth-first pass at a fixed `bound`. Returns whether the goal
/// was reached, with `path` holding the move sequence on success.
///
/// `cancelled` is checked once per call — one recursive call is one node,
/// i.e. one depth boundary (spec.md §5: "checked at depth boundaries, not at
/// every node"), so a root-split peer's win is observed promptly without an
/// atomic load per move tried at that node.
pub(crate) fn dfs(
    state: &RubikState,
    g: u8,
    last: Option<Move>,
    bound: u8,
    pdbs: &PdbSet,
    deadline: Option<Instant>,
    cancelled: &AtomicBool,
    visited: &mut u64,
    path: &mut Vec<Move>,
) -> Result<bool, SolverError> {
    if state.is_solved() {
        return Ok(true);
    }

    if cancelled.load(Ordering::Relaxed) {
        return Ok(false);
    }

    *visited += 1;
    if *visited % 4096 == 0 {
        if let Some(dl) = deadline {
            if Instant::now() > dl {
                return Err(SolverError::Timeout);
            }
        }
    }

    for m in all::<Move>() {
        if is_move_redundant(last, m) {
            continue;
        }
        let child = state.apply(m);
        let h = pdbs.heuristic(&child);
        if g + 1 + h > bound {
            continue;
        }
        path.push(m);
        debug!("descend {m} at g={g}");
        if dfs(&child, g + 1, Some(m), bound, pdbs, deadline, cancelled, visited, path)? {
            return Ok(true);
        }
        path.pop();
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdb::store::PdbTable;

    /// A PDB backed by an always-zero table: the heuristic is the trivial
    /// (but still admissible) `h = 0`, so `solve` degrades to plain
    /// breadth-bounded IDA*. Good enough to exercise the search loop without
    /// building real, full-scale tables.
    fn zero_pdbs() -> PdbSet {
        PdbSet {
            corner: PdbTable::from_vec(vec![0u8; crate::pdbkey::N_CORNER_KEYS as usize]),
            alledge: PdbTable::from_vec(vec![0u8; crate::pdbkey::N_ALLEDGE_KEYS as usize]),
            edgesplit0: PdbTable::from_vec(vec![0u8; crate::pdbkey::N_EDGESPLIT_KEYS as usize]),
            edgesplit1: PdbTable::from_vec(vec![0u8; crate::pdbkey::N_EDGESPLIT_KEYS as usize]),
        }
    }

    #[test]
    fn solved_state_solves_in_zero_moves() {
        let pdbs = zero_pdbs();
        let config = SolverConfig::default();
        let solution = solve(&RubikState::solved(), &pdbs, &config).unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn single_move_scramble_solves_in_one_move() {
        let pdbs = zero_pdbs();
        let config = SolverConfig::default();
        let scrambled = RubikState::solved().apply(Move::U);
        let solution = solve(&scrambled, &pdbs, &config).unwrap();
        assert_eq!(solution, vec![Move::Up]);
        assert!(scrambled.apply_all(&solution).is_solved());
    }

    #[test]
    fn solution_is_optimal_for_a_two_move_scramble() {
        let pdbs = zero_pdbs();
        let config = SolverConfig::default();
        let scrambled = RubikState::solved().apply(Move::U).apply(Move::R);
        let solution = solve(&scrambled, &pdbs, &config).unwrap();
        assert_eq!(solution.len(), 2);
        assert!(scrambled.apply_all(&solution).is_solved());
    }

    #[test]
    fn checkerboard_pattern_solves_within_six_moves() {
        let pdbs = zero_pdbs();
        let config = SolverConfig::default();
        let scrambled = RubikState::solved()
            .apply(Move::U2)
            .apply(Move::D2)
            .apply(Move::R2)
            .apply(Move::L2)
            .apply(Move::F2)
            .apply(Move::B2);
        let solution = solve(&scrambled, &pdbs, &config).unwrap();
        assert!(solution.len() <= 6);
        assert!(scrambled.apply_all(&solution).is_solved());
    }

    /// Scenarios beyond a handful of moves need the real pattern-database
    /// heuristic to search in reasonable time — an all-zero heuristic turns
    /// IDA* into brute-force breadth-first search, which is fine for depth
    /// <= 6 but not for God's-number-deep instances like a superflip or the
    /// published 17-move case. Those run as `#[ignore]`d integration checks
    /// against PDBs built by `build-pdbs`, pointed at by `RUBIK_KORF_PDB_DIR`.
    #[test]
    #[ignore = "needs real pattern databases; run with --ignored and RUBIK_KORF_PDB_DIR set"]
    fn superflip_solves_in_twenty_moves() {
        let pdb_dir = std::env::var("RUBIK_KORF_PDB_DIR").expect("RUBIK_KORF_PDB_DIR must point at built PDBs");
        let pdbs = load_pdbs_for_test(&pdb_dir);
        let config = SolverConfig::default();

        // All 12 edges flipped in place, every corner and every permutation
        // fixed: apply the well-known superflip-inducing sequence to the
        // solved state rather than hand-writing the face-id array.
        let sequence = [
            Move::U, Move::R2, Move::F, Move::B, Move::R, Move::B2, Move::R, Move::U2, Move::L, Move::B2, Move::R,
            Move::Up, Move::Dp, Move::R2, Move::F, Move::Rp, Move::L, Move::B2, Move::U2, Move::F2,
        ];
        let superflip = RubikState::solved().apply_all(&sequence);

        let solution = solve(&superflip, &pdbs, &config).unwrap();
        assert_eq!(solution.len(), 20);
        assert!(superflip.apply_all(&solution).is_solved());
    }

    #[test]
    #[ignore = "needs real pattern databases; run with --ignored and RUBIK_KORF_PDB_DIR set"]
    fn published_seventeen_move_instance_solves_optimally() {
        let pdb_dir = std::env::var("RUBIK_KORF_PDB_DIR").expect("RUBIK_KORF_PDB_DIR must point at built PDBs");
        let pdbs = load_pdbs_for_test(&pdb_dir);
        let config = SolverConfig::default();

        let face_ids: [u8; 48] = [
            9, 32, 29, 68, 13, 41, 24, 76, 25, 40, 12, 61, 21, 64, 1, 52, 2, 65, 20, 72, 6, 36, 18, 44, 16, 37, 5, 56,
            30, 33, 8, 49, 26, 53, 0, 45, 17, 48, 10, 77, 28, 57, 4, 73, 22, 60, 14, 69,
        ];
        let start = RubikState(face_ids);

        let solution = solve(&start, &pdbs, &config).unwrap();
        assert_eq!(solution.len(), 17);
        assert!(start.apply_all(&solution).is_solved());
    }

    #[cfg(test)]
    fn load_pdbs_for_test(dir: &str) -> PdbSet {
        use std::path::Path;
        let dir = Path::new(dir);
        PdbSet {
            corner: PdbTable::load(&dir.join("corner.pdb")).unwrap(),
            alledge: PdbTable::load(&dir.join("alledge.pdb")).unwrap(),
            edgesplit0: PdbTable::load(&dir.join("edgesplit0.pdb")).unwrap(),
            edgesplit1: PdbTable::load(&dir.join("edgesplit1.pdb")).unwrap(),
        }
    }
}
