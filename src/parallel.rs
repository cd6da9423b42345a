//! Root-split parallel IDA*: once a bound is deep enough to be worth
//! spreading across cores, the root is expanded to depth 2 and each
//! resulting prefix is handed to the thread pool as an independent bounded
//! DFS. First prefix to find a solution wins; the rest are cancelled.
//!
//! Grounded in the teacher's own `rayon`-based bulk work (`scrambles.rs`'s
//! `bulk_scramble`), generalized from "do the same independent thing N
//! times and collect every result" to "race N independent searches and keep
//! only the first winner."

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use enum_iterator::all;
use log::info;
use rayon::prelude::*;

use crate::cube::{is_move_redundant, Move, RubikState};
use crate::error::SolverError;
use crate::pdb::PdbSet;
use crate::search::dfs;

/// Expands `start` to depth 2, discards prefixes the heuristic already rules
/// out at `bound`, and races a bounded DFS per surviving prefix across the
/// rayon pool. Returns `None` if no prefix finds a solution within `bound`.
pub fn root_split_search(
    start: &RubikState,
    pdbs: &PdbSet,
    bound: u8,
    deadline: Option<Instant>,
) -> Result<Option<Vec<Move>>, SolverError> {
    let mut prefixes: Vec<(Vec<Move>, RubikState)> = Vec::new();
    for m1 in all::<Move>() {
        let s1 = start.apply(m1);
        let h1 = pdbs.heuristic(&s1);
        if 1 + h1 > bound {
            continue;
        }
        for m2 in all::<Move>() {
            if is_move_redundant(Some(m1), m2) {
                continue;
            }
            let s2 = s1.apply(m2);
            let h2 = pdbs.heuristic(&s2);
            if 2 + h2 > bound {
                continue;
            }
            prefixes.push((vec![m1, m2], s2));
        }
    }

    info!("root-split: bound {bound}, {} surviving 2-move prefixes", prefixes.len());

    let cancelled = AtomicBool::new(false);
    let timed_out = AtomicBool::new(false);
    let found: Mutex<Option<Vec<Move>>> = Mutex::new(None);

    prefixes.par_iter().for_each(|(prefix, state2)| {
        if cancelled.load(Ordering::Relaxed) {
            return;
        }
        let last = prefix.last().copied();
        let mut path = prefix.clone();
        let mut visited = 0u64;
        match dfs(state2, 2, last, bound, pdbs, deadline, &cancelled, &mut visited, &mut path) {
            Ok(true) => {
                let mut slot = found.lock().unwrap();
                if slot.is_none() {
                    *slot = Some(path);
                }
                cancelled.store(true, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(SolverError::Timeout) => {
                timed_out.store(true, Ordering::Relaxed);
                cancelled.store(true, Ordering::Relaxed);
            }
            Err(_) => {
                cancelled.store(true, Ordering::Relaxed);
            }
        }
    });

    if timed_out.load(Ordering::Relaxed) && found.lock().unwrap().is_none() {
        return Err(SolverError::Timeout);
    }

    Ok(found.into_inner().unwrap())
}
