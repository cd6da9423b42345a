//! Error types for the solver, its PDB pipeline and its external I/O surface.
//!
//! Every row of the error table in the spec gets one variant here. `Cancelled`
//! is intentionally not a variant: a worker observing the cancellation flag
//! just stops and returns `None`, it never surfaces as an error (see
//! `parallel::root_split_search`).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("malformed scramble: {cubie}")]
    MalformedScramble { cubie: String },

    #[error("unreachable cube state: {reason}")]
    UnreachableState { reason: String },

    #[error("pattern database missing: {}", path.display())]
    PdbMissing { path: PathBuf },

    #[error("pattern database corrupt at {}: {reason}", path.display())]
    PdbCorrupt { path: PathBuf, reason: String },

    /// IDA* exhausted the move-count bound (20, God's number) without finding
    /// a goal. This is only reachable on a bug (every reachable state has a
    /// solution of length <= 20), never on valid input.
    #[error("search exhausted the maximum depth without a solution (internal invariant violated)")]
    SearchExhausted,

    #[error("search exceeded its configured time budget")]
    Timeout,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDB (de)serialization error: {0}")]
    Encoding(#[from] Box<bincode::ErrorKind>),
}
