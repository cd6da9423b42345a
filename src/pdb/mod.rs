//! The four pattern databases and their combined heuristic.

pub mod build;
pub mod store;

use crate::cube::RubikState;
use crate::idasearch::Heuristic;
use crate::pdbkey;
use store::PdbTable;

/// The four PDBs bundled together, admissibly combined by taking the max.
pub struct PdbSet {
    pub corner: PdbTable,
    pub alledge: PdbTable,
    pub edgesplit0: PdbTable,
    pub edgesplit1: PdbTable,
}

impl PdbSet {
    pub fn heuristic(&self, state: &RubikState) -> u8 {
        let hc = self.corner.get(pdbkey::key_corners(state));
        let he = self.alledge.get(pdbkey::key_alledges(state));
        let h0 = self.edgesplit0.get(pdbkey::key_edgesplit(state, 0));
        let h1 = self.edgesplit1.get(pdbkey::key_edgesplit(state, 1));
        hc.max(he).max(h0).max(h1)
    }
}

impl Heuristic<RubikState> for PdbSet {
    fn estimated_remaining_cost(&self, t: &RubikState) -> usize {
        self.heuristic(t) as usize
    }
}
