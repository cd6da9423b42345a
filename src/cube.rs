//! Cube state, the 18 quarter/half-turn moves, and the transition table that
//! applies them.
//!
//! A state is 48 face-ids, one per visible sticker, each packing
//! `(cubie_id << 2) | orientation` exactly as the reference program's
//! `facecodeints` does. Cubies 0..8 are corners (orientation 0..3, only 0..3
//! used — 2 bits reserved, 0..3 valid values), 8..20 are edges (orientation
//! 0 or 1). Applying a move is a single gather over a fixed 48-entry
//! permutation row — no branching, no allocation.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use enum_iterator::Sequence;

/// The solved position, reproduced verbatim from the reference program's
/// `facecodeints` (itself derived from `c0N`/`e0N` cubie ids packed as
/// `(cubie_id << 2) | orientation`).
pub const SOLVED: [u8; 48] = [
    2, 49, 17, 65, 22, 53, 5, 33, 6, 52, 21, 69, 26, 56, 9, 37, 10, 57, 25, 73, 30, 61, 13, 41,
    14, 60, 29, 77, 18, 48, 1, 45, 4, 36, 8, 40, 12, 44, 0, 32, 16, 76, 28, 72, 24, 68, 20, 64,
];

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RubikState(pub [u8; 48]);

impl RubikState {
    pub fn solved() -> Self {
        RubikState(SOLVED)
    }

    pub fn is_solved(&self) -> bool {
        self.0 == SOLVED
    }

    /// Returns the state obtained by turning `m`. No mutation: a fresh array
    /// is gathered from `self` through the transition row for `m`.
    pub fn apply(&self, m: Move) -> Self {
        let row = &transition_table()[m as usize];
        let mut out = [0u8; 48];
        for (dst, &src) in out.iter_mut().zip(row.iter()) {
            *dst = self.0[src];
        }
        RubikState(out)
    }

    pub fn apply_all(&self, moves: &[Move]) -> Self {
        let mut cur = *self;
        for &m in moves {
            cur = cur.apply(m);
        }
        cur
    }
}

/// The 18 quarter/half turns, grouped in threes per face in the order
/// D, U, R, L, F, B — D's three moves are indices 0..3, U's are 3..6, and so
/// on. This is also the numbering the PDB redundant-move table and the
/// transition table are built against.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Sequence)]
#[repr(u8)]
pub enum Move {
    D = 0,
    Dp,
    D2,
    U,
    Up,
    U2,
    R,
    Rp,
    R2,
    L,
    Lp,
    L2,
    F,
    Fp,
    F2,
    B,
    Bp,
    B2,
}

impl Move {
    /// Which of the 6 faces (0=D, 1=U, 2=R, 3=L, 4=F, 5=B) this move turns.
    pub fn face(self) -> u8 {
        self as u8 / 3
    }

    /// The move that undoes this one: quarter turns swap with their
    /// opposite-direction sibling, half turns are self-inverse.
    pub fn reverse(self) -> Move {
        let base = (self as u8 / 3) * 3;
        let amount = self as u8 % 3;
        let inv_amount = match amount {
            0 => 1,
            1 => 0,
            2 => 2,
            _ => unreachable!(),
        };
        Move::try_from(base + inv_amount).unwrap()
    }
}

impl TryFrom<u8> for Move {
    type Error = ();

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        enum_iterator::all::<Move>().nth(v as usize).ok_or(())
    }
}

const FACE_LETTERS: [char; 6] = ['D', 'U', 'R', 'L', 'F', 'B'];

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let face = self.face() as usize;
        let amount = *self as u8 % 3;
        let suffix = match amount {
            0 => "",
            1 => "'",
            2 => "2",
            _ => unreachable!(),
        };
        write!(f, "{}{}", FACE_LETTERS[face], suffix)
    }
}

impl FromStr for Move {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face_char = chars.next().ok_or(())?;
        let face = FACE_LETTERS.iter().position(|&c| c == face_char).ok_or(())? as u8;
        let amount = match chars.as_str() {
            "" => 0,
            "'" => 1,
            "2" => 2,
            _ => return Err(()),
        };
        Move::try_from(face * 3 + amount)
    }
}

/// Same-face-twice or known-commuting opposite-face-pair pruning (spec.md
/// §4.6): a move is redundant right after `last` if it turns the same face
/// again (any two same-face turns fold into one), or if it turns the "lower"
/// face of a commuting opposite pair (D/U, R/L, F/B) right after the
/// "higher" one already turned the other side (only one canonical order of
/// the pair is ever explored).
///
/// This is a strictly cleaner version of the source script's own
/// `ignore_moves` table, which left a handful of same-face continuations
/// unpruned (e.g. a half turn right after a quarter turn of the same face) —
/// see DESIGN.md.
pub fn is_move_redundant(last: Option<Move>, next: Move) -> bool {
    let Some(last) = last else { return false };
    let lf = last.face();
    let nf = next.face();
    if lf == nf {
        return true;
    }
    matches!((lf, nf), (1, 0) | (3, 2) | (5, 4))
}

fn transition_table() -> &'static [[usize; 48]; 18] {
    static TABLE: OnceLock<[[usize; 48]; 18]> = OnceLock::new();
    TABLE.get_or_init(build_transition_table)
}

/// Face code used by `MOVE2FACE`/`FACE2SIDESEQ` below: 0=B, 1=R, 2=F, 3=L,
/// 4=U, 5=D. This is the reference program's own internal face numbering for
/// the 8-sticker blocks of the 48-array; it is unrelated to `Move::face`'s
/// D/U/R/L/F/B = 0..6 numbering, it just happens to produce the same
/// grouping of move indices into threes.
const MOVE2FACE: [usize; 18] = [5, 5, 5, 4, 4, 4, 1, 1, 1, 3, 3, 3, 2, 2, 2, 0, 0, 0];

/// Cyclic shift (mod 8) applied to the turned face's own 8 stickers, mirrors
/// the source's `roll_move`.
const MOVE2SHIFT: [i32; 18] = [2, -2, 4, -2, 2, 4, 2, -2, 4, -2, 2, 4, 2, -2, 4, -2, 2, 4];

/// For each of the 6 faces (in the B,R,F,L,U,D code above), the 12 adjacent
/// "side sticker" array indices, as 4 groups of 3 read in rotational order.
/// Verbatim from `original_source/rubik_cube_debugpath_roll.py`'s
/// `face2sideseq`.
const FACE2SIDESEQ: [[usize; 12]; 6] = [
    [8, 9, 10, 46, 47, 40, 28, 29, 30, 38, 39, 32],
    [4, 5, 6, 32, 33, 34, 16, 17, 18, 44, 45, 46],
    [12, 13, 14, 34, 35, 36, 24, 25, 26, 42, 43, 44],
    [0, 1, 2, 40, 41, 42, 20, 21, 22, 36, 37, 38],
    [0, 7, 6, 8, 15, 14, 16, 23, 22, 24, 31, 30],
    [2, 3, 4, 10, 11, 12, 18, 19, 20, 26, 27, 28],
];

/// Builds `T[18][48]`: `T[m][i]` is the source index that sticker `i` is
/// pulled from after move `m`. Derived mechanically from the reference
/// program's two-step move application (roll the turned face's own 8
/// stickers, rotate the 4 groups of adjacent side stickers) rather than
/// transcribed by hand.
fn build_transition_table() -> [[usize; 48]; 18] {
    let mut table = [[0usize; 48]; 18];
    for (m, row) in table.iter_mut().enumerate() {
        for (i, slot) in row.iter_mut().enumerate() {
            *slot = i;
        }
        let doface = MOVE2FACE[m];
        let shift = MOVE2SHIFT[m];
        let strt = doface * 8;
        for i in 0..8 {
            let src = (i as i32 - shift).rem_euclid(8) as usize;
            row[strt + i] = strt + src;
        }
        let seq = FACE2SIDESEQ[doface];
        // cw quarter (m%3==0) cycles groups by 1, ccw (m%3==1) by -1 (== 3
        // mod 4), half (m%3==2) by 2.
        let k = match m % 3 {
            0 => 1,
            1 => 3,
            2 => 2,
            _ => unreachable!(),
        };
        for g in 0..4 {
            let src_g = (g + k) % 4;
            for j in 0..3 {
                row[seq[g * 3 + j]] = seq[src_g * 3 + j];
            }
        }
    }
    table
}

impl crate::idasearch::Solvable for RubikState {
    type Move = Move;

    fn is_solved(&self) -> bool {
        RubikState::is_solved(self)
    }

    fn available_moves(&self) -> impl IntoIterator<Item = Move> {
        enum_iterator::all::<Move>()
    }

    fn is_redundant(last_move: Move, next_move: Move) -> bool {
        is_move_redundant(Some(last_move), next_move)
    }

    fn apply(&self, m: Move) -> Self {
        RubikState::apply(self, m)
    }

    /// God's number: every reachable position solves in at most 20 moves.
    fn max_fuel() -> usize {
        20
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_is_solved() {
        assert!(RubikState::solved().is_solved());
    }

    #[test]
    fn every_move_then_its_reverse_is_identity() {
        for m in enum_iterator::all::<Move>() {
            let s = RubikState::solved().apply(m).apply(m.reverse());
            assert!(s.is_solved(), "{m} then {m}' did not cancel");
        }
    }

    #[test]
    fn half_turns_are_self_inverse() {
        for face in 0..6u8 {
            let half = Move::try_from(face * 3 + 2).unwrap();
            assert_eq!(half.reverse(), half);
        }
    }

    #[test]
    fn four_quarter_turns_of_same_face_is_identity() {
        for m in [Move::D, Move::U, Move::R, Move::L, Move::F, Move::B] {
            let mut s = RubikState::solved();
            for _ in 0..4 {
                s = s.apply(m);
            }
            assert!(s.is_solved());
        }
    }

    #[test]
    fn transition_rows_are_permutations() {
        let table = transition_table();
        for row in table.iter() {
            let mut seen = [false; 48];
            for &src in row.iter() {
                assert!(!seen[src], "duplicate source index in row");
                seen[src] = true;
            }
        }
    }

    #[test]
    fn move_notation_round_trips() {
        for m in enum_iterator::all::<Move>() {
            let text = m.to_string();
            assert_eq!(text.parse::<Move>().unwrap(), m);
        }
    }

    #[test]
    fn every_move_changes_the_state() {
        for m in enum_iterator::all::<Move>() {
            assert!(!RubikState::solved().apply(m).is_solved());
        }
    }

    #[test]
    fn redundant_move_table_blocks_same_face() {
        assert!(is_move_redundant(Some(Move::D), Move::D2));
        assert!(is_move_redundant(Some(Move::D), Move::Dp));
        assert!(!is_move_redundant(Some(Move::D), Move::U));
    }

    #[test]
    fn redundant_move_table_blocks_canonical_opposite_order() {
        assert!(is_move_redundant(Some(Move::U), Move::D));
        assert!(!is_move_redundant(Some(Move::D), Move::U));
        assert!(is_move_redundant(Some(Move::L), Move::R));
        assert!(!is_move_redundant(Some(Move::R), Move::L));
        assert!(is_move_redundant(Some(Move::B), Move::F));
        assert!(!is_move_redundant(Some(Move::F), Move::B));
    }

    #[test]
    fn no_last_move_allows_everything() {
        for m in enum_iterator::all::<Move>() {
            assert!(!is_move_redundant(None, m));
        }
    }

    #[test]
    fn scramble_then_reversed_inverted_sequence_returns_to_solved() {
        let moves = [Move::U, Move::R2, Move::Fp, Move::D, Move::L, Move::B2, Move::Rp];
        let scrambled = RubikState::solved().apply_all(&moves);
        let undo: Vec<Move> = moves.iter().rev().map(|m| m.reverse()).collect();
        assert!(scrambled.apply_all(&undo).is_solved());
    }

    #[test]
    fn orientation_parity_is_preserved_under_any_scramble() {
        use crate::pdbkey::{CORNER_FACES, EDGE_FACES};

        let moves = [Move::U, Move::R, Move::F2, Move::Lp, Move::D2, Move::B];
        let s = RubikState::solved().apply_all(&moves);

        let corner_sum: u32 = CORNER_FACES.iter().map(|&slot| (s.0[slot] & 3) as u32).sum();
        let edge_sum: u32 = EDGE_FACES.iter().map(|&slot| (s.0[slot] & 1) as u32).sum();
        assert_eq!(corner_sum % 3, 0);
        assert_eq!(edge_sum % 2, 0);
    }
}
