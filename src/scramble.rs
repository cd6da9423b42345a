//! Turns external scramble descriptions into a `RubikState`: either the
//! literal 48 face-ids, or a color-triple dictionary keyed by sticker slot
//! name (spec.md §6), the way `original_source/convert_facechar2int.py`
//! names sticker positions.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::cube::{RubikState, SOLVED};
use crate::error::SolverError;

/// Parses the `--face-ids "n,n,...,n"` CLI form: 48 comma-separated face-id
/// integers in the same array order as `cube::SOLVED`.
pub fn parse_face_ids(s: &str) -> Result<RubikState, SolverError> {
    let mut values = [0u8; 48];
    let mut count = 0;
    for (i, tok) in s.split(',').enumerate() {
        if i >= 48 {
            return Err(SolverError::MalformedScramble {
                cubie: "more than 48 face-ids given".into(),
            });
        }
        let v: u8 = tok.trim().parse().map_err(|_| SolverError::MalformedScramble {
            cubie: format!("face-id {i} ({tok:?}) is not an integer"),
        })?;
        values[i] = v;
        count += 1;
    }
    if count != 48 {
        return Err(SolverError::MalformedScramble {
            cubie: format!("expected 48 face-ids, got {count}"),
        });
    }
    let state = RubikState(values);
    validate_parity(&state)?;
    Ok(state)
}

/// Validates that `state` has the right multiset of cubie ids (8 corners
/// each appearing on exactly 3 stickers, 12 edges each on exactly 2) and
/// that corner/edge orientation sums are consistent with a reachable cube
/// (spec.md §3's orientation-parity invariant).
///
/// Orientation is summed over exactly one designated sticker per cubie
/// (`pdbkey::CORNER_FACES`/`EDGE_FACES`), not over every sticker of a cubie:
/// a corner's three stickers always carry the label set `{0,1,2}` between
/// them no matter where the cubie sits, so summing all three would always
/// total 3 and never actually catch an invalid orientation.
fn validate_parity(state: &RubikState) -> Result<(), SolverError> {
    let mut corner_count = [0u8; 8];
    let mut edge_count = [0u8; 12];

    for &faceid in state.0.iter() {
        let cubie = (faceid >> 2) as usize;
        if cubie < 8 {
            corner_count[cubie] += 1;
        } else if cubie < 20 {
            edge_count[cubie - 8] += 1;
        } else {
            return Err(SolverError::UnreachableState {
                reason: format!("face-id {faceid} names a nonexistent cubie {cubie}"),
            });
        }
    }

    if corner_count.iter().any(|&c| c != 3) {
        return Err(SolverError::UnreachableState {
            reason: "each corner cubie must appear on exactly 3 stickers".into(),
        });
    }
    if edge_count.iter().any(|&c| c != 2) {
        return Err(SolverError::UnreachableState {
            reason: "each edge cubie must appear on exactly 2 stickers".into(),
        });
    }

    let corner_orient_sum: u32 = crate::pdbkey::CORNER_FACES
        .iter()
        .map(|&slot| (state.0[slot] & 3) as u32)
        .sum();
    let edge_orient_sum: u32 = crate::pdbkey::EDGE_FACES
        .iter()
        .map(|&slot| (state.0[slot] & 1) as u32)
        .sum();

    if corner_orient_sum % 3 != 0 {
        return Err(SolverError::UnreachableState {
            reason: "corner orientation sum is not a multiple of 3".into(),
        });
    }
    if edge_orient_sum % 2 != 0 {
        return Err(SolverError::UnreachableState {
            reason: "edge orientation sum is not a multiple of 2".into(),
        });
    }
    Ok(())
}

/// Slot name -> solved face-id value, verbatim from
/// `original_source/convert_facechar2int.py`'s `facename_faceid_dict`.
const SLOT_FACEID: &[(&str, u8)] = &[
    ("01my", 30), ("01mz", 28), ("01mx", 29), ("02my", 73), ("02mz", 72),
    ("03my", 25), ("03px", 26), ("03mz", 24), ("04mx", 77), ("04mz", 76),
    ("06px", 69), ("06mz", 68), ("07mx", 18), ("07py", 17), ("07mz", 16),
    ("08py", 65), ("08mz", 64), ("09px", 21), ("09py", 22), ("09mz", 20),
    ("10mx", 60), ("10my", 61), ("12px", 56), ("12my", 57), ("16mx", 48),
    ("16py", 49), ("18px", 52), ("18py", 53), ("19mx", 14), ("19my", 13),
    ("19pz", 12), ("20my", 41), ("20pz", 40), ("21px", 9), ("21my", 10),
    ("21pz", 8), ("22mx", 45), ("22pz", 44), ("24px", 37), ("24pz", 36),
    ("25mx", 1), ("25py", 2), ("25pz", 0), ("26py", 33), ("26pz", 32),
    ("27px", 6), ("27py", 5), ("27pz", 4),
];

/// Solved color at each slot, verbatim from `facename_facecolors_dict`.
const SLOT_COLOR: &[(&str, u8)] = &[
    ("01my", 5), ("01mz", 6), ("01mx", 4), ("02my", 5), ("02mz", 6),
    ("03my", 5), ("03px", 2), ("03mz", 6), ("04mx", 4), ("04mz", 6),
    ("06px", 2), ("06mz", 6), ("07mx", 4), ("07py", 3), ("07mz", 6),
    ("08py", 3), ("08mz", 6), ("09px", 2), ("09py", 3), ("09mz", 6),
    ("10mx", 4), ("10my", 5), ("12px", 2), ("12my", 5), ("16mx", 4),
    ("16py", 3), ("18px", 2), ("18py", 3), ("19mx", 4), ("19my", 5),
    ("19pz", 1), ("20my", 5), ("20pz", 1), ("21px", 2), ("21my", 5),
    ("21pz", 1), ("22mx", 4), ("22pz", 1), ("24px", 2), ("24pz", 1),
    ("25mx", 4), ("25py", 3), ("25pz", 1), ("26py", 3), ("26pz", 1),
    ("27px", 2), ("27py", 3), ("27pz", 1),
];

/// The 8 corners' home slot names, in a fixed rotational order around each
/// cubie, verbatim from `corner_list_names`.
const CORNER_GROUPS: [[&str; 3]; 8] = [
    ["01my", "01mz", "01mx"],
    ["03my", "03px", "03mz"],
    ["07mx", "07py", "07mz"],
    ["09px", "09py", "09mz"],
    ["19mx", "19my", "19pz"],
    ["21px", "21my", "21pz"],
    ["25mx", "25py", "25pz"],
    ["27px", "27py", "27pz"],
];

/// The 12 edges' home slot names, verbatim from `edge_list_names`.
const EDGE_GROUPS: [[&str; 2]; 12] = [
    ["02my", "02mz"],
    ["04mx", "04mz"],
    ["06px", "06mz"],
    ["08py", "08mz"],
    ["10mx", "10my"],
    ["12px", "12my"],
    ["16mx", "16py"],
    ["18px", "18py"],
    ["20my", "20pz"],
    ["22mx", "22pz"],
    ["24px", "24pz"],
    ["26py", "26pz"],
];

fn slot_faceid(name: &str) -> u8 {
    SLOT_FACEID
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
        .unwrap_or_else(|| panic!("unknown sticker slot {name:?}"))
}

fn slot_color(name: &str) -> u8 {
    SLOT_COLOR
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
        .unwrap_or_else(|| panic!("unknown sticker slot {name:?}"))
}

/// Array index (0..48) of a slot, found by locating its solved face-id in
/// `cube::SOLVED`. Cached since it's the same lookup for every parse call.
fn slot_array_index(name: &str) -> usize {
    static CACHE: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| {
        SLOT_FACEID
            .iter()
            .map(|(name, faceid)| {
                let idx = SOLVED.iter().position(|v| v == faceid).unwrap_or_else(|| {
                    panic!("slot {name:?}'s face-id {faceid} is not in the solved array")
                });
                (*name, idx)
            })
            .collect()
    });
    cache[name]
}

/// Parses a scramble given as a map from sticker slot name (e.g. `"19pz"`)
/// to the color code observed there (spec.md §6). Identifies each physical
/// cubie by the multiset of colors on its faces, matching it against the
/// solved cubie with the same multiset, then reads orientation off which
/// rotation of the solved color order the observed colors form.
pub fn parse_named(colors: &HashMap<String, u8>) -> Result<RubikState, SolverError> {
    let mut state = [0u8; 48];

    for group in CORNER_GROUPS.iter() {
        place_corner(group, colors, &mut state)?;
    }
    for group in EDGE_GROUPS.iter() {
        place_edge(group, colors, &mut state)?;
    }

    let result = RubikState(state);
    validate_parity(&result)?;
    Ok(result)
}

fn observed_color(name: &str, colors: &HashMap<String, u8>) -> Result<u8, SolverError> {
    colors.get(name).copied().ok_or_else(|| SolverError::MalformedScramble {
        cubie: format!("missing color for slot {name:?}"),
    })
}

fn place_corner(
    position: &[&str; 3],
    colors: &HashMap<String, u8>,
    out: &mut [u8; 48],
) -> Result<(), SolverError> {
    let observed = [
        observed_color(position[0], colors)?,
        observed_color(position[1], colors)?,
        observed_color(position[2], colors)?,
    ];

    let (home, rotation) = CORNER_GROUPS
        .iter()
        .find_map(|home| {
            let home_colors = [slot_color(home[0]), slot_color(home[1]), slot_color(home[2])];
            (0..3).find_map(|r| {
                let rotated = [home_colors[r], home_colors[(r + 1) % 3], home_colors[(r + 2) % 3]];
                (rotated == observed).then_some((home, r))
            })
        })
        .ok_or_else(|| SolverError::MalformedScramble {
            cubie: format!("no corner cubie matches colors {observed:?} at {position:?}"),
        })?;

    // `home`'s own solved face-ids carry the real packed cubie id (shared by
    // all 3 slots) and that slot's individual orientation — not the group's
    // enumeration index, and not one face-id shared across all 3 slots.
    let home_faceids = [
        SOLVED[slot_array_index(home[0])],
        SOLVED[slot_array_index(home[1])],
        SOLVED[slot_array_index(home[2])],
    ];
    let cubie_id = home_faceids[0] >> 2;
    for (k, slot) in position.iter().enumerate() {
        let orient = home_faceids[(rotation + k) % 3] & 3;
        out[slot_array_index(slot)] = (cubie_id << 2) | orient;
    }
    Ok(())
}

fn place_edge(
    position: &[&str; 2],
    colors: &HashMap<String, u8>,
    out: &mut [u8; 48],
) -> Result<(), SolverError> {
    let observed = [observed_color(position[0], colors)?, observed_color(position[1], colors)?];

    let (home, rotation) = EDGE_GROUPS
        .iter()
        .find_map(|home| {
            let home_colors = [slot_color(home[0]), slot_color(home[1])];
            (0..2).find_map(|r| {
                let rotated = [home_colors[r], home_colors[(r + 1) % 2]];
                (rotated == observed).then_some((home, r))
            })
        })
        .ok_or_else(|| SolverError::MalformedScramble {
            cubie: format!("no edge cubie matches colors {observed:?} at {position:?}"),
        })?;

    let home_faceids = [SOLVED[slot_array_index(home[0])], SOLVED[slot_array_index(home[1])]];
    let cubie_id = home_faceids[0] >> 2;
    for (k, slot) in position.iter().enumerate() {
        let orient = home_faceids[(rotation + k) % 2] & 1;
        out[slot_array_index(slot)] = (cubie_id << 2) | orient;
    }
    Ok(())
}
