//! On-disk format and in-memory representation of one pattern database.
//!
//! A PDB is a dense array of one byte per key: the exact distance to the
//! solved projection, clamped at the builder's depth cutoff. On disk it is a
//! `bincode`-serialized `{len, data}` wrapped in gzip (`flate2`), mirroring
//! `geodic-kociemba`'s own bincode+serde table persistence. An uncompressed
//! sibling file can instead be opened read-only and memory-mapped
//! (`memmap2`), for the scale where decoding the whole array into RAM up
//! front isn't desirable.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::SolverError;

#[derive(Serialize, Deserialize)]
struct PdbFile {
    len: u64,
    data: Vec<u8>,
}

pub enum PdbBacking {
    Owned(Vec<u8>),
    Mapped(memmap2::Mmap),
}

pub struct PdbTable {
    backing: PdbBacking,
}

impl PdbTable {
    pub fn from_vec(data: Vec<u8>) -> Self {
        PdbTable {
            backing: PdbBacking::Owned(data),
        }
    }

    #[inline]
    pub fn get(&self, key: u64) -> u8 {
        match &self.backing {
            PdbBacking::Owned(v) => v[key as usize],
            PdbBacking::Mapped(m) => m[key as usize],
        }
    }

    pub fn len(&self) -> usize {
        match &self.backing {
            PdbBacking::Owned(v) => v.len(),
            PdbBacking::Mapped(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes `depths` to `path` as a gzip-wrapped bincode container.
    pub fn save(path: &Path, depths: &[u8]) -> Result<(), SolverError> {
        let payload = PdbFile {
            len: depths.len() as u64,
            data: depths.to_vec(),
        };
        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        bincode::serialize_into(&mut encoder, &payload)?;
        encoder.finish()?;
        Ok(())
    }

    /// Reads a gzip-wrapped bincode container fully into memory, resetting
    /// the solved-state entry (key 0) to 0 — the builder always sets this
    /// itself, but a table regenerated by some other means might instead
    /// carry the sentinel there, which would make the solved state look
    /// artificially far away.
    pub fn load(path: &Path) -> Result<Self, SolverError> {
        let file = File::open(path).map_err(|_| SolverError::PdbMissing {
            path: path.to_path_buf(),
        })?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let mut payload: PdbFile =
            bincode::deserialize_from(decoder).map_err(|e| SolverError::PdbCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if payload.data.len() as u64 != payload.len {
            return Err(SolverError::PdbCorrupt {
                path: path.to_path_buf(),
                reason: format!(
                    "length mismatch: header says {}, got {}",
                    payload.len,
                    payload.data.len()
                ),
            });
        }
        if let Some(first) = payload.data.first_mut() {
            *first = 0;
        }
        Ok(PdbTable::from_vec(payload.data))
    }

    /// Opens a plain, uncompressed dense-byte-array file and memory-maps it
    /// read-only, for production-scale tables where decompressing into RAM
    /// up front is undesirable. The file has no header: byte `k` is the
    /// depth for PDB key `k`.
    pub fn open_mmap(path: &Path) -> Result<Self, SolverError> {
        let file = File::open(path).map_err(|_| SolverError::PdbMissing {
            path: path.to_path_buf(),
        })?;
        // SAFETY: the mapped file is read-only for the table's lifetime; the
        // usual mmap caveat (the file must not be concurrently truncated by
        // another process) applies, as with any memory-mapped PDB.
        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(SolverError::Io)?;
        Ok(PdbTable {
            backing: PdbBacking::Mapped(mmap),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn round_trips_through_disk() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("rubik-korf-test-pdb-{}.bin", std::process::id()));
        let depths: Vec<u8> = (0u8..=20).cycle().take(1000).collect();
        PdbTable::save(&path, &depths).unwrap();
        let table = PdbTable::load(&path).unwrap();
        assert_eq!(table.len(), depths.len());
        for (i, &d) in depths.iter().enumerate().skip(1) {
            assert_eq!(table.get(i as u64), d);
        }
        assert_eq!(table.get(0), 0); // sentinel reset regardless of source depths[0]
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_pdb_missing() {
        let path = Path::new("/nonexistent/rubik-korf-pdb.bin");
        match PdbTable::load(path) {
            Err(SolverError::PdbMissing { .. }) => {}
            other => panic!("expected PdbMissing, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_file_is_pdb_corrupt() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("rubik-korf-test-corrupt-{}.bin", std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(b"not a valid gzip stream").unwrap();
        match PdbTable::load(&path) {
            Err(SolverError::PdbCorrupt { .. }) => {}
            other => panic!("expected PdbCorrupt, got {other:?}"),
        }
        std::fs::remove_file(&path).unwrap();
    }
}
