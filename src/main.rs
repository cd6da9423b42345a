use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::info;

use rubik_korf::error::SolverError;
use rubik_korf::pdb::store::PdbTable;
use rubik_korf::pdb::{build, PdbSet};
use rubik_korf::pdbkey;
use rubik_korf::scramble;
use rubik_korf::search::{self, SolverConfig};

const CORNER_FILE: &str = "corner.pdb";
const ALLEDGE_FILE: &str = "alledge.pdb";
const EDGESPLIT0_FILE: &str = "edgesplit0.pdb";
const EDGESPLIT1_FILE: &str = "edgesplit1.pdb";

/// The all-edge PDB's DFS construction is bounded to this many plies
/// (spec.md §4.4); beyond this the heuristic value is a loose lower bound,
/// not the exact distance.
const ALLEDGE_MAX_DEPTH: u8 = 9;

#[derive(Parser)]
#[command(name = "rubik-korf", about = "Optimal 3x3x3 Rubik's cube solver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build all four pattern databases and write them to `--out-dir`.
    BuildPdbs {
        #[arg(long, default_value = "pdbs")]
        out_dir: PathBuf,
    },
    /// Find an optimal move sequence for a scrambled cube.
    Solve {
        #[arg(long)]
        pdb_dir: PathBuf,
        #[arg(long, conflicts_with = "face_ids")]
        scramble: Option<PathBuf>,
        #[arg(long, conflicts_with = "scramble")]
        face_ids: Option<String>,
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long, default_value_t = 20)]
        max_depth: u8,
        #[arg(long)]
        timeout: Option<u64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::BuildPdbs { out_dir } => build_pdbs(&out_dir),
        Command::Solve {
            pdb_dir,
            scramble,
            face_ids,
            threads,
            max_depth,
            timeout,
        } => run_solve(&pdb_dir, scramble.as_deref(), face_ids.as_deref(), threads, max_depth, timeout),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn build_pdbs(out_dir: &Path) -> Result<(), SolverError> {
    fs::create_dir_all(out_dir)?;

    info!("building corner PDB ({} keys)", pdbkey::N_CORNER_KEYS);
    let corner = build::build_bfs(pdbkey::N_CORNER_KEYS, pdbkey::key_corners, None);
    PdbTable::save(&out_dir.join(CORNER_FILE), &corner)?;

    info!("building all-edge PDB ({} keys, depth {ALLEDGE_MAX_DEPTH} cutoff)", pdbkey::N_ALLEDGE_KEYS);
    let alledge = build::build_dfs_bounded(pdbkey::N_ALLEDGE_KEYS, pdbkey::key_alledges, ALLEDGE_MAX_DEPTH);
    PdbTable::save(&out_dir.join(ALLEDGE_FILE), &alledge)?;

    info!("building edge-split PDB 0 ({} keys)", pdbkey::N_EDGESPLIT_KEYS);
    let edgesplit0 = build::build_bfs(pdbkey::N_EDGESPLIT_KEYS, |s| pdbkey::key_edgesplit(s, 0), None);
    PdbTable::save(&out_dir.join(EDGESPLIT0_FILE), &edgesplit0)?;

    info!("building edge-split PDB 1 ({} keys)", pdbkey::N_EDGESPLIT_KEYS);
    let edgesplit1 = build::build_bfs(pdbkey::N_EDGESPLIT_KEYS, |s| pdbkey::key_edgesplit(s, 1), None);
    PdbTable::save(&out_dir.join(EDGESPLIT1_FILE), &edgesplit1)?;

    info!("all pattern databases written to {}", out_dir.display());
    Ok(())
}

fn load_pdbs(pdb_dir: &Path) -> Result<PdbSet, SolverError> {
    Ok(PdbSet {
        corner: PdbTable::load(&pdb_dir.join(CORNER_FILE))?,
        alledge: PdbTable::load(&pdb_dir.join(ALLEDGE_FILE))?,
        edgesplit0: PdbTable::load(&pdb_dir.join(EDGESPLIT0_FILE))?,
        edgesplit1: PdbTable::load(&pdb_dir.join(EDGESPLIT1_FILE))?,
    })
}

fn run_solve(
    pdb_dir: &Path,
    scramble_file: Option<&Path>,
    face_ids: Option<&str>,
    threads: Option<usize>,
    max_depth: u8,
    timeout: Option<u64>,
) -> Result<(), SolverError> {
    let state = if let Some(path) = scramble_file {
        let text = fs::read_to_string(path)?;
        let colors: HashMap<String, u8> = text
            .lines()
            .filter_map(|line| {
                let (name, value) = line.split_once('=')?;
                let value: u8 = value.trim().parse().ok()?;
                Some((name.trim().to_string(), value))
            })
            .collect();
        scramble::parse_named(&colors)?
    } else if let Some(ids) = face_ids {
        scramble::parse_face_ids(ids)?
    } else {
        return Err(SolverError::MalformedScramble {
            cubie: "one of --scramble or --face-ids is required".into(),
        });
    };

    let pdbs = load_pdbs(pdb_dir)?;
    let config = SolverConfig {
        threads,
        max_depth,
        timeout: timeout.map(Duration::from_secs),
        ..SolverConfig::default()
    };

    let solution = search::solve(&state, &pdbs, &config)?;
    println!(
        "{} ({} moves)",
        solution.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" "),
        solution.len()
    );
    Ok(())
}
