//! Command line front end: solve board files, generate new ones, or watch a
//! shuffled board get solved.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use log::{debug, info};
use rand::thread_rng;

use nxn_slider::generator::{random_board, solvable_board};
use nxn_slider::input::load_board;
use nxn_slider::{format_solution, Puzzle, SolveError, Solver, SolverConfig, TileSearch};

const UNSOLVABLE: &str = "The puzzle is unsolvable.";

/// Solves NxN sliding puzzles by reducing them to a 2x3 block.
#[derive(Debug, Parser)]
#[command(name = "nxn-slider", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a board file, print the moves and save them to the output directory.
    Solve {
        /// Comma-separated board, one row per line.
        file: PathBuf,

        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        #[command(flatten)]
        search: SearchOpts,

        /// Only write the output file.
        #[arg(short, long)]
        quiet: bool,
    },
    /// Write a new numbered board file.
    Generate {
        width: usize,

        /// Allow boards that cannot be solved.
        #[arg(long)]
        random: bool,

        #[arg(short, long, default_value = "input")]
        dir: PathBuf,
    },
    /// Shuffle a board, solve it and print every move.
    Demo {
        #[arg(default_value = "4")]
        width: usize,

        #[command(flatten)]
        search: SearchOpts,
    },
}

#[derive(Debug, clap::Args)]
struct SearchOpts {
    /// Route the blank along shortest walks instead of greedy ones.
    #[arg(long)]
    shortest_tile_paths: bool,

    /// Give up on the final 2x3 search after this many expansions.
    #[arg(long)]
    max_expansions: Option<usize>,
}

impl SearchOpts {
    fn config(&self) -> SolverConfig {
        SolverConfig {
            tile_search: if self.shortest_tile_paths {
                TileSearch::Shortest
            } else {
                TileSearch::Greedy
            },
            max_expansions: self.max_expansions,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    debug!("Command line options: {:?}", cli);

    if let Err(e) = run(cli.command) {
        eprintln!("{}", format!("error: {e}").red());
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Solve {
            file,
            output_dir,
            search,
            quiet,
        } => run_solve(&file, &output_dir, search.config(), quiet),
        Command::Generate { width, random, dir } => run_generate(width, random, &dir),
        Command::Demo { width, search } => run_demo(width, search.config()),
    }
}

fn run_solve(
    file: &Path,
    output_dir: &Path,
    config: SolverConfig,
    quiet: bool,
) -> Result<(), Box<dyn Error>> {
    let rows = load_board(file)?;
    let mut solver = Solver::new(config);

    let started = Instant::now();
    let report = match solver.solve(&rows) {
        Ok(solution) => {
            info!(
                "solved {} in {:?}: {} moves, {:?}",
                file.display(),
                started.elapsed(),
                solution.len(),
                solution.stats
            );
            format_solution(&solution)
        }
        Err(SolveError::Unsolvable) => format!("{UNSOLVABLE}\n"),
        Err(e) => return Err(e.into()),
    };

    if !quiet {
        print_report(&report);
    }

    fs::create_dir_all(output_dir)?;
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "board".to_string());
    let out = output_dir.join(format!("{stem}.out"));
    fs::write(&out, report)?;
    info!("wrote {}", out.display());
    Ok(())
}

fn run_generate(width: usize, random: bool, dir: &Path) -> Result<(), Box<dyn Error>> {
    if width < 2 {
        return Err(SolveError::InvalidBoard(format!("width must be at least 2, got {width}")).into());
    }

    let mut rng = thread_rng();
    let puzzle = if random {
        random_board(width, &mut rng)
    } else {
        solvable_board(width, &mut rng)
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.in", next_file_number(dir)?));
    let text: String = puzzle
        .rows()
        .iter()
        .map(|row| {
            let values: Vec<String> = row.iter().map(u32::to_string).collect();
            values.join(", ") + "\n"
        })
        .collect();
    fs::write(&path, text)?;

    let kind = if random { "random" } else { "solvable" };
    println!("Wrote a {kind} {width} x {width} board to {}", path.display());
    Ok(())
}

/// One past the highest `N.in` already in `dir`.
fn next_file_number(dir: &Path) -> std::io::Result<u32> {
    let mut highest = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "in") {
            if let Some(n) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
            {
                highest = highest.max(n);
            }
        }
    }
    Ok(highest + 1)
}

fn run_demo(width: usize, config: SolverConfig) -> Result<(), Box<dyn Error>> {
    if width < 2 {
        return Err(SolveError::InvalidBoard(format!("width must be at least 2, got {width}")).into());
    }

    println!("Initial Puzzle:\n{}", Puzzle::new(width));

    let puzzle = solvable_board(width, &mut thread_rng());
    println!("Shuffled Puzzle:\n{}", puzzle);

    let started = Instant::now();
    let solution = Solver::new(config).solve_puzzle(puzzle)?;
    println!(
        "{}",
        format!(
            "Found a solution with {} moves in {:?}",
            solution.len(),
            started.elapsed()
        )
        .green()
    );
    print_report(&format_solution(&solution));
    Ok(())
}

/// Prints a report with the per-move headings highlighted.
fn print_report(report: &str) {
    for line in report.lines() {
        if line.starts_with("Tile ") || line.starts_with("Initial") {
            println!("{}", line.to_string().bold());
        } else if line == UNSOLVABLE {
            println!("{}", line.to_string().red());
        } else {
            println!("{line}");
        }
    }
}
