//! # Hex Criticality Simulator
//!
//! Estimates, for every cell of a `(2s+1) x (2s+1)` Hex board, how many of
//! `n` random fills it decides the winner of. Progress goes to stderr, the
//! final count table to stdout as space-aligned columns.
//!
//! ## Usage
//! Run with `cargo run --release -- -n 1000 -s 3` for best performance.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use hexmc::{simulation, SimulationConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of trials to run per cell
    #[arg(short = 'n', long, default_value_t = 1000)]
    trials: u64,

    /// Half the size of the board (the side is 2s+1)
    #[arg(short = 's', long, default_value_t = 3)]
    half_board_size: usize,

    /// Number of worker threads (0 = one per logical CPU)
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,

    /// Seed for the random boards; runs with one thread and the same seed are reproducible
    #[arg(long)]
    seed: Option<u64>,

    /// Do not print the progress line
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    quiet: bool,
}

impl From<Args> for SimulationConfig {
    fn from(args: Args) -> Self {
        SimulationConfig {
            trials: args.trials,
            half_board_size: args.half_board_size,
            workers: args.threads,
            seed: args.seed,
            quiet: args.quiet,
        }
    }
}

fn main() -> ExitCode {
    let config = SimulationConfig::from(Args::parse());

    match config.startup_line() {
        Ok(line) => eprintln!("{}", line.bold()),
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return ExitCode::FAILURE;
        }
    }

    let table = match simulation::run(&config) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = table.render(&mut out).and_then(|()| out.flush()) {
        eprintln!("{} failed to write table: {}", "error:".red().bold(), err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
