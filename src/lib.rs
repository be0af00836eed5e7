//! Monte Carlo estimates of how often each cell of a random Hex board is
//! critical, meaning that flipping its owner flips the winner.

pub mod board;
pub mod config;
pub mod error;
pub mod gale;
pub mod progress;
pub mod simulation;
pub mod table;
pub mod trial;

pub use board::{Board, Player};
pub use config::SimulationConfig;
pub use error::{BoardError, ConfigError, GaleError, SimulationError, Twin};
pub use simulation::run;
pub use table::CriticalCountTable;
pub use trial::{run_trial, TrialOutcome, TrialTask, TwinBoards};
