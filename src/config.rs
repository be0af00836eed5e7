//! # Simulation Configuration
//!
//! Run parameters with the command line defaults, the sizes derived from
//! them and the checks that keep those derivations from overflowing.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ConfigError;

/// Everything a simulation run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Trials per cell.
    pub trials: u64,
    /// The board side is `2 * half_board_size + 1`.
    pub half_board_size: usize,
    /// Worker threads; 0 means one per logical CPU.
    pub workers: usize,
    /// Seed for the random boards; `None` picks one from the clock.
    pub seed: Option<u64>,
    /// Suppress the progress line.
    pub quiet: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials: 1000,
            half_board_size: 3,
            workers: 0,
            seed: None,
            quiet: false,
        }
    }
}

impl SimulationConfig {
    /// Side length of the board, `2 * half_board_size + 1`.
    ///
    /// Only meaningful once [`validate`](Self::validate) has passed.
    pub fn board_size(&self) -> usize {
        2 * self.half_board_size + 1
    }

    /// Total number of trials over all cells.
    pub fn total_trials(&self) -> u64 {
        let cells = self.board_size() as u64;
        self.trials * cells * cells
    }

    /// Worker count with 0 replaced by the number of logical CPUs.
    pub fn resolved_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }

    /// The configured seed, or one taken from the clock.
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0x9E37_79B9_7F4A_7C15)
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::Validation("trials must be > 0".into()));
        }
        let cells = self
            .half_board_size
            .checked_mul(2)
            .and_then(|n| n.checked_add(1))
            .map(|n| n as u64)
            .and_then(|n| n.checked_mul(n));
        match cells.and_then(|cells| cells.checked_mul(self.trials)) {
            Some(_) => Ok(()),
            None => Err(ConfigError::Validation(format!(
                "{} trials on a half board size of {} overflows the task count",
                self.trials, self.half_board_size
            ))),
        }
    }

    /// Validates the configuration and describes the run about to start.
    pub fn startup_line(&self) -> Result<String, ConfigError> {
        self.validate()?;
        let size = self.board_size();
        Ok(format!(
            "Simulating {}x{} with N={} trials",
            size, size, self.trials
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.board_size(), 7);
        assert_eq!(config.total_trials(), 49_000);
        assert!(config.validate().is_ok());
        assert!(config.resolved_workers() >= 1);
    }

    #[test]
    fn test_zero_half_size_is_single_cell() {
        let config = SimulationConfig {
            half_board_size: 0,
            trials: 100,
            ..Default::default()
        };
        assert_eq!(config.board_size(), 1);
        assert_eq!(config.total_trials(), 100);
    }

    #[test]
    fn test_rejects_zero_trials() {
        let config = SimulationConfig {
            trials: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Validation("trials must be > 0".into()))
        );
    }

    #[test]
    fn test_rejects_overflowing_task_count() {
        let config = SimulationConfig {
            trials: u64::MAX,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_startup_line() {
        assert_eq!(
            SimulationConfig::default().startup_line(),
            Ok("Simulating 7x7 with N=1000 trials".to_string())
        );
    }

    #[test]
    fn test_startup_line_rejects_huge_board_before_sizing() {
        let config = SimulationConfig {
            half_board_size: usize::MAX,
            ..Default::default()
        };
        assert!(config.startup_line().is_err());
    }

    #[test]
    fn test_explicit_seed_and_workers() {
        let config = SimulationConfig {
            workers: 3,
            seed: Some(42),
            ..Default::default()
        };
        assert_eq!(config.resolved_workers(), 3);
        assert_eq!(config.resolved_seed(), 42);
    }
}
