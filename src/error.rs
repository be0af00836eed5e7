use std::fmt;

/// Errors raised by board construction and copying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board shape mismatch: expected {expected}x{expected}, found {found}x{found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("interior is not square: row {row} has {len} cells, expected {expected}")]
    RaggedInterior {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("cell value {0} is not a player (expected 1 or 2)")]
    InvalidCell(i32),
}

/// Errors raised when the winner walk ends somewhere it never should.
///
/// Every variant signals a defect in the walk or a malformed board. None of
/// them are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GaleError {
    #[error("broken algorithm: walk exited at ({row}, {col}), not [* -1] or [0 *]")]
    UnexpectedExit { row: i32, col: i32 },

    #[error("broken algorithm: walk looked up ({row}, {col}) outside the bordered board")]
    OffBoard { row: i32, col: i32 },

    #[error("broken algorithm: walk did not leave the board after {steps} steps")]
    StepLimit { steps: usize },
}

/// Which of the two twin boards of a trial is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Twin {
    /// The copy with the target cell forced to player 1.
    First,
    /// The copy with the target cell forced to player 2.
    Second,
}

impl fmt::Display for Twin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Twin::First => write!(f, "board=1"),
            Twin::Second => write!(f, "board=2"),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that abort a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("error:{twin}: {source}")]
    Gale {
        twin: Twin,
        #[source]
        source: GaleError,
    },

    #[error("board error: {0}")]
    Board(#[from] BoardError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gale_error_display_names_twin() {
        let err = SimulationError::Gale {
            twin: Twin::Second,
            source: GaleError::UnexpectedExit { row: 5, col: 2 },
        };
        assert_eq!(
            err.to_string(),
            "error:board=2: broken algorithm: walk exited at (5, 2), not [* -1] or [0 *]"
        );
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = BoardError::ShapeMismatch {
            expected: 5,
            found: 9,
        };
        assert_eq!(err.to_string(), "board shape mismatch: expected 5x5, found 9x9");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: SimulationError = ConfigError::Validation("trials must be > 0".into()).into();
        assert_eq!(err.to_string(), "config validation error: trials must be > 0");
    }
}
