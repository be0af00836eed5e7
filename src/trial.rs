//! # Trial Execution
//!
//! A trial asks whether one interior cell decides the game on one random
//! fill: the base board is copied twice, the cell is given to player 1 in one
//! copy and to player 2 in the other, and the cell is critical when the two
//! winners differ.

use crate::board::{Board, Player};
use crate::error::{SimulationError, Twin};
use crate::gale;

/// One unit of work: test interior cell `(x, y)` on a fresh random board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialTask {
    pub board_size: usize,
    pub x: usize,
    pub y: usize,
    /// Position of the task in the run; selects its random stream.
    pub sequence: u64,
}

/// What a trial found out about its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    pub x: usize,
    pub y: usize,
    pub critical: bool,
}

/// Scratch pair of boards for running trials without reallocating.
///
/// The first twin always gets the target cell forced to player 1, the second
/// to player 2. The base board handed in is never written to.
#[derive(Debug, Clone)]
pub struct TwinBoards {
    first: Board,
    second: Board,
}

impl TwinBoards {
    /// Allocates both twins for boards of interior size `size`.
    pub fn new(size: usize) -> Self {
        TwinBoards {
            first: Board::filled(size, Player::One),
            second: Board::filled(size, Player::Two),
        }
    }

    /// Interior size the twins were allocated for.
    pub fn size(&self) -> usize {
        self.first.size()
    }

    /// Copies `base` into both twins, forces cell `(x, y)` apart and reports
    /// whether that changed the winner.
    pub fn is_critical(&mut self, base: &Board, x: usize, y: usize) -> Result<bool, SimulationError> {
        self.first.copy_from(base)?;
        self.second.copy_from(base)?;

        self.first.set_interior(x, y, Player::One);
        self.second.set_interior(x, y, Player::Two);

        let v = gale::winner(&self.first).map_err(|source| SimulationError::Gale {
            twin: Twin::First,
            source,
        })?;
        let w = gale::winner(&self.second).map_err(|source| SimulationError::Gale {
            twin: Twin::Second,
            source,
        })?;
        Ok(v != w)
    }

    /// Runs `task` against `base`, resizing the twins first if needed.
    pub fn run(&mut self, base: &Board, task: TrialTask) -> Result<TrialOutcome, SimulationError> {
        if self.size() != base.size() {
            *self = TwinBoards::new(base.size());
        }
        let critical = self.is_critical(base, task.x, task.y)?;
        Ok(TrialOutcome {
            x: task.x,
            y: task.y,
            critical,
        })
    }
}

/// One-shot trial on a base board.
pub fn run_trial(base: &Board, task: TrialTask) -> Result<TrialOutcome, SimulationError> {
    TwinBoards::new(base.size()).run(base, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use rand_xoshiro::rand_core::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn task(board_size: usize, x: usize, y: usize) -> TrialTask {
        TrialTask {
            board_size,
            x,
            y,
            sequence: 0,
        }
    }

    #[test]
    fn test_single_cell_is_always_critical() {
        for base in [Board::filled(1, Player::One), Board::filled(1, Player::Two)] {
            let outcome = run_trial(&base, task(1, 0, 0)).unwrap();
            assert_eq!(outcome, TrialOutcome { x: 0, y: 0, critical: true });
        }
    }

    #[test]
    fn test_uniform_board_has_no_critical_cells() {
        let base = Board::filled(5, Player::One);
        for y in 0..5 {
            for x in 0..5 {
                assert!(!run_trial(&base, task(5, x, y)).unwrap().critical);
            }
        }
    }

    #[test]
    fn test_bridge_cell_is_critical() {
        // Column 1 is all player 1 except the middle; that cell decides it.
        let base = Board::from_interior(&[
            vec![2, 1, 2],
            vec![2, 2, 2],
            vec![2, 1, 2],
        ])
        .unwrap();
        assert!(run_trial(&base, task(3, 1, 1)).unwrap().critical);
        assert!(!run_trial(&base, task(3, 0, 0)).unwrap().critical);
    }

    #[test]
    fn test_base_board_is_untouched() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let base = Board::random(7, &mut rng);
        let snapshot = base.clone();
        let mut twins = TwinBoards::new(7);
        for y in 0..7 {
            for x in 0..7 {
                twins.run(&base, task(7, x, y)).unwrap();
            }
        }
        assert_eq!(base, snapshot);
    }

    #[test]
    fn test_critical_matches_winner_difference() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(19);
        for _ in 0..50 {
            let base = Board::random(5, &mut rng);
            for (x, y) in [(0, 0), (2, 2), (4, 1)] {
                let mut a = base.clone();
                let mut b = base.clone();
                a.set_interior(x, y, Player::One);
                b.set_interior(x, y, Player::Two);
                let differs = gale::winner(&a).unwrap() != gale::winner(&b).unwrap();
                assert_eq!(run_trial(&base, task(5, x, y)).unwrap().critical, differs);
            }
        }
    }

    #[test]
    fn test_twins_resize_for_new_board() {
        let mut twins = TwinBoards::new(3);
        let base = Board::filled(1, Player::Two);
        assert!(twins.run(&base, task(1, 0, 0)).unwrap().critical);
        assert_eq!(twins.size(), 1);
    }

    #[test]
    fn test_is_critical_rejects_wrong_shape() {
        let mut twins = TwinBoards::new(3);
        let base = Board::filled(4, Player::One);
        match twins.is_critical(&base, 0, 0) {
            Err(SimulationError::Board(BoardError::ShapeMismatch { expected: 3, found: 4 })) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
