//! # Winner Walk
//!
//! Decides the winner of a filled, bordered board by walking the boundary
//! between the two players' regions (Gale's algorithm). The walk starts on the
//! edge between the top-left border stones and keeps player 2 on one hand and
//! player 1 on the other until it leaves the lattice. Leaving through the
//! bottom-left corner means player 1 connected; leaving through the top-right
//! corner means player 2 connected.
//!
//! ```text
//!            v0  (-1, 1)
//!           / |
//!          /  |
//! (0, 0) v1 - v2 (0, 1)
//!        |   /
//!        |  /
//!        v3  (1, 0)
//! ```

use std::ops::{Add, Sub};

use crate::board::{Board, Player};
use crate::error::GaleError;

/// A point of the hex lattice in signed `(row, col)` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vertex {
    pub row: i32,
    pub col: i32,
}

impl Vertex {
    /// The point at `(row, col)`.
    pub const fn new(row: i32, col: i32) -> Self {
        Vertex { row, col }
    }

    /// The point one more step along the direction `from -> self`.
    pub fn extend_from(self, from: Vertex) -> Vertex {
        self + (self - from)
    }
}

impl Add for Vertex {
    type Output = Vertex;

    fn add(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Vertex {
    type Output = Vertex;

    fn sub(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.row - rhs.row, self.col - rhs.col)
    }
}

/// The last four vertices of the walk.
///
/// `v[1]` and `v[2]` straddle the boundary edge just crossed, `v[3]` is the
/// vertex being probed and `v[0]` is where the walk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub v: [Vertex; 4],
}

impl Window {
    /// Where every walk begins: the top-left border corner.
    pub const START: Window = Window {
        v: [
            Vertex::new(-1, 1),
            Vertex::new(0, 0),
            Vertex::new(0, 1),
            Vertex::new(1, 0),
        ],
    };

    /// The vertex being probed.
    pub fn head(&self) -> Vertex {
        self.v[3]
    }

    /// Moves the window one triangle forward.
    ///
    /// If the head matches `v[2]` the walk turns left, if it matches `v[1]` it
    /// turns right. When it matches neither the window is returned unchanged.
    pub fn advance(self, board: &Board) -> Result<Window, GaleError> {
        let [v0, v1, v2, v3] = self.v;
        let head = owner(board, v3)?;

        let next = if head == owner(board, v2)? {
            Window {
                v: [v2, v1, v3, v1.extend_from(v0)],
            }
        } else if head == owner(board, v1)? {
            Window {
                v: [v1, v3, v2, v2.extend_from(v0)],
            }
        } else {
            self
        };
        Ok(next)
    }
}

/// Result of a completed walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    pub winner: Player,
    /// Triangles crossed before leaving the lattice.
    pub steps: usize,
}

fn owner(board: &Board, at: Vertex) -> Result<Player, GaleError> {
    board.lattice(at.row, at.col).ok_or(GaleError::OffBoard {
        row: at.row,
        col: at.col,
    })
}

fn in_bounds(at: Vertex, size: i32) -> bool {
    (-1..=size + 1).contains(&at.row) && (0..=size + 1).contains(&at.col)
}

/// Upper bound on the walk length; a boundary path never crosses an edge twice.
fn step_limit(size: usize) -> usize {
    let span = size + 4;
    3 * span * span
}

/// Walks the board and reports the winner along with the walk length.
pub fn trace(board: &Board) -> Result<Walk, GaleError> {
    let size = board.size() as i32;
    let limit = step_limit(board.size());
    let mut window = Window::START;
    let mut steps = 0;

    while in_bounds(window.head(), size) {
        if steps == limit {
            return Err(GaleError::StepLimit { steps });
        }
        window = window.advance(board)?;
        steps += 1;
    }

    let exit = window.head();
    let winner = if exit.col == -1 {
        Player::One
    } else if exit.row == 0 {
        Player::Two
    } else {
        return Err(GaleError::UnexpectedExit {
            row: exit.row,
            col: exit.col,
        });
    };
    Ok(Walk { winner, steps })
}

/// Given a filled board, returns the winner.
pub fn winner(board: &Board) -> Result<Player, GaleError> {
    trace(board).map(|walk| walk.winner)
}
