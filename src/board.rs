//! # Hex Board Model
//!
//! A filled Hex board of interior size `n`, stored as an `(n+2) x (n+2)` grid.
//! The extra ring holds border stones that tell the winner walk who has to
//! connect what:
//!
//! ```text
//!             21111
//! a b c       2abc2
//! e f g ----> 2efg2
//! h i j       2hij2
//!             11112
//! ```
//!
//! Player 1 connects top to bottom, player 2 connects left to right.
//! Indexing is `[row][col]`, with row 0 at the top.

use std::fmt;

use rand_xoshiro::rand_core::RngCore;

use crate::error::BoardError;

/// The owner of a hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Player {
    /// Connects the top edge to the bottom edge.
    One = 1,
    /// Connects the left edge to the right edge.
    Two = 2,
}

impl Player {
    /// Numeric id of the player, 1 or 2.
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Maps a raw random value onto a player with a fair coin.
    fn from_coin(value: u64) -> Self {
        if value % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }
}

impl TryFrom<i32> for Player {
    type Error = BoardError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(BoardError::InvalidCell(other)),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A fully filled board with its border stones in place.
///
/// Every copy owns its own rows; cloning deep-copies the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Vec<Player>>,
    size: usize,
}

impl Board {
    /// Builds a bordered board, asking `fill` for each interior cell in
    /// row-major order.
    fn bordered<F>(size: usize, mut fill: F) -> Self
    where
        F: FnMut(usize, usize) -> Player,
    {
        let dim = size + 2;
        let mut cells = Vec::with_capacity(dim);

        // First row of stones: 2 in the corner, 1 elsewhere.
        let mut top = vec![Player::One; dim];
        top[0] = Player::Two;
        cells.push(top);

        for row in 0..size {
            let mut line = Vec::with_capacity(dim);
            line.push(Player::Two);
            for col in 0..size {
                line.push(fill(row, col));
            }
            line.push(Player::Two);
            cells.push(line);
        }

        // Last row of stones: 1 everywhere except 2 in the far corner.
        let mut bottom = vec![Player::One; dim];
        bottom[dim - 1] = Player::Two;
        cells.push(bottom);

        Board { cells, size }
    }

    /// Produces a board by tossing a fair coin for each interior cell.
    ///
    /// The generator is borrowed mutably, so each thread has to bring its own.
    pub fn random<R: RngCore>(size: usize, rng: &mut R) -> Self {
        Self::bordered(size, |_, _| Player::from_coin(rng.next_u64()))
    }

    /// A board whose whole interior belongs to `player`.
    pub fn filled(size: usize, player: Player) -> Self {
        Self::bordered(size, |_, _| player)
    }

    /// Wraps an `n x n` interior of raw player ids (1 or 2) in border stones.
    pub fn from_interior(rows: &[Vec<i32>]) -> Result<Self, BoardError> {
        let size = rows.len();
        let mut interior = Vec::with_capacity(size * size);
        for (row, line) in rows.iter().enumerate() {
            if line.len() != size {
                return Err(BoardError::RaggedInterior {
                    row,
                    len: line.len(),
                    expected: size,
                });
            }
            for &value in line {
                interior.push(Player::try_from(value)?);
            }
        }
        Ok(Self::bordered(size, |row, col| interior[row * size + col]))
    }

    /// Interior side length `n`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length including the border, `n + 2`.
    pub fn dimension(&self) -> usize {
        self.size + 2
    }

    /// Cell at bordered coordinates.
    pub fn get(&self, row: usize, col: usize) -> Player {
        self.cells[row][col]
    }

    /// Cell at signed lattice coordinates, or `None` off the bordered grid.
    pub fn lattice(&self, row: i32, col: i32) -> Option<Player> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        self.cells.get(row)?.get(col).copied()
    }

    /// Interior cell at 0-based `(x, y)`, where `x` is the column.
    pub fn interior(&self, x: usize, y: usize) -> Player {
        self.cells[y + 1][x + 1]
    }

    /// Assigns interior cell `(x, y)` to `player`.
    pub fn set_interior(&mut self, x: usize, y: usize, player: Player) {
        self.cells[y + 1][x + 1] = player;
    }

    /// Overwrites this board with the contents of `src`, reusing storage.
    pub fn copy_from(&mut self, src: &Board) -> Result<(), BoardError> {
        if src.size != self.size {
            return Err(BoardError::ShapeMismatch {
                expected: self.size,
                found: src.size,
            });
        }
        for (dst, line) in self.cells.iter_mut().zip(&src.cells) {
            dst.copy_from_slice(line);
        }
        Ok(())
    }

    /// Rows of the bordered grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Player]> {
        self.cells.iter().map(Vec::as_slice)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.cells {
            let row: Vec<String> = line.iter().map(Player::to_string).collect();
            writeln!(f, "{}", row.join("  "))?;
        }
        Ok(())
    }
}
