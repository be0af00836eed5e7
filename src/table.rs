//! # Critical Count Table
//!
//! The per-cell tally of critical trials, the loop that fills it from the
//! outcome stream and the column-aligned text it is printed as.

use std::io::{self, Write};

use crossbeam_channel::Receiver;

use crate::error::SimulationError;
use crate::trial::TrialOutcome;

/// Per-cell count of trials in which the cell was critical, indexed `[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalCountTable {
    counts: Vec<Vec<u64>>,
}

impl CriticalCountTable {
    /// An all-zero table for a `size x size` board.
    pub fn new(size: usize) -> Self {
        CriticalCountTable {
            counts: vec![vec![0; size]; size],
        }
    }

    /// Board side length; the table has this many rows and columns.
    pub fn size(&self) -> usize {
        self.counts.len()
    }

    /// Critical count of the cell in column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> u64 {
        self.counts[y][x]
    }

    /// Counts row by row, top to bottom.
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Folds one trial into the table.
    pub fn record(&mut self, outcome: &TrialOutcome) {
        if outcome.critical {
            self.counts[outcome.y][outcome.x] += 1;
        }
    }

    /// Sum over all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Writes the table as space-padded columns, one board row per line.
    ///
    /// Each column is as wide as its widest entry plus one space of padding;
    /// the last column is not padded.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let cells: Vec<Vec<String>> = self
            .counts
            .iter()
            .map(|row| row.iter().map(u64::to_string).collect())
            .collect();

        let mut widths = vec![0; self.size()];
        for row in &cells {
            for (col, cell) in row.iter().enumerate() {
                widths[col] = widths[col].max(cell.len());
            }
        }

        for row in &cells {
            let mut line = String::new();
            for (col, cell) in row.iter().enumerate() {
                if col + 1 == row.len() {
                    line.push_str(cell);
                } else {
                    line.push_str(&format!("{:<width$}", cell, width = widths[col] + 1));
                }
            }
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

/// Drains the outcome stream into a fresh table.
///
/// This loop is the only writer of the table. Once an error arrives, later
/// outcomes are still drained but no longer counted, and the first error is
/// returned when the stream closes.
pub fn aggregate(
    size: usize,
    outcomes: Receiver<Result<TrialOutcome, SimulationError>>,
) -> Result<CriticalCountTable, SimulationError> {
    let mut table = CriticalCountTable::new(size);
    let mut failure = None;

    for outcome in outcomes {
        match outcome {
            Ok(outcome) if failure.is_none() => table.record(&outcome),
            Ok(_) => {}
            Err(err) => {
                failure.get_or_insert(err);
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GaleError, Twin};
    use crossbeam_channel::unbounded;

    fn outcome(x: usize, y: usize, critical: bool) -> TrialOutcome {
        TrialOutcome { x, y, critical }
    }

    #[test]
    fn test_record_counts_only_critical() {
        let mut table = CriticalCountTable::new(3);
        table.record(&outcome(2, 0, true));
        table.record(&outcome(2, 0, true));
        table.record(&outcome(1, 1, false));
        assert_eq!(table.get(2, 0), 2);
        assert_eq!(table.get(1, 1), 0);
        assert_eq!(table.rows()[0], vec![0, 0, 2]);
        assert_eq!(table.total(), 2);
    }

    #[test]
    fn test_render_aligns_columns() {
        let mut table = CriticalCountTable::new(3);
        for _ in 0..120 {
            table.record(&outcome(0, 1, true));
        }
        for _ in 0..7 {
            table.record(&outcome(1, 2, true));
        }
        let mut out = Vec::new();
        table.render(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0   0 0\n120 0 0\n0   7 0\n"
        );
    }

    #[test]
    fn test_aggregate_from_many_producers() {
        let (tx, rx) = unbounded();
        let producers: Vec<_> = (0..4)
            .map(|_| {
                let tx = tx.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        tx.send(Ok(outcome(1, 0, true))).unwrap();
                        tx.send(Ok(outcome(0, 1, false))).unwrap();
                    }
                })
            })
            .collect();
        drop(tx);
        for producer in producers {
            producer.join().unwrap();
        }

        let table = aggregate(2, rx).unwrap();
        assert_eq!(table.get(1, 0), 1000);
        assert_eq!(table.get(0, 1), 0);
    }

    #[test]
    fn test_aggregate_returns_first_error() {
        let (tx, rx) = unbounded();
        tx.send(Ok(outcome(0, 0, true))).unwrap();
        tx.send(Err(SimulationError::Gale {
            twin: Twin::First,
            source: GaleError::StepLimit { steps: 9 },
        }))
        .unwrap();
        tx.send(Err(SimulationError::ThreadPanicked("worker"))).unwrap();
        drop(tx);

        match aggregate(1, rx) {
            Err(SimulationError::Gale { twin: Twin::First, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
