//! # Progress Reporting
//!
//! Turns the stream of completion ticks into an overwritable status line
//! with a linear estimate of the time left.

use std::io::Write;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

/// A point-in-time view of how far the run has come.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub completed: u64,
    pub total: u64,
    pub elapsed: Duration,
    /// Linear extrapolation from the rate so far.
    pub remaining: Duration,
    pub percent: f64,
}

impl ProgressSnapshot {
    /// Snapshot after `completed` of `total` ticks took `elapsed`.
    pub fn at(completed: u64, total: u64, elapsed: Duration) -> Self {
        let remaining = if completed == 0 {
            Duration::ZERO
        } else {
            elapsed.mul_f64(total.saturating_sub(completed) as f64 / completed as f64)
        };
        let percent = if total == 0 {
            100.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        ProgressSnapshot {
            completed,
            total,
            elapsed,
            remaining,
            percent,
        }
    }
}

/// Drops sub-millisecond noise so durations print compactly.
fn round_millis(d: Duration) -> Duration {
    Duration::from_millis(d.as_millis() as u64)
}

/// Counts completion ticks and keeps a single status line up to date.
///
/// Purely observational: write errors are swallowed.
pub struct ProgressReporter<W: Write> {
    out: W,
    interval: u64,
    total: u64,
    completed: u64,
    start: Instant,
}

impl<W: Write> ProgressReporter<W> {
    /// Reports every `interval` ticks out of `total`.
    pub fn new(out: W, interval: u64, total: u64) -> Self {
        ProgressReporter {
            out,
            interval: interval.max(1),
            total,
            completed: 0,
            start: Instant::now(),
        }
    }

    /// Registers one finished task, returning a snapshot when one is due.
    pub fn tick(&mut self) -> Option<ProgressSnapshot> {
        self.completed += 1;
        if self.completed % self.interval != 0 {
            return None;
        }
        let snapshot = ProgressSnapshot::at(self.completed, self.total, self.start.elapsed());
        let _ = write!(
            self.out,
            "\rProgress: {}/{} ({:.0}%) {:>20}",
            snapshot.completed,
            snapshot.total,
            snapshot.percent,
            format!("{:?}", round_millis(snapshot.remaining))
        );
        let _ = self.out.flush();
        Some(snapshot)
    }

    /// Writes the closing summary and hands back the sink.
    pub fn finish(mut self) -> W {
        let _ = write!(
            self.out,
            "\rProgress: 100% {:50}\nSimulation finished in {:?}; generating output\n",
            "",
            round_millis(self.start.elapsed())
        );
        let _ = self.out.flush();
        self.out
    }

    /// Ends the status line without claiming completion.
    pub fn interrupt(mut self) -> W {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
        self.out
    }

    /// Consumes ticks until every sender is gone.
    pub fn drain(mut self, ticks: Receiver<()>) -> Self {
        for () in ticks {
            self.tick();
        }
        self
    }

    /// Ticks seen so far.
    pub fn completed(&self) -> u64 {
        self.completed
    }
}
