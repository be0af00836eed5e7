//! # Simulation Pipeline
//!
//! Fans trials out over a fixed worker pool and folds the results back in.
//!
//! The calling thread is the only task producer. It pushes one task per
//! `(cell, repetition)` into a bounded queue and blocks once the queue is
//! full. Each worker seeds its own generator from the run seed and the task's
//! sequence number, builds a fresh board per task and sends one outcome and
//! one tick. A dedicated thread drains each of the two streams. A completion
//! counter tells the producer when every task it handed out has been
//! processed; only then are the streams closed.
//!
//! Because the random stream belongs to the task rather than to the thread
//! that happens to pick it up, a fixed seed gives the same table for any
//! number of workers.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::ThreadPoolBuilder;

use crate::board::Board;
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::progress::ProgressReporter;
use crate::table::{aggregate, CriticalCountTable};
use crate::trial::{TrialOutcome, TrialTask, TwinBoards};

/// Counts tasks handed out but not yet processed.
#[derive(Default)]
pub struct CompletionCounter {
    pending: Mutex<u64>,
    drained: Condvar,
}

impl CompletionCounter {
    /// A counter with nothing outstanding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `n` more tasks that have to be processed.
    pub fn add(&self, n: u64) {
        *self.pending.lock() += n;
    }

    /// Marks one task as processed, waking waiters when none are left.
    pub fn done(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    /// Tasks still outstanding.
    pub fn pending(&self) -> u64 {
        *self.pending.lock()
    }

    /// Blocks until the count drops to zero.
    pub fn wait(&self) {
        let mut pending = self.pending.lock();
        while *pending != 0 {
            self.drained.wait(&mut pending);
        }
    }
}

/// Every task of a run: `trials` repetitions of each cell, row by row,
/// numbered from 0.
pub fn tasks(board_size: usize, trials: u64) -> impl Iterator<Item = TrialTask> {
    (0..board_size)
        .flat_map(move |y| (0..board_size).flat_map(move |x| (0..trials).map(move |_| (x, y))))
        .zip(0u64..)
        .map(move |((x, y), sequence)| TrialTask {
            board_size,
            x,
            y,
            sequence,
        })
}

/// The random stream of one task.
///
/// Multiplying by an odd constant is a bijection on `u64`, so distinct
/// sequence numbers never share a seed within a run.
pub fn task_stream(seed: u64, sequence: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed ^ sequence.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// The trial every worker runs in a real simulation, with its own scratch
/// twins.
fn twin_trial() -> impl FnMut(&Board, TrialTask) -> Result<TrialOutcome, SimulationError> + Send + 'static
{
    let mut scratch: Option<TwinBoards> = None;
    move |base: &Board, task: TrialTask| {
        scratch
            .get_or_insert_with(|| TwinBoards::new(task.board_size))
            .run(base, task)
    }
}

/// Per-thread state handed to a worker when it is spawned.
struct Worker<F> {
    tasks: Receiver<TrialTask>,
    outcomes: Sender<Result<TrialOutcome, SimulationError>>,
    ticks: Sender<()>,
    pending: Arc<CompletionCounter>,
    abort: Arc<AtomicBool>,
    seed: u64,
    trial: F,
}

impl<F> Worker<F>
where
    F: FnMut(&Board, TrialTask) -> Result<TrialOutcome, SimulationError>,
{
    fn run(mut self) {
        for task in self.tasks.iter() {
            // After a failure, tasks still in the queue are acknowledged but not run.
            if !self.abort.load(Ordering::Relaxed) {
                let mut rng = task_stream(self.seed, task.sequence);
                let base = Board::random(task.board_size, &mut rng);
                let result = (self.trial)(&base, task);
                if result.is_err() {
                    self.abort.store(true, Ordering::Relaxed);
                }
                let _ = self.outcomes.send(result);
                let _ = self.ticks.send(());
            }
            self.pending.done();
        }
    }
}

/// Runs a whole simulation, reporting progress on stderr unless quiet.
pub fn run(config: &SimulationConfig) -> Result<CriticalCountTable, SimulationError> {
    if config.quiet {
        run_with_progress(config, io::sink())
    } else {
        run_with_progress(config, io::stderr())
    }
}

/// Runs a whole simulation, writing the progress line to `progress`.
pub fn run_with_progress<W>(
    config: &SimulationConfig,
    progress: W,
) -> Result<CriticalCountTable, SimulationError>
where
    W: Write + Send + 'static,
{
    execute(config, progress, Arc::new(CompletionCounter::new()), twin_trial)
}

/// The pipeline itself, with the per-worker trial supplied by `make_trial`.
fn execute<W, M, F>(
    config: &SimulationConfig,
    progress: W,
    pending: Arc<CompletionCounter>,
    mut make_trial: M,
) -> Result<CriticalCountTable, SimulationError>
where
    W: Write + Send + 'static,
    M: FnMut() -> F,
    F: FnMut(&Board, TrialTask) -> Result<TrialOutcome, SimulationError> + Send + 'static,
{
    config.validate()?;

    let size = config.board_size();
    let total = config.total_trials();
    let workers = config.resolved_workers();
    let seed = config.resolved_seed();

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("trial-worker-{}", i))
        .build()?;

    let (task_tx, task_rx) = bounded::<TrialTask>(workers);
    let (outcome_tx, outcome_rx) = unbounded();
    let (tick_tx, tick_rx) = unbounded();

    let aggregator = thread::Builder::new()
        .name("aggregator".into())
        .spawn(move || aggregate(size, outcome_rx))
        .map_err(|source| SimulationError::Spawn {
            name: "aggregator",
            source,
        })?;

    let reporter = ProgressReporter::new(progress, config.trials, total);
    let ticker = thread::Builder::new()
        .name("progress".into())
        .spawn(move || reporter.drain(tick_rx))
        .map_err(|source| SimulationError::Spawn {
            name: "progress",
            source,
        })?;

    let abort = Arc::new(AtomicBool::new(false));

    for _ in 0..workers {
        let worker = Worker {
            tasks: task_rx.clone(),
            outcomes: outcome_tx.clone(),
            ticks: tick_tx.clone(),
            pending: Arc::clone(&pending),
            abort: Arc::clone(&abort),
            seed,
            trial: make_trial(),
        };
        pool.spawn(move || worker.run());
    }
    drop(task_rx);

    for task in tasks(size, config.trials) {
        if abort.load(Ordering::Relaxed) {
            break;
        }
        pending.add(1);
        if task_tx.send(task).is_err() {
            pending.done();
            break;
        }
    }

    pending.wait();

    // Every task has been processed, so nothing is left to send on these.
    drop(task_tx);
    drop(outcome_tx);
    drop(tick_tx);

    let table = aggregator
        .join()
        .map_err(|_| SimulationError::ThreadPanicked("aggregator"))?;

    // A reporter that panicked has nothing left to print.
    if let Ok(reporter) = ticker.join() {
        if table.is_ok() {
            reporter.finish();
        } else {
            reporter.interrupt();
        }
    }

    table
}
