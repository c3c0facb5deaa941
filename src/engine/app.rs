// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reference scheduler.
//!
//! The [`App`] holds scheduled rounds in order and drains them one at a time:
//! every entry of a round is queued, and the round is finished once the queue
//! is empty and no worker is still running a task (work done by a running
//! task may queue more). [`App::run`] drains on the calling thread;
//! [`App::run_concurrent`] drains with a pool of blocking workers and stops
//! every worker at the first failure.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::audit::{Audit, Marker};
use crate::engine::{Aggregator, Batch, Dependencies, Task};
use crate::errors::ExecutionError;
use crate::observability::messages::engine::{
    ExecutionCompleted, ExecutionFailed, ExecutionStarted, RoundStarted, WorkerCancelled,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Scheduler;

type Entry = (Arc<Task>, Audit);

#[derive(Default)]
struct WorkQueue {
    pending: VecDeque<Entry>,
    active: usize,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub rounds: usize,
    pub executed: usize,
    pub aggregated: usize,
    pub duration: Duration,
}

pub struct App {
    rounds: Mutex<BTreeMap<usize, Vec<Entry>>>,
    queue: Mutex<WorkQueue>,
    available: Condvar,
    aggregator: Aggregator,
    dependencies: Dependencies,
    instances: RwLock<Vec<Arc<Batch>>>,
    executed: AtomicUsize,
    max_concurrency: usize,
}

impl App {
    pub fn new() -> Self {
        Self::with_max_concurrency(default_concurrency())
    }

    pub fn with_max_concurrency(max_concurrency: usize) -> Self {
        Self {
            rounds: Mutex::new(BTreeMap::new()),
            queue: Mutex::new(WorkQueue::default()),
            available: Condvar::new(),
            aggregator: Aggregator::new(),
            dependencies: Dependencies::new(),
            instances: RwLock::new(Vec::new()),
            executed: AtomicUsize::new(0),
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    /// Declares that `dependent` needs `prerequisite` run with `args` before
    /// it executes. Prerequisites run once per distinct `args`.
    pub fn depends_on(&self, dependent: &Marker, prerequisite: Arc<Task>, args: Value) {
        self.dependencies.depends_on(dependent, prerequisite, args);
    }

    /// Global batches registered during build.
    pub fn instances(&self) -> Vec<Arc<Batch>> {
        self.instances.read().clone()
    }

    /// Rounds still waiting to run.
    pub fn pending_rounds(&self) -> Vec<usize> {
        self.rounds.lock().keys().copied().collect()
    }

    /// Drains every scheduled round on the calling thread.
    pub fn run(&self) -> Result<RunSummary, ExecutionError> {
        let strategy = "sequential";
        let started = Instant::now();
        ExecutionStarted {
            strategy,
            rounds: self.rounds.lock().len(),
            max_concurrency: 1,
        }
        .log();

        let mut rounds = 0;
        while let Some((round, entries)) = self.next_round() {
            RoundStarted {
                round,
                entries: entries.len(),
            }
            .log();
            self.queue.lock().pending.extend(entries);
            while let Some((task, audit)) = self.dequeue() {
                if let Err(error) = self.execute(&task, audit) {
                    self.queue.lock().pending.clear();
                    ExecutionFailed { strategy, error: &error }.log();
                    return Err(error);
                }
            }
            rounds += 1;
        }
        Ok(self.summarize(strategy, rounds, started))
    }

    /// Drains every scheduled round with up to `max_concurrency` blocking
    /// workers per round. The first failure cancels the remaining workers
    /// and is returned once they have stopped.
    pub async fn run_concurrent(self: Arc<Self>) -> Result<RunSummary, ExecutionError> {
        let strategy = "concurrent";
        let started = Instant::now();
        ExecutionStarted {
            strategy,
            rounds: self.rounds.lock().len(),
            max_concurrency: self.max_concurrency,
        }
        .log();

        let mut rounds = 0;
        while let Some((round, entries)) = self.next_round() {
            RoundStarted {
                round,
                entries: entries.len(),
            }
            .log();
            self.queue.lock().pending.extend(entries);

            let token = CancellationToken::new();
            let handles: Vec<_> = (0..self.max_concurrency)
                .map(|worker| {
                    let app = Arc::clone(&self);
                    let token = token.clone();
                    tokio::task::spawn_blocking(move || app.work(worker, &token))
                })
                .collect();

            let mut failure = None;
            for handle in handles {
                let outcome = match handle.await {
                    Ok(outcome) => outcome,
                    Err(join_error) => Err(ExecutionError::Internal {
                        message: join_error.to_string(),
                    }),
                };
                if let Err(error) = outcome {
                    if error != ExecutionError::Cancelled {
                        failure.get_or_insert(error);
                    }
                }
            }

            if let Some(error) = failure {
                self.queue.lock().pending.clear();
                ExecutionFailed { strategy, error: &error }.log();
                return Err(error);
            }
            rounds += 1;
        }
        Ok(self.summarize(strategy, rounds, started))
    }

    fn work(&self, worker: usize, token: &CancellationToken) -> Result<(), ExecutionError> {
        loop {
            let (task, audit) = {
                let mut queue = self.queue.lock();
                loop {
                    if token.is_cancelled() {
                        WorkerCancelled { worker }.log();
                        return Err(ExecutionError::Cancelled);
                    }
                    if let Some(entry) = queue.pending.pop_front() {
                        queue.active += 1;
                        break entry;
                    }
                    if queue.active == 0 {
                        self.available.notify_all();
                        return Ok(());
                    }
                    self.available.wait(&mut queue);
                }
            };

            let result = self.execute(&task, audit);
            self.queue.lock().active -= 1;
            if result.is_err() {
                token.cancel();
            }
            // Taken under the lock so a waiter cannot miss the cancellation.
            let _queue = self.queue.lock();
            self.available.notify_all();
            result?;
        }
    }

    fn next_round(&self) -> Option<(usize, Vec<Entry>)> {
        self.rounds.lock().pop_first()
    }

    fn dequeue(&self) -> Option<Entry> {
        self.queue.lock().pending.pop_front()
    }

    fn summarize(&self, strategy: &str, rounds: usize, started: Instant) -> RunSummary {
        let summary = RunSummary {
            rounds,
            executed: self.executed.load(Ordering::SeqCst),
            aggregated: self.aggregator.len(),
            duration: started.elapsed(),
        };
        ExecutionCompleted {
            strategy,
            executed: summary.executed,
            duration: summary.duration,
        }
        .log();
        summary
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for App {
    fn enqueue(&self, task: Arc<Task>, audit: Audit) {
        self.queue.lock().pending.push_back((task, audit));
        self.available.notify_one();
    }

    fn execute(&self, task: &Arc<Task>, audit: Audit) -> Result<(), ExecutionError> {
        if self.dependencies.has_prerequisites(task.marker()) {
            self.dependencies.require(task.marker())?;
        }
        let audit = task.process(audit)?;
        self.executed.fetch_add(1, Ordering::SeqCst);
        task.complete(self, audit)
    }

    fn schedule_round(&self, round: usize, entries: Vec<(Arc<Task>, Audit)>) {
        self.rounds.lock().entry(round).or_default().extend(entries);
    }

    fn register_instance(&self, batch: Arc<Batch>) {
        self.instances.write().push(batch);
    }

    fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
