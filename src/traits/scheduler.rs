// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::audit::Audit;
use crate::engine::{Aggregator, Batch, Task};
use crate::errors::ExecutionError;

/// The runtime that queues and runs tasks.
///
/// Joins only ever talk to a scheduler through this trait. Completion
/// callbacks receive it by reference, so tasks never hold on to the
/// scheduler that runs them.
pub trait Scheduler: Send + Sync {
    /// Queues a task to run later in the current round.
    fn enqueue(&self, task: Arc<Task>, audit: Audit);

    /// Runs a task now, then fires its completion callbacks.
    fn execute(&self, task: &Arc<Task>, audit: Audit) -> Result<(), ExecutionError>;

    /// Adds entry points to a round. Round N starts once round N-1 has drained.
    fn schedule_round(&self, round: usize, entries: Vec<(Arc<Task>, Audit)>);

    /// Keeps a global batch alive outside the round and join graph.
    fn register_instance(&self, batch: Arc<Batch>);

    fn aggregator(&self) -> &Aggregator;
}
