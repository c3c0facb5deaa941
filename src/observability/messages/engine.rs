// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for scheduler lifecycle and execution events.
//!
//! This module contains message types for logging events related to:
//! * Run lifecycle (start, completion, failure)
//! * Round progression and worker cancellation
//! * Aggregation of terminal results
//! * Dependency resolution

use crate::audit::{Marker, SourceKey};
use crate::errors::ExecutionError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Execution started with specified strategy and configuration.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_joinery::observability::messages::engine::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     strategy: "concurrent",
///     rounds: 2,
///     max_concurrency: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionStarted<'a> {
    pub strategy: &'a str,
    pub rounds: usize,
    pub max_concurrency: usize,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting {} execution: {} round(s), max_concurrency={}",
            self.strategy, self.rounds, self.max_concurrency
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            strategy = self.strategy,
            rounds = self.rounds,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            strategy = self.strategy,
            rounds = self.rounds,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// Execution completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionCompleted<'a> {
    pub strategy: &'a str,
    pub executed: usize,
    pub duration: Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} execution completed: {} task run(s) in {:?}",
            self.strategy, self.executed, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            strategy = self.strategy,
            executed = self.executed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_completed",
            span_name = name,
            strategy = self.strategy,
            executed = self.executed,
            duration = ?self.duration,
        )
    }
}

/// Execution failed with error.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ExecutionFailed<'a> {
    pub strategy: &'a str,
    pub error: &'a ExecutionError,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} execution failed: {}", self.strategy, self.error)
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            strategy = self.strategy,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "execution_failed",
            span_name = name,
            strategy = self.strategy,
            error = %self.error,
        )
    }
}

/// A round was moved onto the work queue.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct RoundStarted {
    pub round: usize,
    pub entries: usize,
}

impl Display for RoundStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Starting round {} with {} entries", self.round, self.entries)
    }
}

impl StructuredLog for RoundStarted {
    fn log(&self) {
        tracing::debug!(round = self.round, entries = self.entries, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("round", span_name = name, round = self.round, entries = self.entries)
    }
}

/// A worker observed cancellation and stopped.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct WorkerCancelled {
    pub worker: usize,
}

impl Display for WorkerCancelled {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker {} stopped after cancellation", self.worker)
    }
}

impl StructuredLog for WorkerCancelled {
    fn log(&self) {
        tracing::debug!(worker = self.worker, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("worker_cancelled", span_name = name, worker = self.worker)
    }
}

/// A terminal result was stored in the aggregator.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct AuditAggregated<'a> {
    pub key: &'a SourceKey,
    pub trail_length: usize,
}

impl Display for AuditAggregated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Aggregated result under {:?} with a trail of {} step(s)",
            self.key, self.trail_length
        )
    }
}

impl StructuredLog for AuditAggregated<'_> {
    fn log(&self) {
        tracing::debug!(
            key = ?self.key,
            trail_length = self.trail_length,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "aggregate",
            span_name = name,
            key = ?self.key,
            trail_length = self.trail_length,
        )
    }
}

/// Every prerequisite of a unit has run.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct DependencyResolved<'a> {
    pub unit: &'a Marker,
    pub prerequisites: usize,
}

impl Display for DependencyResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved {} prerequisite(s) for '{}'",
            self.prerequisites, self.unit
        )
    }
}

impl StructuredLog for DependencyResolved<'_> {
    fn log(&self) {
        tracing::debug!(
            unit = %self.unit,
            prerequisites = self.prerequisites,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "dependency",
            span_name = name,
            unit = %self.unit,
            prerequisites = self.prerequisites,
        )
    }
}
