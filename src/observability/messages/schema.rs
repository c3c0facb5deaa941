// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for schema compaction and build.

use crate::observability::messages::StructuredLog;
use crate::schema::{JoinId, JoinKind};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Compaction removed empty positions and dangling joins.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct SchemaCompacted {
    pub nodes_before: usize,
    pub nodes_after: usize,
    pub joins_before: usize,
    pub joins_after: usize,
}

impl Display for SchemaCompacted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compacted schema: {} -> {} node(s), {} -> {} join(s)",
            self.nodes_before, self.nodes_after, self.joins_before, self.joins_after
        )
    }
}

impl StructuredLog for SchemaCompacted {
    fn log(&self) {
        tracing::debug!(
            nodes_before = self.nodes_before,
            nodes_after = self.nodes_after,
            joins_before = self.joins_before,
            joins_after = self.joins_after,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "compact",
            span_name = name,
            nodes_before = self.nodes_before,
            nodes_after = self.nodes_after,
        )
    }
}

/// A join was connected to its source batches.
///
/// # Log Level
/// `debug!` - Diagnostic information
///
/// # Example
/// ```
/// use the_joinery::observability::messages::schema::JoinWired;
/// use the_joinery::schema::{JoinId, JoinKind};
///
/// let msg = JoinWired {
///     join: JoinId(0),
///     kind: JoinKind::Fork,
///     sources: &[0],
///     targets: &[1, 2],
/// };
///
/// assert_eq!(msg.to_string(), "Wired fork join #0: [0] -> [1, 2]");
/// ```
pub struct JoinWired<'a> {
    pub join: JoinId,
    pub kind: JoinKind,
    pub sources: &'a [usize],
    pub targets: &'a [usize],
}

impl Display for JoinWired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Wired {} join {}: {:?} -> {:?}",
            self.kind, self.join, self.sources, self.targets
        )
    }
}

impl StructuredLog for JoinWired<'_> {
    fn log(&self) {
        tracing::debug!(
            join = self.join.0,
            kind = self.kind.as_str(),
            sources = ?self.sources,
            targets = ?self.targets,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "join_wired",
            span_name = name,
            join = self.join.0,
            kind = self.kind.as_str(),
        )
    }
}

/// A join target was given arguments its unit did not consume. Join targets
/// take their input from the join, so the arguments are dropped.
///
/// # Log Level
/// `warn!` - Potential issue that doesn't prevent execution
pub struct LeftoverArgumentsIgnored<'a> {
    pub index: usize,
    pub join: JoinId,
    pub args: &'a [String],
}

impl Display for LeftoverArgumentsIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node {} is fed by join {}; ignoring leftover arguments {:?}",
            self.index, self.join, self.args
        )
    }
}

impl StructuredLog for LeftoverArgumentsIgnored<'_> {
    fn log(&self) {
        tracing::warn!(
            index = self.index,
            join = self.join.0,
            args = ?self.args,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "leftover_arguments",
            span_name = name,
            index = self.index,
            join = self.join.0,
        )
    }
}

/// Build finished and every round has been handed to the scheduler.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BuildCompleted {
    pub units: usize,
    pub joins: usize,
    pub rounds: usize,
    pub leftovers: usize,
    pub duration: Duration,
}

impl Display for BuildCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built {} unit(s) with {} join(s) across {} round(s) in {:?}",
            self.units, self.joins, self.rounds, self.duration
        )
    }
}

impl StructuredLog for BuildCompleted {
    fn log(&self) {
        tracing::info!(
            units = self.units,
            joins = self.joins,
            rounds = self.rounds,
            leftovers = self.leftovers,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "build",
            span_name = name,
            units = self.units,
            joins = self.joins,
            rounds = self.rounds,
        )
    }
}
