// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for runtime join dispatch.

use crate::audit::Marker;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A completed value was handed on to a target batch.
///
/// # Log Level
/// `trace!` - Fires for every delivered value
pub struct JoinDispatched {
    pub values: usize,
    pub targets: usize,
    pub stacked: bool,
}

impl Display for JoinDispatched {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let mode = if self.stacked { "queued" } else { "executing" };
        write!(
            f,
            "Dispatching {} value(s) to {} task(s), {}",
            self.values, self.targets, mode
        )
    }
}

impl StructuredLog for JoinDispatched {
    fn log(&self) {
        tracing::trace!(
            values = self.values,
            targets = self.targets,
            stacked = self.stacked,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "join_dispatch",
            span_name = name,
            values = self.values,
            targets = self.targets,
            stacked = self.stacked,
        )
    }
}

/// A switch classified a completed value.
///
/// # Log Level
/// `debug!` - Diagnostic information
///
/// # Example
/// ```
/// use the_joinery::audit::Marker;
/// use the_joinery::observability::messages::join::SwitchRouted;
///
/// let source = Marker::from("0:count");
/// let msg = SwitchRouted {
///     source: &source,
///     target: None,
/// };
///
/// assert_eq!(msg.to_string(), "Switch on '0:count' routed value to the aggregator");
/// ```
pub struct SwitchRouted<'a> {
    pub source: &'a Marker,
    pub target: Option<usize>,
}

impl Display for SwitchRouted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.target {
            Some(index) => write!(f, "Switch on '{}' routed value to target {}", self.source, index),
            None => write!(f, "Switch on '{}' routed value to the aggregator", self.source),
        }
    }
}

impl StructuredLog for SwitchRouted<'_> {
    fn log(&self) {
        tracing::debug!(
            source = %self.source,
            selected = ?self.target,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "switch",
            span_name = name,
            source = %self.source,
            selected = ?self.target,
        )
    }
}

/// A sync merge filled every slot of one combination.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct SyncCombinationCompleted<'a> {
    pub target: &'a str,
    pub combination: usize,
    pub inputs: usize,
}

impl Display for SyncCombinationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Combination {} into '{}' complete with {} input(s)",
            self.combination, self.target, self.inputs
        )
    }
}

impl StructuredLog for SyncCombinationCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            target_unit = self.target,
            combination = self.combination,
            inputs = self.inputs,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "sync_merge",
            span_name = name,
            target_unit = self.target,
            combination = self.combination,
        )
    }
}
