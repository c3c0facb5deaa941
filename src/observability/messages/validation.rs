// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for schema validation.
//!
//! This module contains message types for logging events related to:
//! * Join graph cycle detection
//! * Non-fatal validation findings surfaced during build

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Cycle found in the join graph.
///
/// # Log Level
/// `warn!` - Potential issue that doesn't prevent execution
///
/// # Example
/// ```
/// use the_joinery::observability::messages::validation::JoinCycleDetected;
///
/// let cycle = vec![0, 1, 0];
/// let msg = JoinCycleDetected {
///     cycle: &cycle,
/// };
///
/// assert_eq!(msg.to_string(), "Join cycle detected: 0 -> 1 -> 0");
/// ```
pub struct JoinCycleDetected<'a> {
    pub cycle: &'a [usize],
}

impl JoinCycleDetected<'_> {
    fn path(&self) -> String {
        self.cycle
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Display for JoinCycleDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Join cycle detected: {}", self.path())
    }
}

impl StructuredLog for JoinCycleDetected<'_> {
    fn log(&self) {
        tracing::warn!(
            cycle = self.path(),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "join_cycle",
            name = name,
            cycle = self.path(),
            cycle_length = self.cycle.len(),
        )
    }
}

/// A validation finding that does not block the build.
///
/// # Log Level
/// `warn!` - Potential issue that doesn't prevent execution
pub struct ValidationWarning<'a> {
    pub warning: &'a ValidationError,
}

impl Display for ValidationWarning<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Validation warning: {}", self.warning)
    }
}

impl StructuredLog for ValidationWarning<'_> {
    fn log(&self) {
        tracing::warn!(warning = %self.warning, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("validation_warning", span_name = name, warning = %self.warning)
    }
}

/// Schema validation finished.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct ValidationCompleted {
    pub errors: usize,
    pub warnings: usize,
}

impl Display for ValidationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Schema validation finished: {} error(s), {} warning(s)",
            self.errors, self.warnings
        )
    }
}

impl StructuredLog for ValidationCompleted {
    fn log(&self) {
        tracing::debug!(errors = self.errors, warnings = self.warnings, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "validation",
            span_name = name,
            errors = self.errors,
            warnings = self.warnings,
        )
    }
}
