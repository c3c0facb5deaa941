// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for unit instantiation and execution.

use crate::audit::Marker;
use crate::errors::{BuildError, UnitError};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Factory created a duplication batch for a unit name.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct UnitInstantiated<'a> {
    pub unit: &'a str,
    pub batch_size: usize,
    pub leftover: usize,
}

impl Display for UnitInstantiated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Instantiated '{}' x{} ({} leftover argument(s))",
            self.unit, self.batch_size, self.leftover
        )
    }
}

impl StructuredLog for UnitInstantiated<'_> {
    fn log(&self) {
        tracing::debug!(
            unit = self.unit,
            batch_size = self.batch_size,
            leftover = self.leftover,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "unit_instantiated",
            span_name = name,
            unit = self.unit,
            batch_size = self.batch_size,
        )
    }
}

/// Factory could not create a unit.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnitInstantiationFailed<'a> {
    pub unit: &'a str,
    pub error: &'a BuildError,
}

impl Display for UnitInstantiationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to instantiate unit '{}': {}", self.unit, self.error)
    }
}

impl StructuredLog for UnitInstantiationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            unit = self.unit,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "unit_instantiation_failed",
            span_name = name,
            unit = self.unit,
            error = %self.error,
        )
    }
}

/// Unit execution started. Its span wraps the unit's processing, so the
/// completion or failure event is reported inside it.
///
/// # Log Level
/// `trace!` - Per-value detail
pub struct UnitExecutionStarted<'a> {
    pub unit: &'a Marker,
    pub unit_name: &'a str,
    pub input_kind: &'static str,
}

impl Display for UnitExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unit '{}' ({}) processing {} input", self.unit, self.unit_name, self.input_kind)
    }
}

impl StructuredLog for UnitExecutionStarted<'_> {
    fn log(&self) {
        tracing::trace!(
            unit = %self.unit,
            unit_name = self.unit_name,
            input_kind = self.input_kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "unit_execution",
            span_name = name,
            unit = %self.unit,
            unit_name = self.unit_name,
        )
    }
}

/// Unit execution completed successfully.
///
/// # Log Level
/// `debug!` - Diagnostic information
///
/// # Example
/// ```
/// use std::time::Duration;
/// use the_joinery::audit::Marker;
/// use the_joinery::observability::messages::unit::UnitExecutionCompleted;
///
/// let unit = Marker::from("1:upcase");
/// let msg = UnitExecutionCompleted {
///     unit: &unit,
///     duration: Duration::from_millis(3),
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct UnitExecutionCompleted<'a> {
    pub unit: &'a Marker,
    pub duration: Duration,
}

impl Display for UnitExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unit '{}' completed in {:?}", self.unit, self.duration)
    }
}

impl StructuredLog for UnitExecutionCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            unit = %self.unit,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "unit_execution",
            span_name = name,
            unit = %self.unit,
            duration = ?self.duration,
        )
    }
}

/// Unit execution failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnitExecutionFailed<'a> {
    pub unit: &'a Marker,
    pub error: &'a UnitError,
}

impl Display for UnitExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unit '{}' failed: {}", self.unit, self.error)
    }
}

impl StructuredLog for UnitExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            unit = %self.unit,
            code = self.error.code,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "unit_execution_failed",
            span_name = name,
            unit = %self.unit,
            code = self.error.code,
        )
    }
}
