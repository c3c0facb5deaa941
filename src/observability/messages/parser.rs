// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workflow parsing.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A break token was applied to the schema.
///
/// # Log Level
/// `trace!` - One per break token
pub struct BreakApplied<'a> {
    pub token: &'a str,
    pub current_index: usize,
}

impl Display for BreakApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Applied break '{}', now collecting node {}",
            self.token, self.current_index
        )
    }
}

impl StructuredLog for BreakApplied<'_> {
    fn log(&self) {
        tracing::trace!(
            token = self.token,
            current_index = self.current_index,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "break_applied",
            span_name = name,
            token = self.token,
            current_index = self.current_index,
        )
    }
}

/// The end flag stopped parsing early.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct EndFlagReached {
    pub remainder: usize,
}

impl Display for EndFlagReached {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "End flag reached, {} token(s) left unparsed", self.remainder)
    }
}

impl StructuredLog for EndFlagReached {
    fn log(&self) {
        tracing::debug!(remainder = self.remainder, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("end_flag", span_name = name, remainder = self.remainder)
    }
}

/// Parsing finished.
///
/// # Log Level
/// `debug!` - Diagnostic information
///
/// # Example
/// ```
/// use the_joinery::observability::messages::parser::ParseCompleted;
///
/// let msg = ParseCompleted {
///     nodes: 3,
///     joins: 1,
///     remainder: 0,
/// };
///
/// assert_eq!(msg.to_string(), "Parsed 3 node position(s) and 1 join(s)");
/// ```
pub struct ParseCompleted {
    pub nodes: usize,
    pub joins: usize,
    pub remainder: usize,
}

impl Display for ParseCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Parsed {} node position(s) and {} join(s)",
            self.nodes, self.joins
        )
    }
}

impl StructuredLog for ParseCompleted {
    fn log(&self) {
        tracing::debug!(
            nodes = self.nodes,
            joins = self.joins,
            remainder = self.remainder,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "parse",
            span_name = name,
            nodes = self.nodes,
            joins = self.joins,
            remainder = self.remainder,
        )
    }
}
