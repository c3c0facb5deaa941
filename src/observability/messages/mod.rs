// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at its level with structured fields attached.
//!
//! # Organization
//!
//! * `parser` - tokenizing and break handling
//! * `schema` - compaction and build events
//! * `join` - runtime join dispatch
//! * `engine` - scheduler lifecycle, aggregation and dependencies
//! * `unit` - unit instantiation and execution
//! * `validation` - schema validation warnings
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_joinery::observability::messages::engine::ExecutionStarted;
//! use the_joinery::observability::messages::StructuredLog;
//!
//! ExecutionStarted {
//!     strategy: "sequential",
//!     rounds: 2,
//!     max_concurrency: 1,
//! }
//! .log();
//! ```

pub mod engine;
pub mod join;
pub mod parser;
pub mod schema;
pub mod unit;
pub mod validation;

use tracing::Span;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emits the message as a tracing event.
    fn log(&self);

    /// A span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
