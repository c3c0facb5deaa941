// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging throughout the crate. Message types follow a
//! struct-based pattern with a `Display` implementation, so log text lives in
//! one place instead of being scattered through the code as format strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::parser` - tokenizing and break handling
//! * `messages::schema` - compaction and build
//! * `messages::join` - runtime join dispatch
//! * `messages::engine` - scheduler lifecycle and aggregation
//! * `messages::unit` - unit instantiation and execution
//! * `messages::validation` - schema validation findings
//!
//! # Usage
//!
//! ```rust
//! use the_joinery::audit::Marker;
//! use the_joinery::errors::UnitError;
//! use the_joinery::observability::messages::unit::UnitExecutionFailed;
//!
//! let unit = Marker::from("0:reverse");
//! let error = UnitError::failed("test error");
//! let msg = UnitExecutionFailed {
//!     unit: &unit,
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
