// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for schema construction and for materializing a schema into units.

use thiserror::Error;

use super::ValidationError;
use crate::schema::{JoinId, JoinKind};

/// Errors raised by structural schema operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// An unattached join is meaningless, so a join needs at least one source.
    #[error("{kind} join requires at least one source index")]
    NoSources { kind: JoinKind },

    #[error("{kind} join requires at least one target index")]
    NoTargets { kind: JoinKind },
}

/// Errors raised while building a schema into live units.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A join lost all of its sources and was never compacted away.
    #[error("dangling join {join}: no source nodes remain")]
    DanglingJoin { join: JoinId },

    #[error("schema failed validation: {}", join_messages(.0))]
    InvalidSchema(Vec<ValidationError>),

    /// A node with no arguments has nothing to instantiate.
    #[error("node {index} has no arguments to build a unit from")]
    EmptyNode { index: usize },

    #[error("unknown unit '{name}'")]
    UnknownUnit { name: String },

    #[error("invalid option '{option}' for unit '{unit}': {reason}")]
    InvalidOption {
        unit: String,
        option: String,
        reason: String,
    },

    /// The factory returned an empty duplication batch.
    #[error("factory produced no units for node {index}")]
    EmptyBatch { index: usize },

    #[error("{kind} join {join} cannot connect {sources} source(s) to {targets} target(s)")]
    JoinArity {
        join: JoinId,
        kind: JoinKind,
        sources: usize,
        targets: usize,
    },
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
