// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::{AuditError, DependencyError};
use crate::audit::Marker;

/// Failure reported by a single unit while processing a value.
///
/// Codes follow HTTP conventions: 400 for input the unit cannot handle,
/// 500 for anything else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct UnitError {
    pub code: i32,
    pub message: String,
}

impl UnitError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: 400,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            message: message.into(),
        }
    }
}

/// Errors that propagate synchronously from unit execution and join callbacks
/// to whichever scheduler invoked them. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("unit '{unit}' failed: {error}")]
    UnitFailed {
        unit: Marker,
        #[source]
        error: UnitError,
    },

    /// A second value arrived for a synchronized-merge slot that was still
    /// waiting on the rest of its combination. This always indicates an
    /// upstream duplication or ordering bug.
    #[error(
        "sync merge collision into '{target}': slot {slot} of combination {combination} is already filled"
    )]
    SyncCollision {
        target: String,
        combination: usize,
        slot: usize,
    },

    #[error("switch on '{source_unit}' selected target {index}, but only {targets} target(s) exist")]
    SwitchOutOfRange {
        source_unit: Marker,
        index: usize,
        targets: usize,
    },

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error("execution cancelled")]
    Cancelled,

    #[error("internal error: {message}")]
    Internal { message: String },
}
