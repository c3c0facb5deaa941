// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::SchemaError;

/// Errors raised while compiling a workflow token stream into a schema.
///
/// Grammar errors are fatal: the parser never attempts partial recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token looked like a break (`--` followed by a non-letter) but matched
    /// none of the known directives.
    #[error("unrecognized break: '{token}'")]
    UnrecognizedBreak { token: String },

    /// The workflow string could not be split into shell words.
    #[error("unbalanced quoting in workflow: {input}")]
    UnbalancedQuotes { input: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
