// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// `expand` was called on an audit whose current value is not an array.
    #[error("cannot expand non-iterable value: {value}")]
    NotIterable { value: String },
}
