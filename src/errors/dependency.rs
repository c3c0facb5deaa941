// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::UnitError;
use crate::audit::Marker;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    /// A resolve revisited a unit already on the resolution stack. `stack`
    /// holds the full stack at detection time, with the revisited unit last.
    #[error("circular dependency: {}", format_stack(.stack))]
    Circular { stack: Vec<Marker> },

    #[error("'{0}' is not a registered dependency")]
    Unregistered(Marker),

    #[error("dependency '{unit}' failed: {error}")]
    Failed { unit: Marker, error: UnitError },
}

fn format_stack(stack: &[Marker]) -> String {
    stack
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}
