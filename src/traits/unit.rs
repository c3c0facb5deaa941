// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::errors::UnitError;

/// A unit of work: one value in, one value out.
///
/// Units are shared across workers, so `process` takes `&self`; any state a
/// unit keeps between calls needs its own synchronization.
pub trait Unit: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, input: Value) -> Result<Value, UnitError>;
}
