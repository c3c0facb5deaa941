// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::errors::UnitError;
use crate::traits::Unit;

/// Echo unit - returns its input unchanged
#[derive(Debug, Default)]
pub struct EchoUnit;

impl EchoUnit {
    pub fn new() -> Self {
        Self
    }
}

impl Unit for EchoUnit {
    fn name(&self) -> &str {
        "echo"
    }

    fn process(&self, input: Value) -> Result<Value, UnitError> {
        Ok(input)
    }
}
