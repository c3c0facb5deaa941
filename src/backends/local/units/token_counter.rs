// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use serde_json::Value;

use super::text;
use crate::errors::UnitError;
use crate::traits::Unit;

/// Token Counter unit - counts characters, words and lines
#[derive(Debug, Default)]
pub struct TokenCounterUnit;

impl TokenCounterUnit {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct TokenCountResult {
    char_count: usize,
    word_count: usize,
    line_count: usize,
}

impl Unit for TokenCounterUnit {
    fn name(&self) -> &str {
        "count"
    }

    fn process(&self, input: Value) -> Result<Value, UnitError> {
        let input = text(&input)?;
        let result = TokenCountResult {
            char_count: input.chars().count(),
            word_count: input.split_whitespace().count(),
            // At least 1 line even if empty
            line_count: input.lines().count().max(1),
        };
        serde_json::to_value(result)
            .map_err(|e| UnitError::failed(format!("Failed to serialize result: {}", e)))
    }
}
