// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use super::text;
use crate::errors::UnitError;
use crate::traits::Unit;

/// Reverse Text unit - reverses the characters of its input
#[derive(Debug, Default)]
pub struct ReverseTextUnit;

impl ReverseTextUnit {
    pub fn new() -> Self {
        Self
    }
}

impl Unit for ReverseTextUnit {
    fn name(&self) -> &str {
        "reverse"
    }

    fn process(&self, input: Value) -> Result<Value, UnitError> {
        Ok(Value::String(text(&input)?.chars().rev().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reverse() {
        let unit = ReverseTextUnit::new();
        assert_eq!(unit.process(json!("hello")).unwrap(), json!("olleh"));
        assert_eq!(unit.process(json!("")).unwrap(), json!(""));
        assert_eq!(unit.process(json!("héllo")).unwrap(), json!("olléh"));
    }
}
