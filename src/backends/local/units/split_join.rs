// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use super::text;
use crate::errors::UnitError;
use crate::traits::Unit;

/// Split unit - turns text into an array of its words, ready for iterating joins
#[derive(Debug, Default)]
pub struct SplitUnit;

impl SplitUnit {
    pub fn new() -> Self {
        Self
    }
}

impl Unit for SplitUnit {
    fn name(&self) -> &str {
        "split"
    }

    fn process(&self, input: Value) -> Result<Value, UnitError> {
        let words = text(&input)?
            .split_whitespace()
            .map(|word| Value::String(word.to_string()))
            .collect();
        Ok(Value::Array(words))
    }
}

/// Join unit - flattens an array (such as a merged value) into one string
#[derive(Debug)]
pub struct JoinUnit {
    separator: String,
}

impl JoinUnit {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for JoinUnit {
    fn default() -> Self {
        Self::new(" ")
    }
}

impl Unit for JoinUnit {
    fn name(&self) -> &str {
        "join"
    }

    fn process(&self, input: Value) -> Result<Value, UnitError> {
        match input {
            Value::Array(items) => {
                let parts = items.iter().map(text).collect::<Result<Vec<_>, _>>()?;
                Ok(Value::String(parts.join(&self.separator)))
            }
            other => Ok(Value::String(text(&other)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_words() {
        assert_eq!(
            SplitUnit::new().process(json!("a  b\tc")).unwrap(),
            json!(["a", "b", "c"])
        );
        assert_eq!(SplitUnit::new().process(json!("")).unwrap(), json!([]));
    }

    #[test]
    fn test_join_with_separator() {
        assert_eq!(
            JoinUnit::new(", ").process(json!(["x", 1, ["y", "z"]])).unwrap(),
            json!("x, 1, y z")
        );
        assert_eq!(JoinUnit::default().process(json!("solo")).unwrap(), json!("solo"));
    }
}
