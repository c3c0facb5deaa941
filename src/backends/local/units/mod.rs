// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod change_text_case;
pub mod echo;
pub mod prefix_suffix_adder;
pub mod reverse_text;
pub mod split_join;
pub mod token_counter;

pub use change_text_case::*;
pub use echo::*;
pub use prefix_suffix_adder::*;
pub use reverse_text::*;
pub use split_join::*;
pub use token_counter::*;

use serde_json::Value;

use crate::errors::UnitError;

/// Reads a value as text. Arrays are joined with spaces, scalars are
/// rendered, and `null` reads as empty.
pub fn text(input: &Value) -> Result<String, UnitError> {
    match input {
        Value::String(text) => Ok(text.clone()),
        Value::Null => Ok(String::new()),
        Value::Bool(_) | Value::Number(_) => Ok(input.to_string()),
        Value::Array(items) => {
            let parts = items.iter().map(text).collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(" "))
        }
        Value::Object(_) => Err(UnitError::invalid_input(format!(
            "expected text, got object {}",
            input
        ))),
    }
}
