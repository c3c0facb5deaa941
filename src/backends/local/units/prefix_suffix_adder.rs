// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::text;
use crate::errors::UnitError;
use crate::traits::Unit;

/// Configuration for the Prefix/Suffix Adder unit
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PrefixSuffixConfig {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

/// Prefix/Suffix Adder unit - adds prefix and/or suffix to text
pub struct PrefixSuffixAdderUnit {
    config: PrefixSuffixConfig,
}

impl PrefixSuffixAdderUnit {
    pub fn new(config: PrefixSuffixConfig) -> Self {
        Self { config }
    }

    pub fn with_prefix_and_suffix(prefix: String, suffix: String) -> Self {
        Self::new(PrefixSuffixConfig {
            prefix: Some(prefix),
            suffix: Some(suffix),
        })
    }
}

impl Unit for PrefixSuffixAdderUnit {
    fn name(&self) -> &str {
        "wrap"
    }

    fn process(&self, input: Value) -> Result<Value, UnitError> {
        let input = text(&input)?;
        let prefix = self.config.prefix.as_deref().unwrap_or("");
        let suffix = self.config.suffix.as_deref().unwrap_or("");
        Ok(Value::String(format!("{}{}{}", prefix, input, suffix)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefix_and_suffix() {
        let test_cases = vec![
            (PrefixSuffixConfig { prefix: Some("[".into()), suffix: Some("]".into()) }, "[x]"),
            (PrefixSuffixConfig { prefix: Some(">> ".into()), suffix: None }, ">> x"),
            (PrefixSuffixConfig { prefix: None, suffix: Some("!".into()) }, "x!"),
            (PrefixSuffixConfig::default(), "x"),
        ];

        for (config, expected) in test_cases {
            let unit = PrefixSuffixAdderUnit::new(config);
            assert_eq!(unit.process(json!("x")).unwrap(), json!(expected));
        }
    }
}
