// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::text;
use crate::errors::UnitError;
use crate::traits::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    Upper,
    Lower,
    /// First letter of every word capitalized.
    Proper,
    /// Like proper, but short articles and prepositions stay lowercase.
    Title,
}

/// Change Text Case unit - converts text to different cases
pub struct ChangeTextCaseUnit {
    case_type: CaseType,
}

impl ChangeTextCaseUnit {
    pub fn new(case_type: CaseType) -> Self {
        Self { case_type }
    }

    pub fn upper() -> Self {
        Self::new(CaseType::Upper)
    }

    pub fn lower() -> Self {
        Self::new(CaseType::Lower)
    }

    pub fn proper() -> Self {
        Self::new(CaseType::Proper)
    }

    pub fn title() -> Self {
        Self::new(CaseType::Title)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

fn is_small_word(word: &str) -> bool {
    matches!(
        word,
        "a" | "an" | "the" | "and" | "or" | "but" | "in" | "on" | "at" | "to" | "for" | "of" | "with" | "by"
    )
}

impl Unit for ChangeTextCaseUnit {
    fn name(&self) -> &str {
        match self.case_type {
            CaseType::Upper => "upcase",
            CaseType::Lower => "downcase",
            CaseType::Proper => "propercase",
            CaseType::Title => "titlecase",
        }
    }

    fn process(&self, input: Value) -> Result<Value, UnitError> {
        let input = text(&input)?;
        let result = match self.case_type {
            CaseType::Upper => input.to_uppercase(),
            CaseType::Lower => input.to_lowercase(),
            CaseType::Proper => input
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            CaseType::Title => input
                .split_whitespace()
                .enumerate()
                .map(|(i, word)| {
                    let lower_word = word.to_lowercase();
                    if i == 0 || !is_small_word(&lower_word) {
                        capitalize(word)
                    } else {
                        lower_word
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        };
        Ok(Value::String(result))
    }
}
