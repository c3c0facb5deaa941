// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::units::*;
use crate::errors::BuildError;
use crate::observability::messages::unit::{UnitInstantiated, UnitInstantiationFailed};
use crate::observability::messages::StructuredLog;
use crate::traits::{Unit, UnitBatch, UnitFactory};

/// Options every unit accepts.
const BATCH_OPTION: &str = "batch";

/// Factory for local (in-process) units.
///
/// The first argument names the unit:
/// - "echo" -> EchoUnit
/// - "upcase" / "downcase" / "propercase" / "titlecase" -> ChangeTextCaseUnit
/// - "reverse" -> ReverseTextUnit
/// - "count" -> TokenCounterUnit
/// - "wrap" -> PrefixSuffixAdderUnit (`--prefix`, `--suffix`)
/// - "split" -> SplitUnit
/// - "join" -> JoinUnit (`--separator`)
///
/// `--batch N` duplicates the unit into a batch of N. Arguments a unit does
/// not consume are returned as leftovers.
#[derive(Debug, Default)]
pub struct LocalUnitFactory;

impl LocalUnitFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn create_unit(name: &str, options: &HashMap<&str, String>) -> Result<Box<dyn Unit>, BuildError> {
        let option = |key: &str| options.get(key).cloned();
        match name {
            "echo" => Ok(Box::new(EchoUnit::new())),
            "upcase" => Ok(Box::new(ChangeTextCaseUnit::upper())),
            "downcase" => Ok(Box::new(ChangeTextCaseUnit::lower())),
            "propercase" => Ok(Box::new(ChangeTextCaseUnit::proper())),
            "titlecase" => Ok(Box::new(ChangeTextCaseUnit::title())),
            "reverse" => Ok(Box::new(ReverseTextUnit::new())),
            "count" => Ok(Box::new(TokenCounterUnit::new())),
            "wrap" => Ok(Box::new(PrefixSuffixAdderUnit::new(PrefixSuffixConfig {
                prefix: option("prefix"),
                suffix: option("suffix"),
            }))),
            "split" => Ok(Box::new(SplitUnit::new())),
            "join" => Ok(Box::new(match option("separator") {
                Some(separator) => JoinUnit::new(separator),
                None => JoinUnit::default(),
            })),
            _ => Err(BuildError::UnknownUnit {
                name: name.to_string(),
            }),
        }
    }

    /// Unit-specific options, each taking one value.
    pub fn accepted_options(name: &str) -> &'static [&'static str] {
        match name {
            "wrap" => &["prefix", "suffix"],
            "join" => &["separator"],
            _ => &[],
        }
    }

    pub fn list_available_units() -> Vec<&'static str> {
        vec![
            "echo",
            "upcase",
            "downcase",
            "propercase",
            "titlecase",
            "reverse",
            "count",
            "wrap",
            "split",
            "join",
        ]
    }

    pub fn is_unit_available(name: &str) -> bool {
        Self::list_available_units().contains(&name)
    }
}

struct ParsedOptions<'a> {
    batch: usize,
    values: HashMap<&'a str, String>,
    leftover: Vec<String>,
}

fn parse_options<'a>(unit: &str, args: &[String], accepted: &[&'a str]) -> Result<ParsedOptions<'a>, BuildError> {
    let invalid = |option: &str, reason: &str| BuildError::InvalidOption {
        unit: unit.to_string(),
        option: option.to_string(),
        reason: reason.to_string(),
    };

    let mut parsed = ParsedOptions {
        batch: 1,
        values: HashMap::new(),
        leftover: Vec::new(),
    };
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        let Some(option) = arg.strip_prefix("--") else {
            parsed.leftover.push(arg.clone());
            continue;
        };

        if option == BATCH_OPTION {
            let value = args.next().ok_or_else(|| invalid(option, "missing value"))?;
            parsed.batch = value
                .parse()
                .map_err(|_| invalid(option, "expected a positive integer"))?;
            if parsed.batch == 0 {
                return Err(invalid(option, "must be at least 1"));
            }
        } else if let Some(&name) = accepted.iter().find(|&&name| name == option) {
            let value = args.next().ok_or_else(|| invalid(option, "missing value"))?;
            parsed.values.insert(name, value.clone());
        } else {
            parsed.leftover.push(arg.clone());
        }
    }
    Ok(parsed)
}

impl UnitFactory for LocalUnitFactory {
    fn create(&mut self, argv: &[String]) -> Result<UnitBatch, BuildError> {
        let Some((name, args)) = argv.split_first() else {
            return Err(BuildError::UnknownUnit { name: String::new() });
        };

        let result = parse_options(name, args, Self::accepted_options(name)).and_then(|options| {
            let units = (0..options.batch)
                .map(|_| Self::create_unit(name, &options.values))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((units, options.leftover))
        });

        match &result {
            Ok((units, leftover)) => UnitInstantiated {
                unit: name,
                batch_size: units.len(),
                leftover: leftover.len(),
            }
            .log(),
            Err(error) => UnitInstantiationFailed { unit: name, error }.log(),
        }
        result
    }
}
