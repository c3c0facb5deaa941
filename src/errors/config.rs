// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::{BuildError, ParseError};
use crate::schema::{JoinId, JoinKind};

/// Errors that can occur during schema validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A join whose source nodes were all removed or relinked elsewhere
    DanglingJoin {
        /// The join with no remaining source
        join: JoinId,
    },
    /// A join references a node position that holds no node
    MissingNode {
        /// The join holding the reference
        join: JoinId,
        /// The position that could not be resolved
        index: usize,
    },
    /// A join's participant counts do not fit its fan policy
    JoinArity {
        join: JoinId,
        kind: JoinKind,
        sources: usize,
        targets: usize,
    },
    /// A loop in the join graph. Loops are legal when a switch or a stacked
    /// join eventually breaks them, so this is reported as a warning only.
    CyclicJoinWarning {
        /// Node positions forming the loop, first position repeated last
        cycle: Vec<usize>,
    },
}

impl ValidationError {
    /// Warnings are logged but never block a build.
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationError::CyclicJoinWarning { .. })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DanglingJoin { join } => {
                write!(f, "Join {} has no source nodes", join)
            }
            ValidationError::MissingNode { join, index } => {
                write!(
                    f,
                    "Join {} references node {} which does not exist",
                    join, index
                )
            }
            ValidationError::JoinArity {
                join,
                kind,
                sources,
                targets,
            } => {
                write!(
                    f,
                    "{} join {} cannot connect {} source(s) to {} target(s)",
                    kind, join, sources, targets
                )
            }
            ValidationError::CyclicJoinWarning { cycle } => {
                let path: Vec<String> = cycle.iter().map(|i| i.to_string()).collect();
                write!(f, "Join cycle detected: {}. ", path.join(" -> "))?;
                write!(f, "Execution only terminates if a switch or stacked join breaks the loop.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a workflow configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported configuration format '{extension}' (expected yaml, yml or toml)")]
    UnsupportedFormat { extension: String },

    #[error("workflow failed to parse: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Validation(Vec<ValidationError>),

    #[error("workflow failed to build: {0}")]
    Build(#[from] BuildError),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
