// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod audit;
mod build;
mod config;
mod dependency;
mod execution;
mod parse;

pub use audit::AuditError;
pub use build::{BuildError, SchemaError};
pub use config::{ConfigError, ValidationError};
pub use dependency::DependencyError;
pub use execution::{ExecutionError, UnitError};
pub use parse::ParseError;
