// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod audit;      // provenance trails
pub mod backends;   // unit backends
pub mod config;     // config loading, validation, runtime
pub mod engine;     // joins, scheduler, aggregation
pub mod errors;     // error handling
pub mod observability;
pub mod parser;     // workflow grammar
pub mod schema;     // graph IR
pub mod traits;     // unit, scheduler and factory seams
