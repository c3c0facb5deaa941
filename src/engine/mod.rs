// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Join runtime: tasks and batches, the join family, dependency resolution,
//! the result aggregator and a reference scheduler.

pub mod aggregator;
pub mod app;
pub mod combinator;
pub mod dependencies;
pub mod joins;
pub mod task;
#[cfg(test)]
pub mod integration_tests;

pub use aggregator::Aggregator;
pub use app::{App, RunSummary};
pub use combinator::{Combinator, Side};
pub use dependencies::{Dependencies, Dependency};
pub use joins::{integer_classifier, Classifier, Join};
pub use task::{Batch, Completion, Task};
