// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::local::LocalUnitFactory;
use crate::config::{Config, Strategy};
use crate::engine::{App, RunSummary};
use crate::errors::{ConfigError, ExecutionError};
use crate::schema::BuiltWorkflow;

/// Workflow runtime builder - orchestrates schema and scheduler creation from configuration.
///
/// The `RuntimeBuilder` parses the configured workflow, compacts it when
/// asked, builds it with the local unit factory and hands every round to a
/// fresh [`App`] sized from the executor options.
///
/// # Examples
///
/// ```
/// use the_joinery::config::{Config, RuntimeBuilder, Strategy};
///
/// let config = Config::from_yaml_str("workflow: \"echo hi --: upcase\"").unwrap();
/// let (workflow, app, strategy) = RuntimeBuilder::from_config(&config).unwrap();
///
/// assert_eq!(strategy, Strategy::Sequential);
/// assert_eq!(workflow.batches().count(), 2);
/// assert_eq!(app.pending_rounds(), vec![0]);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a complete runtime from configuration.
    ///
    /// Creates and returns:
    /// - `BuiltWorkflow`: the batches built for each node plus the build report
    /// - `Arc<App>`: the scheduler holding every scheduled round
    /// - `Strategy`: how the rounds should be drained
    pub fn from_config(cfg: &Config) -> Result<(BuiltWorkflow, Arc<App>, Strategy), ConfigError> {
        let mut schema = cfg.schema()?;
        if cfg.compact {
            schema.compact();
        }

        let app = Arc::new(match cfg.executor_options.max_concurrency {
            Some(max_concurrency) => App::with_max_concurrency(max_concurrency),
            None => App::new(),
        });
        let workflow = schema.build(&mut LocalUnitFactory::new(), app.as_ref())?;
        Ok((workflow, app, cfg.strategy))
    }

    /// Drains every scheduled round with the given strategy.
    pub async fn run(app: Arc<App>, strategy: Strategy) -> Result<RunSummary, ExecutionError> {
        match strategy {
            Strategy::Sequential => app.run(),
            Strategy::Concurrent => app.run_concurrent().await,
        }
    }
}
