// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Materializing a schema into live units.
//!
//! Building happens in four passes over a validated schema:
//!
//! 1. every non-empty node is handed to the [`UnitFactory`], producing one
//!    [`Batch`] per position;
//! 2. every recorded join is wired onto its source batches;
//! 3. global nodes are registered with the scheduler;
//! 4. round nodes are scheduled with their leftover arguments as input.
//!
//! Leftover arguments on nodes fed by a join have nowhere to go. They are
//! logged and returned in the [`BuildReport`] rather than failing the build.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use super::{JoinKind, NodeSource, Schema};
use crate::audit::{Audit, Source};
use crate::config::validate_schema;
use crate::engine::{joins, Batch, Task};
use crate::errors::{BuildError, ValidationError};
use crate::observability::messages::schema::{BuildCompleted, JoinWired, LeftoverArgumentsIgnored};
use crate::observability::messages::validation::ValidationWarning;
use crate::observability::messages::StructuredLog;
use crate::traits::{Scheduler, UnitFactory};

/// Arguments a factory did not consume on a node that cannot use them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeftoverArguments {
    pub index: usize,
    pub args: Vec<String>,
}

/// Non-fatal findings from a build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub leftovers: Vec<LeftoverArguments>,
    pub warnings: Vec<ValidationError>,
}

/// The batches created for a schema, indexed by node position.
#[derive(Debug, Clone)]
pub struct BuiltWorkflow {
    batches: Vec<Option<Arc<Batch>>>,
    report: BuildReport,
}

impl BuiltWorkflow {
    /// The batch built for position `index`. Skipped positions have none.
    pub fn batch(&self, index: usize) -> Option<&Arc<Batch>> {
        self.batches.get(index).and_then(Option::as_ref)
    }

    pub fn batches(&self) -> impl Iterator<Item = (usize, &Arc<Batch>)> {
        self.batches
            .iter()
            .enumerate()
            .filter_map(|(index, batch)| batch.as_ref().map(|batch| (index, batch)))
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }
}

impl Schema {
    /// Instantiates every node through `factory`, wires the joins and hands
    /// the result to `scheduler`.
    ///
    /// Empty nodes outside any join are skipped. An empty node that a join
    /// names is a [`BuildError::EmptyNode`].
    pub fn build<F>(&self, factory: &mut F, scheduler: &dyn Scheduler) -> Result<BuiltWorkflow, BuildError>
    where
        F: UnitFactory + ?Sized,
    {
        let started = Instant::now();

        if let Some(&join) = self.dangling_joins().first() {
            return Err(BuildError::DanglingJoin { join });
        }

        let (warnings, errors): (Vec<_>, Vec<_>) = validate_schema(self)
            .into_iter()
            .partition(ValidationError::is_warning);
        if !errors.is_empty() {
            return Err(BuildError::InvalidSchema(errors));
        }
        for warning in &warnings {
            ValidationWarning { warning }.log();
        }

        let participants: HashSet<usize> = self
            .joins()
            .iter()
            .flat_map(|join| join.sources().iter().chain(join.targets()).copied())
            .collect();

        let mut batches: Vec<Option<Arc<Batch>>> = vec![None; self.len()];
        let mut leftovers: Vec<Vec<String>> = vec![Vec::new(); self.len()];
        for (index, node) in self.nodes() {
            if node.is_empty() {
                if participants.contains(&index) {
                    return Err(BuildError::EmptyNode { index });
                }
                continue;
            }

            let (units, leftover) = factory.create(node.argv())?;
            if units.is_empty() {
                return Err(BuildError::EmptyBatch { index });
            }
            let duplicated = units.len() > 1;
            let tasks = units
                .into_iter()
                .enumerate()
                .map(|(member, unit)| {
                    let marker = if duplicated {
                        format!("{}:{}/{}", index, unit.name(), member)
                    } else {
                        format!("{}:{}", index, unit.name())
                    };
                    Arc::new(Task::new(marker, unit))
                })
                .collect();
            batches[index] = Some(Arc::new(Batch::new(tasks)));
            leftovers[index] = leftover;
        }

        let batch_at = |index: usize| -> Result<Arc<Batch>, BuildError> {
            batches
                .get(index)
                .and_then(Option::clone)
                .ok_or(BuildError::EmptyNode { index })
        };

        for spec in self.joins() {
            let sources = spec.sources().iter().map(|&i| batch_at(i)).collect::<Result<Vec<_>, _>>()?;
            let targets = spec.targets().iter().map(|&i| batch_at(i)).collect::<Result<Vec<_>, _>>()?;
            let classifier = match spec.kind() {
                JoinKind::Switch => factory.classifier(spec.sources()[0], spec.targets()),
                _ => None,
            };
            joins::for_spec(spec, classifier).join(&sources, &targets)?;
            JoinWired {
                join: spec.id(),
                kind: spec.kind(),
                sources: spec.sources(),
                targets: spec.targets(),
            }
            .log();
        }

        let mut report = BuildReport {
            leftovers: Vec::new(),
            warnings,
        };
        let mut rounds: BTreeMap<usize, Vec<(Arc<Task>, Audit)>> = BTreeMap::new();
        for (index, node) in self.nodes() {
            let Some(batch) = batches[index].as_ref() else {
                continue;
            };
            let leftover = std::mem::take(&mut leftovers[index]);
            match node.source() {
                NodeSource::Join(join) => {
                    if !leftover.is_empty() {
                        LeftoverArgumentsIgnored {
                            index,
                            join,
                            args: &leftover,
                        }
                        .log();
                        report.leftovers.push(LeftoverArguments { index, args: leftover });
                    }
                }
                NodeSource::Global => scheduler.register_instance(Arc::clone(batch)),
                NodeSource::Round(round) => {
                    let input = Value::Array(leftover.into_iter().map(Value::String).collect());
                    let entries = rounds.entry(round).or_default();
                    for task in batch.tasks() {
                        entries.push((Arc::clone(task), Audit::new(input.clone(), Source::Nil)));
                    }
                }
            }
        }

        let scheduled = rounds.len();
        for (round, entries) in rounds {
            scheduler.schedule_round(round, entries);
        }

        let built = BuiltWorkflow { batches, report };
        BuildCompleted {
            units: built.batches().map(|(_, batch)| batch.len()).sum(),
            joins: self.joins().len(),
            rounds: scheduled,
            leftovers: built.report.leftovers.len(),
            duration: started.elapsed(),
        }
        .log();
        Ok(built)
    }
}
