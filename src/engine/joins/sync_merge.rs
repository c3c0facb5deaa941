// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use parking_lot::Mutex;

use super::{dispatch, Join};
use crate::audit::Audit;
use crate::engine::{Batch, Combinator};
use crate::errors::ExecutionError;
use crate::observability::messages::join::SyncCombinationCompleted;
use crate::observability::messages::StructuredLog;
use crate::schema::{JoinFlags, JoinId, JoinKind};
use crate::traits::Scheduler;

/// Synchronized fan-in.
///
/// Every combination of one member from each source batch gets a slot array
/// with one slot per source. A completing member fills its slot in every
/// combination it takes part in; a combination whose slots are all filled is
/// merged with [`Audit::merge`], forwarded to the target and reset.
#[derive(Debug, Clone)]
pub struct SyncMerge {
    id: JoinId,
    flags: JoinFlags,
}

impl SyncMerge {
    pub fn new(id: JoinId, flags: JoinFlags) -> Self {
        Self { id, flags }
    }
}

impl Join for SyncMerge {
    fn id(&self) -> JoinId {
        self.id
    }

    fn kind(&self) -> JoinKind {
        JoinKind::SyncMerge
    }

    fn connect(&self, sources: &[Arc<Batch>], targets: &[Arc<Batch>]) {
        let flags = self.flags;
        let target = Arc::clone(&targets[0]);
        let label = target
            .tasks()
            .first()
            .map(|task| task.marker().to_string())
            .unwrap_or_else(|| self.id.to_string());

        let members: Vec<Vec<usize>> = sources
            .iter()
            .map(|batch| (0..batch.participants(flags.unbatched).len()).collect())
            .collect();
        let slots = Arc::new(Slots::new(label, Combinator::from_sets(members)));

        for (slot, source) in sources.iter().enumerate() {
            for (member, task) in source.participants(flags.unbatched).iter().enumerate() {
                let slots = Arc::clone(&slots);
                let target = Arc::clone(&target);
                task.on_complete(Arc::new(
                    move |scheduler: &dyn Scheduler, audit: Audit| -> Result<(), ExecutionError> {
                        for merged in slots.contribute(slot, member, audit)? {
                            dispatch(scheduler, flags, &target, merged)?;
                        }
                        Ok(())
                    },
                ));
            }
        }
    }
}

/// The slot arrays of one synchronized merge, shared by all of its callbacks.
pub(crate) struct Slots {
    target: String,
    combinations: Vec<Vec<usize>>,
    filled: Mutex<Vec<Vec<Option<Audit>>>>,
}

impl Slots {
    pub(crate) fn new(target: String, combinator: Combinator<usize>) -> Self {
        let combinations = combinator.combinations();
        let width = combinations.first().map_or(0, Vec::len);
        let filled = vec![vec![None; width]; combinations.len()];
        Self {
            target,
            combinations,
            filled: Mutex::new(filled),
        }
    }

    /// Fills `slot` with `audit` in every combination where that slot is
    /// `member`, returning the merged audit of each combination this
    /// completes. Nothing is written if any of those slots is still full.
    pub(crate) fn contribute(
        &self,
        slot: usize,
        member: usize,
        audit: Audit,
    ) -> Result<Vec<Audit>, ExecutionError> {
        let participating: Vec<usize> = self
            .combinations
            .iter()
            .enumerate()
            .filter(|(_, combination)| combination.get(slot) == Some(&member))
            .map(|(index, _)| index)
            .collect();

        let mut filled = self.filled.lock();
        if let Some(&combination) = participating.iter().find(|&&c| filled[c][slot].is_some()) {
            return Err(ExecutionError::SyncCollision {
                target: self.target.clone(),
                combination,
                slot,
            });
        }

        let mut ready = Vec::new();
        for combination in participating {
            let slots = &mut filled[combination];
            slots[slot] = Some(audit.fork());
            if slots.iter().all(Option::is_some) {
                let inputs: Vec<Audit> = slots.iter_mut().filter_map(Option::take).collect();
                SyncCombinationCompleted {
                    target: &self.target,
                    combination,
                    inputs: inputs.len(),
                }
                .log();
                ready.push(Audit::merge(inputs));
            }
        }
        Ok(ready)
    }
}
