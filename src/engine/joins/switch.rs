// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use serde_json::Value;

use super::{dispatch, Join};
use crate::audit::Audit;
use crate::engine::Batch;
use crate::errors::ExecutionError;
use crate::observability::messages::join::SwitchRouted;
use crate::observability::messages::StructuredLog;
use crate::schema::{JoinFlags, JoinId, JoinKind};
use crate::traits::Scheduler;

/// Maps a completed audit to a target index, or `None` for no target.
pub type Classifier = Arc<dyn Fn(&Audit) -> Option<usize> + Send + Sync>;

/// Reads the current value as a non-negative integer index. Any other value
/// selects no target.
pub fn integer_classifier() -> Classifier {
    Arc::new(|audit: &Audit| {
        audit
            .current_value()
            .and_then(Value::as_u64)
            .and_then(|index| usize::try_from(index).ok())
    })
}

/// Conditional routing: each completed value goes to at most one target.
/// Values the classifier routes nowhere land in the aggregator.
#[derive(Clone)]
pub struct Switch {
    id: JoinId,
    flags: JoinFlags,
    classifier: Classifier,
}

impl Switch {
    pub fn new(id: JoinId, flags: JoinFlags, classifier: Classifier) -> Self {
        Self {
            id,
            flags,
            classifier,
        }
    }
}

impl Join for Switch {
    fn id(&self) -> JoinId {
        self.id
    }

    fn kind(&self) -> JoinKind {
        JoinKind::Switch
    }

    fn connect(&self, sources: &[Arc<Batch>], targets: &[Arc<Batch>]) {
        let flags = self.flags;
        let targets: Arc<[Arc<Batch>]> = targets.into();
        for task in sources[0].participants(flags.unbatched) {
            let targets = Arc::clone(&targets);
            let classifier = Arc::clone(&self.classifier);
            let marker = task.marker().clone();
            task.on_complete(Arc::new(
                move |scheduler: &dyn Scheduler, audit: Audit| -> Result<(), ExecutionError> {
                    let selected = classifier(&audit);
                    SwitchRouted {
                        source: &marker,
                        target: selected,
                    }
                    .log();
                    match selected {
                        None => {
                            scheduler.aggregator().store(audit);
                            Ok(())
                        }
                        Some(index) => match targets.get(index) {
                            Some(target) => dispatch(scheduler, flags, target, audit),
                            None => Err(ExecutionError::SwitchOutOfRange {
                                source_unit: marker.clone(),
                                index,
                                targets: targets.len(),
                            }),
                        },
                    }
                },
            ));
        }
    }
}
