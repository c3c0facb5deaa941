// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{dispatch, Join};
use crate::audit::Audit;
use crate::engine::Batch;
use crate::errors::ExecutionError;
use crate::schema::{JoinFlags, JoinId, JoinKind};
use crate::traits::Scheduler;

/// Fans each completed value out to every target as an independent fork.
#[derive(Debug, Clone)]
pub struct Fork {
    id: JoinId,
    flags: JoinFlags,
}

impl Fork {
    pub fn new(id: JoinId, flags: JoinFlags) -> Self {
        Self { id, flags }
    }
}

impl Join for Fork {
    fn id(&self) -> JoinId {
        self.id
    }

    fn kind(&self) -> JoinKind {
        JoinKind::Fork
    }

    fn connect(&self, sources: &[Arc<Batch>], targets: &[Arc<Batch>]) {
        let flags = self.flags;
        let targets: Arc<[Arc<Batch>]> = targets.into();
        for task in sources[0].participants(flags.unbatched) {
            let targets = Arc::clone(&targets);
            task.on_complete(Arc::new(
                move |scheduler: &dyn Scheduler, audit: Audit| -> Result<(), ExecutionError> {
                    for target in targets.iter() {
                        dispatch(scheduler, flags, target, audit.fork())?;
                    }
                    Ok(())
                },
            ));
        }
    }
}
