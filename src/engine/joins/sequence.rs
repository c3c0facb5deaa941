// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{dispatch, Join};
use crate::audit::Audit;
use crate::engine::Batch;
use crate::schema::{JoinFlags, JoinId, JoinKind};
use crate::traits::Scheduler;

/// Forwards each completed value, unmodified, to the single target.
#[derive(Debug, Clone)]
pub struct Sequence {
    id: JoinId,
    flags: JoinFlags,
}

impl Sequence {
    pub fn new(id: JoinId, flags: JoinFlags) -> Self {
        Self { id, flags }
    }
}

impl Join for Sequence {
    fn id(&self) -> JoinId {
        self.id
    }

    fn kind(&self) -> JoinKind {
        JoinKind::Sequence
    }

    fn connect(&self, sources: &[Arc<Batch>], targets: &[Arc<Batch>]) {
        let flags = self.flags;
        for task in sources[0].participants(flags.unbatched) {
            let target = Arc::clone(&targets[0]);
            task.on_complete(Arc::new(move |scheduler: &dyn Scheduler, audit: Audit| {
                dispatch(scheduler, flags, &target, audit)
            }));
        }
    }
}
