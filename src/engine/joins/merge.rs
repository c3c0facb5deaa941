// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{dispatch, Join};
use crate::audit::Audit;
use crate::engine::Batch;
use crate::schema::{JoinFlags, JoinId, JoinKind};
use crate::traits::Scheduler;

/// Unsynchronized fan-in: every source forwards to the target on its own, in
/// whatever order sources happen to complete.
#[derive(Debug, Clone)]
pub struct Merge {
    id: JoinId,
    flags: JoinFlags,
}

impl Merge {
    pub fn new(id: JoinId, flags: JoinFlags) -> Self {
        Self { id, flags }
    }
}

impl Join for Merge {
    fn id(&self) -> JoinId {
        self.id
    }

    fn kind(&self) -> JoinKind {
        JoinKind::Merge
    }

    fn connect(&self, sources: &[Arc<Batch>], targets: &[Arc<Batch>]) {
        let flags = self.flags;
        for source in sources {
            for task in source.participants(flags.unbatched) {
                let target = Arc::clone(&targets[0]);
                task.on_complete(Arc::new(move |scheduler: &dyn Scheduler, audit: Audit| {
                    dispatch(scheduler, flags, &target, audit)
                }));
            }
        }
    }
}
