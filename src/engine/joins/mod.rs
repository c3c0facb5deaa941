// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime wiring for schema joins.
//!
//! Each join kind registers completion callbacks on its source tasks. When a
//! source completes, the callback moves the completed audit on to the
//! target batch(es) according to the kind's fan policy and the join's
//! [`JoinFlags`].

mod fork;
mod merge;
mod sequence;
mod switch;
mod sync_merge;

pub use fork::Fork;
pub use merge::Merge;
pub use sequence::Sequence;
pub use switch::{integer_classifier, Classifier, Switch};
pub use sync_merge::SyncMerge;

use std::sync::Arc;

use crate::audit::Audit;
use crate::engine::Batch;
use crate::errors::{BuildError, ExecutionError};
use crate::observability::messages::join::JoinDispatched;
use crate::observability::messages::StructuredLog;
use crate::schema::{JoinFlags, JoinId, JoinKind, JoinSpec};
use crate::traits::Scheduler;

pub trait Join: Send + Sync {
    fn id(&self) -> JoinId;

    fn kind(&self) -> JoinKind;

    /// Registers callbacks. Arity has already been checked.
    fn connect(&self, sources: &[Arc<Batch>], targets: &[Arc<Batch>]);

    fn join(&self, sources: &[Arc<Batch>], targets: &[Arc<Batch>]) -> Result<(), BuildError> {
        if !self.kind().accepts(sources.len(), targets.len()) {
            return Err(BuildError::JoinArity {
                join: self.id(),
                kind: self.kind(),
                sources: sources.len(),
                targets: targets.len(),
            });
        }
        self.connect(sources, targets);
        Ok(())
    }
}

/// The runtime join for a recorded join spec. Switches without a classifier
/// use [`integer_classifier`].
pub fn for_spec(spec: &JoinSpec, classifier: Option<Classifier>) -> Box<dyn Join> {
    let (id, flags) = (spec.id(), spec.flags());
    match spec.kind() {
        JoinKind::Sequence => Box::new(Sequence::new(id, flags)),
        JoinKind::Fork => Box::new(Fork::new(id, flags)),
        JoinKind::Merge => Box::new(Merge::new(id, flags)),
        JoinKind::SyncMerge => Box::new(SyncMerge::new(id, flags)),
        JoinKind::Switch => Box::new(Switch::new(
            id,
            flags,
            classifier.unwrap_or_else(integer_classifier),
        )),
    }
}

/// Delivers an audit to a target batch, expanding it first when iterating
/// and queueing instead of running when stacking.
pub(crate) fn dispatch(
    scheduler: &dyn Scheduler,
    flags: JoinFlags,
    target: &Batch,
    audit: Audit,
) -> Result<(), ExecutionError> {
    let audits = if flags.iterate {
        audit.expand()?
    } else {
        vec![audit]
    };
    let participants = target.participants(flags.unbatched);

    JoinDispatched {
        values: audits.len(),
        targets: participants.len(),
        stacked: flags.stack,
    }
    .log();

    for audit in audits {
        for task in participants {
            if flags.stack {
                scheduler.enqueue(Arc::clone(task), audit.fork());
            } else {
                scheduler.execute(task, audit.fork())?;
            }
        }
    }
    Ok(())
}
