// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::audit::{Audit, SourceKey};
use crate::observability::messages::{engine::AuditAggregated, StructuredLog};

/// Default sink for values no join claims.
///
/// Completed audits are filed under the key of their current source, which is
/// normally the last unit that produced them. Every operation is serialized
/// behind one mutex, so the aggregator is safe to share across workers.
#[derive(Debug, Default)]
pub struct Aggregator {
    results: Mutex<HashMap<SourceKey, Vec<Audit>>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, result: Audit) {
        let key = result
            .current_source()
            .map(|source| source.key())
            .unwrap_or(SourceKey::Nil);

        AuditAggregated {
            key: &key,
            trail_length: result.len(),
        }
        .log();

        self.results.lock().entry(key).or_default().push(result);
    }

    pub fn retrieve(&self, key: &SourceKey) -> Vec<Audit> {
        self.results.lock().get(key).cloned().unwrap_or_default()
    }

    /// Audits for each key, concatenated in key order.
    pub fn retrieve_all(&self, keys: &[SourceKey]) -> Vec<Audit> {
        let results = self.results.lock();
        keys.iter()
            .filter_map(|key| results.get(key))
            .flat_map(|audits| audits.iter().cloned())
            .collect()
    }

    pub fn keys(&self) -> Vec<SourceKey> {
        let mut keys: Vec<SourceKey> = self.results.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Total number of stored audits across all keys.
    pub fn len(&self) -> usize {
        self.results.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes and returns everything stored so far.
    pub fn drain(&self) -> HashMap<SourceKey, Vec<Audit>> {
        std::mem::take(&mut *self.results.lock())
    }

    pub fn clear(&self) {
        self.results.lock().clear();
    }
}
