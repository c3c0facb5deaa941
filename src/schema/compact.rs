// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{BTreeSet, HashMap};

use super::{JoinId, JoinSpec, Node, NodeSource, Schema};
use crate::observability::messages::{schema::SchemaCompacted, StructuredLog};

impl Schema {
    /// Drops empty nodes, renumbers the survivors densely and renumbers rounds
    /// into a contiguous sequence starting at 0, preserving their order.
    ///
    /// A join whose sources were all dropped is removed and its targets move
    /// to the natural round of those sources, the earliest round any of them
    /// was reachable from. A join whose targets were all dropped is removed.
    pub fn compact(&mut self) {
        let nodes_before = self.nodes().count();
        let joins_before = self.joins.len();

        let natural: Vec<Option<usize>> = (0..self.nodes.len())
            .map(|index| self.natural_round(index, &mut Vec::new()))
            .collect();

        let mut positions: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut next = 0;
        for (index, node) in self.nodes() {
            if !node.is_empty() {
                positions[index] = Some(next);
                next += 1;
            }
        }

        let mut ids: HashMap<JoinId, JoinId> = HashMap::new();
        let mut joins = Vec::with_capacity(self.joins.len());
        for join in std::mem::take(&mut self.joins) {
            let sources: Vec<usize> = join.sources.iter().filter_map(|&s| positions[s]).collect();
            let targets: Vec<usize> = join.targets.iter().filter_map(|&t| positions[t]).collect();
            if sources.is_empty() || targets.is_empty() {
                continue;
            }
            let id = JoinId(joins.len());
            ids.insert(join.id, id);
            joins.push(JoinSpec {
                id,
                kind: join.kind,
                sources,
                targets,
                flags: join.flags,
            });
        }

        let mut nodes: Vec<Option<Node>> = Vec::with_capacity(next);
        for (index, slot) in std::mem::take(&mut self.nodes).into_iter().enumerate() {
            let Some(node) = slot else { continue };
            if node.is_empty() {
                continue;
            }
            let source = match node.source {
                NodeSource::Join(id) => match ids.get(&id) {
                    Some(&id) => NodeSource::Join(id),
                    None => NodeSource::Round(natural[index].unwrap_or(0)),
                },
                other => other,
            };
            let join = node.join.and_then(|id| ids.get(&id).copied());
            nodes.push(Some(Node {
                argv: node.argv,
                source,
                join,
            }));
        }

        let used: BTreeSet<usize> = nodes
            .iter()
            .flatten()
            .filter_map(Node::round)
            .collect();
        let ranks: HashMap<usize, usize> = used.into_iter().enumerate().map(|(rank, round)| (round, rank)).collect();
        for node in nodes.iter_mut().flatten() {
            if let NodeSource::Round(round) = node.source {
                node.source = NodeSource::Round(ranks.get(&round).copied().unwrap_or(0));
            }
        }

        self.nodes = nodes;
        self.next_join = joins.len();
        self.joins = joins;

        SchemaCompacted {
            nodes_before,
            nodes_after: self.nodes.len(),
            joins_before,
            joins_after: self.joins.len(),
        }
        .log();
    }

    /// Consuming form of [`Schema::compact`].
    pub fn compacted(mut self) -> Self {
        self.compact();
        self
    }

    /// The earliest round from which `index` can be reached. Globals and
    /// nodes only reachable through a cycle have none.
    fn natural_round(&self, index: usize, visiting: &mut Vec<usize>) -> Option<usize> {
        if visiting.contains(&index) {
            return None;
        }
        let node = self.node(index)?;
        match node.source {
            NodeSource::Round(round) => Some(round),
            NodeSource::Global => None,
            NodeSource::Join(id) => {
                visiting.push(index);
                let round = self.join(id).and_then(|join| {
                    join.sources
                        .iter()
                        .filter_map(|&source| self.natural_round(source, visiting))
                        .min()
                });
                visiting.pop();
                round
            }
        }
    }
}
