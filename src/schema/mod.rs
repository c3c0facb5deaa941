// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph IR for a workflow: positioned nodes plus the joins between them.
//!
//! A [`Schema`] is an arena of [`Node`]s addressed by position, with each
//! [`JoinSpec`] carrying explicit participant positions. Nodes are created
//! lazily by indexing, and every link change is routed through the schema so
//! both sides of an edge update together:
//!
//! - a node has at most one inbound source (a round, a join, or global) and at
//!   most one outbound join;
//! - giving a node a new inbound source removes it from the targets of the
//!   join that previously fed it (a join left with no targets is dropped);
//! - giving a node a new outbound join removes it from the sources of its
//!   previous join, which may leave that join dangling until compaction.
//!
//! # Examples
//!
//! ```rust
//! use the_joinery::schema::{JoinFlags, JoinKind, Schema};
//!
//! let mut schema = Schema::new();
//! schema.node_mut(0).push_arg("load");
//! schema.node_mut(1).push_arg("upcase");
//! schema.set(JoinKind::Sequence, &[0], &[1], JoinFlags::default()).unwrap();
//!
//! assert_eq!(schema.rounds(), vec![vec![0]]);
//! assert_eq!(schema.dump(), vec!["load", "--", "upcase", "--0:1"]);
//! ```

mod build;
mod compact;
mod dump;
mod join_spec;
mod node;

pub use build::{BuildReport, BuiltWorkflow, LeftoverArguments};
pub use join_spec::{JoinFlags, JoinId, JoinKind, JoinSpec, FLAG_LETTERS};
pub use node::{Node, NodeSource};

use serde::{Deserialize, Serialize};

use crate::errors::{ParseError, SchemaError};
use crate::parser::Parser;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    nodes: Vec<Option<Node>>,
    #[serde(default)]
    joins: Vec<JoinSpec>,
    #[serde(default)]
    next_join: usize,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a workflow string into a schema, ignoring anything after an
    /// end flag.
    pub fn parse(workflow: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser.parse_str(workflow)?;
        Ok(parser.into_schema())
    }

    /// Number of node positions, including empty ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Option::is_none)
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index).and_then(Option::as_ref)
    }

    /// The node at `index`, created empty if the position is vacant.
    pub fn node_mut(&mut self, index: usize) -> &mut Node {
        if self.nodes.len() <= index {
            self.nodes.resize_with(index + 1, || None);
        }
        self.nodes[index].get_or_insert_with(Node::default)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.as_ref().map(|node| (index, node)))
    }

    /// Arguments for every position; vacant positions read as empty.
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.nodes
            .iter()
            .map(|node| node.as_ref().map(|n| n.argv.clone()).unwrap_or_default())
            .collect()
    }

    pub fn joins(&self) -> &[JoinSpec] {
        &self.joins
    }

    pub fn join(&self, id: JoinId) -> Option<&JoinSpec> {
        self.joins.iter().find(|join| join.id == id)
    }

    /// Records a join and links every participant to it.
    pub fn set(
        &mut self,
        kind: JoinKind,
        sources: &[usize],
        targets: &[usize],
        flags: JoinFlags,
    ) -> Result<JoinId, SchemaError> {
        if sources.is_empty() {
            return Err(SchemaError::NoSources { kind });
        }
        if targets.is_empty() {
            return Err(SchemaError::NoTargets { kind });
        }

        let id = JoinId(self.next_join);
        self.next_join += 1;
        self.joins.push(JoinSpec {
            id,
            kind,
            sources: dedup(sources),
            targets: dedup(targets),
            flags,
        });

        for &source in sources {
            self.link_outbound(source, id);
        }
        for &target in targets {
            self.link_inbound(target, NodeSource::Join(id));
        }
        Ok(id)
    }

    /// Enqueues each node directly in `round`, detaching it from any join.
    pub fn set_round(&mut self, round: usize, indices: &[usize]) {
        for &index in indices {
            self.link_inbound(index, NodeSource::Round(round));
        }
    }

    /// Marks a node global, detaching it from rounds and inbound joins.
    pub fn set_global(&mut self, index: usize) {
        self.link_inbound(index, NodeSource::Global);
    }

    /// Node positions grouped by round. Rounds nothing is assigned to are empty.
    pub fn rounds(&self) -> Vec<Vec<usize>> {
        let mut rounds: Vec<Vec<usize>> = Vec::new();
        for (index, node) in self.nodes() {
            if let Some(round) = node.round() {
                if rounds.len() <= round {
                    rounds.resize_with(round + 1, Vec::new);
                }
                rounds[round].push(index);
            }
        }
        rounds
    }

    pub fn globals(&self) -> Vec<usize> {
        self.nodes()
            .filter(|(_, node)| node.is_global())
            .map(|(index, _)| index)
            .collect()
    }

    /// Joins with no remaining source.
    pub fn dangling_joins(&self) -> Vec<JoinId> {
        self.joins
            .iter()
            .filter(|join| join.sources.is_empty())
            .map(|join| join.id)
            .collect()
    }

    fn join_mut(&mut self, id: JoinId) -> Option<&mut JoinSpec> {
        self.joins.iter_mut().find(|join| join.id == id)
    }

    fn link_inbound(&mut self, index: usize, source: NodeSource) {
        let previous = std::mem::replace(&mut self.node_mut(index).source, source);
        match previous {
            NodeSource::Join(old) if previous != source => {
                let orphaned = match self.join_mut(old) {
                    Some(join) => {
                        join.targets.retain(|&target| target != index);
                        join.targets.is_empty()
                    }
                    None => false,
                };
                if orphaned {
                    self.remove_join(old);
                }
            }
            _ => {}
        }
    }

    fn link_outbound(&mut self, index: usize, id: JoinId) {
        if let Some(old) = self.node_mut(index).join.replace(id) {
            if old != id {
                if let Some(join) = self.join_mut(old) {
                    join.sources.retain(|&source| source != index);
                }
            }
        }
    }

    fn remove_join(&mut self, id: JoinId) {
        let Some(position) = self.joins.iter().position(|join| join.id == id) else {
            return;
        };
        let join = self.joins.remove(position);
        for source in join.sources {
            if let Some(Some(node)) = self.nodes.get_mut(source) {
                if node.join == Some(id) {
                    node.join = None;
                }
            }
        }
        for target in join.targets {
            if let Some(Some(node)) = self.nodes.get_mut(target) {
                if node.source == NodeSource::Join(id) {
                    node.source = NodeSource::default();
                }
            }
        }
    }
}

/// Schemas compare by structure: arguments, rounds, globals and join shapes.
/// Join identities are not part of the comparison.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.argvs() == other.argvs()
            && self.rounds() == other.rounds()
            && self.globals() == other.globals()
            && self.joins.iter().map(JoinSpec::shape).eq(other.joins.iter().map(JoinSpec::shape))
    }
}

fn dedup(indices: &[usize]) -> Vec<usize> {
    let mut unique = Vec::with_capacity(indices.len());
    for &index in indices {
        if !unique.contains(&index) {
            unique.push(index);
        }
    }
    unique
}
