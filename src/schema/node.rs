// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::JoinId;

/// Where a node's input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSource {
    /// Enqueued directly in the given execution round.
    Round(usize),
    /// Fed by the given join.
    Join(JoinId),
    /// Instantiated once and registered globally, outside rounds and joins.
    Global,
}

impl Default for NodeSource {
    fn default() -> Self {
        NodeSource::Round(0)
    }
}

/// One unit's raw arguments plus its inbound and outbound links.
///
/// Links are only changed through the owning schema so both sides of every
/// edge stay consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) argv: Vec<String>,
    #[serde(default)]
    pub(crate) source: NodeSource,
    #[serde(default)]
    pub(crate) join: Option<JoinId>,
}

impl Node {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            ..Self::default()
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn push_arg(&mut self, arg: impl Into<String>) {
        self.argv.push(arg.into());
    }

    pub fn source(&self) -> NodeSource {
        self.source
    }

    /// The outbound join, if any.
    pub fn join(&self) -> Option<JoinId> {
        self.join
    }

    pub fn round(&self) -> Option<usize> {
        match self.source {
            NodeSource::Round(round) => Some(round),
            _ => None,
        }
    }

    pub fn is_global(&self) -> bool {
        self.source == NodeSource::Global
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}
