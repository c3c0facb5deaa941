// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a join within its owning schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinId(pub usize);

impl fmt::Display for JoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of fan policies a join can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// One source to one target, forwarded unmodified.
    Sequence,
    /// One source to many targets, each receiving an independent fork.
    Fork,
    /// Many sources to one target, unsynchronized.
    Merge,
    /// Many sources to one target, one combined value per complete combination.
    SyncMerge,
    /// One source to at most one of many targets, chosen by a classifier.
    Switch,
}

impl JoinKind {
    /// Reverse joins are written target-first even though the target is the
    /// last participant to complete.
    pub fn is_reverse(&self) -> bool {
        matches!(self, JoinKind::Merge | JoinKind::SyncMerge)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Sequence => "sequence",
            JoinKind::Fork => "fork",
            JoinKind::Merge => "merge",
            JoinKind::SyncMerge => "sync_merge",
            JoinKind::Switch => "switch",
        }
    }

    /// Whether `sources` and `targets` fit this kind's fan policy.
    pub fn accepts(&self, sources: usize, targets: usize) -> bool {
        match self {
            JoinKind::Sequence => sources == 1 && targets == 1,
            JoinKind::Fork | JoinKind::Switch => sources == 1 && targets >= 1,
            JoinKind::Merge | JoinKind::SyncMerge => sources >= 1 && targets == 1,
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name to letter mapping for join behavior flags, in serialization order.
pub const FLAG_LETTERS: [(char, &str); 3] = [('i', "iterate"), ('s', "stack"), ('u', "unbatched")];

/// Behavior flags shared by every join kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinFlags {
    /// Treat a completed value as a collection and dispatch once per element.
    pub iterate: bool,
    /// Enqueue downstream units instead of executing them immediately.
    pub stack: bool,
    /// Operate on the first physical unit only, not the whole batch.
    pub unbatched: bool,
}

impl JoinFlags {
    pub fn iterate(mut self) -> Self {
        self.iterate = true;
        self
    }

    pub fn stack(mut self) -> Self {
        self.stack = true;
        self
    }

    pub fn unbatched(mut self) -> Self {
        self.unbatched = true;
        self
    }

    /// Parses trailing break letters. Returns `None` on an unknown letter.
    pub fn from_letters(letters: &str) -> Option<Self> {
        let mut flags = Self::default();
        for letter in letters.chars() {
            let (_, name) = FLAG_LETTERS.iter().find(|(l, _)| *l == letter)?;
            *flags.slot(name) = true;
        }
        Some(flags)
    }

    /// Letters for every set flag, sorted.
    pub fn letters(&self) -> String {
        let mut flags = *self;
        FLAG_LETTERS
            .iter()
            .filter(|(_, name)| *flags.slot(name))
            .map(|(letter, _)| *letter)
            .collect()
    }

    fn slot(&mut self, name: &str) -> &mut bool {
        match name {
            "iterate" => &mut self.iterate,
            "stack" => &mut self.stack,
            _ => &mut self.unbatched,
        }
    }
}

/// A recorded edge of the workflow graph.
///
/// Participants are node positions in the owning [`Schema`](super::Schema);
/// the schema keeps both directions of every link in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub(crate) id: JoinId,
    pub(crate) kind: JoinKind,
    pub(crate) sources: Vec<usize>,
    pub(crate) targets: Vec<usize>,
    #[serde(default)]
    pub(crate) flags: JoinFlags,
}

impl JoinSpec {
    pub fn id(&self) -> JoinId {
        self.id
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn flags(&self) -> JoinFlags {
        self.flags
    }

    /// The join without its identity, for structural comparison.
    pub fn shape(&self) -> (JoinKind, Vec<usize>, Vec<usize>, JoinFlags) {
        (self.kind, self.sources.clone(), self.targets.clone(), self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_letters_are_sorted() {
        let flags = JoinFlags::default().unbatched().iterate();
        assert_eq!(flags.letters(), "iu");
        assert_eq!(JoinFlags::from_letters("usi"), Some(JoinFlags::default().iterate().stack().unbatched()));
        assert_eq!(JoinFlags::from_letters(""), Some(JoinFlags::default()));
        assert_eq!(JoinFlags::from_letters("q"), None);
    }

    #[test]
    fn test_arity_per_kind() {
        assert!(JoinKind::Sequence.accepts(1, 1));
        assert!(!JoinKind::Sequence.accepts(1, 2));
        assert!(JoinKind::Fork.accepts(1, 3));
        assert!(!JoinKind::Switch.accepts(2, 1));
        assert!(JoinKind::SyncMerge.accepts(3, 1));
        assert!(!JoinKind::Merge.accepts(2, 2));
        assert!(JoinKind::Merge.is_reverse());
        assert!(!JoinKind::Fork.is_reverse());
    }
}
