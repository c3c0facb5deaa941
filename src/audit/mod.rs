// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Append-only provenance trails for values flowing between units.
//!
//! Every value that moves through a workflow travels inside an [`Audit`]: two
//! parallel sequences pairing each recorded value with the [`Source`] that
//! produced it. Audits are value objects. When one value has to travel down
//! two or more unrelated paths it is [`fork`](Audit::fork)ed, so concurrent
//! paths never share a mutable trail, and when several values reconverge they
//! are [`merge`](Audit::merge)d so the combined value stays attributable to
//! each of its inputs.
//!
//! ```text
//! o-[] 1
//! |
//! | o-[] 10
//! | |
//! `-`-o-[merge] [1,10]
//! o-[c] 11
//! ```
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use the_joinery::audit::{Audit, Source, Trail};
//!
//! let mut audit = Audit::new(json!(1), Source::Nil);
//! audit.record("a", json!(2)).record("b", json!(3));
//!
//! assert_eq!(audit.original_value(), Some(&json!(1)));
//! assert_eq!(audit.current_value(), Some(&json!(3)));
//! assert_eq!(
//!     audit.value_trail(),
//!     vec![Trail::Leaf(json!(1)), Trail::Leaf(json!(2)), Trail::Leaf(json!(3))]
//! );
//! ```

mod render;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AuditError;

/// A plain source marker, typically the label of the physical unit that
/// produced a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(String);

impl Marker {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Marker {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Marker {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Source marker meaning "this value combines these child audits".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditMerge(Vec<Audit>);

impl AuditMerge {
    pub fn children(&self) -> &[Audit] {
        &self.0
    }
}

/// Source marker for a value derived by a named split callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AuditSplit(String);

impl AuditSplit {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Source marker for one element of an expanded collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AuditExpand(usize);

impl AuditExpand {
    pub fn position(&self) -> usize {
        self.0
    }
}

/// Everything that can be recorded as the producer of a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum Source {
    Nil,
    Marker(Marker),
    Merge(AuditMerge),
    /// The value continues a separate audit; trails inline that audit.
    Audit(Box<Audit>),
    Split(AuditSplit),
    Expand(AuditExpand),
}

impl Source {
    /// The hashable key under which a value from this source is aggregated.
    pub fn key(&self) -> SourceKey {
        match self {
            Source::Nil => SourceKey::Nil,
            Source::Marker(marker) => SourceKey::Marker(marker.clone()),
            Source::Merge(merge) => SourceKey::Merge(
                merge
                    .children()
                    .iter()
                    .map(|child| child.current_source().map(Source::key).unwrap_or(SourceKey::Nil))
                    .collect(),
            ),
            Source::Audit(nested) => nested
                .current_source()
                .map(Source::key)
                .unwrap_or(SourceKey::Nil),
            Source::Split(split) => SourceKey::Split(split.name().to_string()),
            Source::Expand(expand) => SourceKey::Expand(expand.position()),
        }
    }

    pub fn marker(&self) -> Option<&Marker> {
        match self {
            Source::Marker(marker) => Some(marker),
            _ => None,
        }
    }
}

impl From<Marker> for Source {
    fn from(marker: Marker) -> Self {
        Source::Marker(marker)
    }
}

impl From<&Marker> for Source {
    fn from(marker: &Marker) -> Self {
        Source::Marker(marker.clone())
    }
}

impl From<&str> for Source {
    fn from(label: &str) -> Self {
        Source::Marker(Marker::from(label))
    }
}

impl From<Option<Marker>> for Source {
    fn from(marker: Option<Marker>) -> Self {
        marker.map(Source::Marker).unwrap_or(Source::Nil)
    }
}

impl From<Audit> for Source {
    fn from(audit: Audit) -> Self {
        Source::Audit(Box::new(audit))
    }
}

impl From<AuditSplit> for Source {
    fn from(split: AuditSplit) -> Self {
        Source::Split(split)
    }
}

impl From<AuditExpand> for Source {
    fn from(expand: AuditExpand) -> Self {
        Source::Expand(expand)
    }
}

/// Hashable projection of a [`Source`]. A merge is keyed by the keys of its
/// children's current sources, in merge order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SourceKey {
    Nil,
    Marker(Marker),
    Merge(Vec<SourceKey>),
    Split(String),
    Expand(usize),
}

impl From<Marker> for SourceKey {
    fn from(marker: Marker) -> Self {
        SourceKey::Marker(marker)
    }
}

impl From<&str> for SourceKey {
    fn from(label: &str) -> Self {
        SourceKey::Marker(Marker::from(label))
    }
}

/// One step of a flattened trail. Merged steps keep one nested trail per
/// merged child so merges of merges stay attributable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Trail<T> {
    Leaf(T),
    Merge(Vec<Vec<Trail<T>>>),
}

/// Provenance record for one value.
///
/// `sources` and `values` always have the same length; `record` is the only
/// mutator and it appends one pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Audit {
    sources: Vec<Source>,
    values: Vec<Value>,
}

impl Audit {
    /// Creates a one-entry trail.
    pub fn new(value: impl Into<Value>, source: impl Into<Source>) -> Self {
        Self {
            sources: vec![source.into()],
            values: vec![value.into()],
        }
    }

    /// The empty trail, which is also the identity for [`Audit::merge`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Combines several audits into one.
    ///
    /// With no inputs the result is empty, with one input it is a fork of that
    /// input, and otherwise the result's current value is the array of every
    /// input's current value and its current source is an [`AuditMerge`] of
    /// forks of the inputs. Plain values are wrapped in a one-entry audit first.
    pub fn merge<I>(audits: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Audit>,
    {
        let mut audits: Vec<Audit> = audits.into_iter().map(Into::into).collect();
        match audits.len() {
            0 => Self::empty(),
            1 => audits.remove(0),
            _ => {
                let value = Value::Array(
                    audits
                        .iter()
                        .map(|a| a.current_value().cloned().unwrap_or(Value::Null))
                        .collect(),
                );
                Self {
                    sources: vec![Source::Merge(AuditMerge(audits))],
                    values: vec![value],
                }
            }
        }
    }

    /// Appends one (source, value) pair.
    pub fn record(&mut self, source: impl Into<Source>, value: impl Into<Value>) -> &mut Self {
        self.sources.push(source.into());
        self.values.push(value.into());
        self
    }

    /// An independently appendable copy of this trail.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Forks and records `f` applied to the current value under a split marker
    /// named after the callback.
    pub fn split<F>(&self, name: &str, f: F) -> Self
    where
        F: FnOnce(&Value) -> Value,
    {
        let value = f(self.current_value().unwrap_or(&Value::Null));
        let mut forked = self.fork();
        forked.record(AuditSplit(name.to_string()), value);
        forked
    }

    /// One fork per element of the current value, each recording the element
    /// under its position.
    pub fn expand(&self) -> Result<Vec<Audit>, AuditError> {
        match self.current_value() {
            Some(Value::Array(items)) => Ok(items
                .iter()
                .enumerate()
                .map(|(position, item)| {
                    let mut forked = self.fork();
                    forked.record(AuditExpand(position), item.clone());
                    forked
                })
                .collect()),
            other => Err(AuditError::NotIterable {
                value: other.cloned().unwrap_or(Value::Null).to_string(),
            }),
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn original_value(&self) -> Option<&Value> {
        self.values.first()
    }

    pub fn current_value(&self) -> Option<&Value> {
        self.values.last()
    }

    pub fn original_source(&self) -> Option<&Source> {
        self.sources.first()
    }

    pub fn current_source(&self) -> Option<&Source> {
        self.sources.last()
    }

    pub fn source_trail(&self) -> Vec<Trail<Source>> {
        let mut trail = Vec::with_capacity(self.len());
        self.collect_trail(&mut trail, &|source, _| source.clone());
        trail
    }

    pub fn value_trail(&self) -> Vec<Trail<Value>> {
        let mut trail = Vec::with_capacity(self.len());
        self.collect_trail(&mut trail, &|_, value| value.clone());
        trail
    }

    fn collect_trail<T>(&self, trail: &mut Vec<Trail<T>>, leaf: &dyn Fn(&Source, &Value) -> T) {
        for (source, value) in self.sources.iter().zip(&self.values) {
            match source {
                Source::Merge(merge) => {
                    let branches = merge
                        .children()
                        .iter()
                        .map(|child| {
                            let mut branch = Vec::with_capacity(child.len());
                            child.collect_trail(&mut branch, leaf);
                            branch
                        })
                        .collect();
                    trail.push(Trail::Merge(branches));
                }
                Source::Audit(nested) => nested.collect_trail(trail, leaf),
                _ => trail.push(Trail::Leaf(leaf(source, value))),
            }
        }
    }
}

impl From<Value> for Audit {
    fn from(value: Value) -> Self {
        Audit::new(value, Source::Nil)
    }
}

impl From<&Audit> for Audit {
    fn from(audit: &Audit) -> Self {
        audit.fork()
    }
}
