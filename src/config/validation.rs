// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Schema validation for join integrity.
//!
//! Validation runs in two stages:
//!
//! 1. **Structural checks**: every join keeps at least one source, names only
//!    positions that hold a node, and has participant counts that fit its
//!    kind (sequence 1 to 1, fork and switch 1 to many, merge and sync merge
//!    many to 1).
//! 2. **Cycle detection**: a DFS over the join graph (source position to
//!    target position) with a recursion stack.
//!
//! Cycle detection needs resolvable edges, so it only runs when the
//! structural checks pass. Cycles come back as
//! [`ValidationError::CyclicJoinWarning`]: a loop gated by a switch or a
//! stacked join terminates, so they never fail a build.
//!
//! # Examples
//!
//! ```rust
//! use the_joinery::config::validate_schema;
//! use the_joinery::schema::Schema;
//!
//! let schema = Schema::parse("a --: b --1:0").unwrap();
//! let findings = validate_schema(&schema);
//!
//! assert_eq!(findings.len(), 1);
//! assert!(findings[0].is_warning());
//! ```

use std::collections::{BTreeMap, HashSet};

use crate::errors::ValidationError;
use crate::observability::messages::validation::{JoinCycleDetected, ValidationCompleted};
use crate::observability::messages::StructuredLog;
use crate::schema::Schema;

/// Checks a schema's joins, returning every error and warning found.
pub fn validate_schema(schema: &Schema) -> Vec<ValidationError> {
    let mut findings = validate_joins(schema);

    if findings.is_empty() {
        findings.extend(detect_join_cycles(schema));
    }

    let warnings = findings.iter().filter(|finding| finding.is_warning()).count();
    ValidationCompleted {
        errors: findings.len() - warnings,
        warnings,
    }
    .log();
    findings
}

fn validate_joins(schema: &Schema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for join in schema.joins() {
        if join.sources().is_empty() {
            errors.push(ValidationError::DanglingJoin { join: join.id() });
            continue;
        }

        for &index in join.sources().iter().chain(join.targets()) {
            if schema.node(index).is_none() {
                errors.push(ValidationError::MissingNode {
                    join: join.id(),
                    index,
                });
            }
        }

        if !join.kind().accepts(join.sources().len(), join.targets().len()) {
            errors.push(ValidationError::JoinArity {
                join: join.id(),
                kind: join.kind(),
                sources: join.sources().len(),
                targets: join.targets().len(),
            });
        }
    }

    errors
}

/// Finds loops in the join graph with a three-color DFS.
///
/// Positions on the current path are gray; finding a gray neighbor closes a
/// loop, which is reported from the neighbor back around to itself. Every
/// back edge yields one warning.
fn detect_join_cycles(schema: &Schema) -> Vec<ValidationError> {
    let mut graph: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, _) in schema.nodes() {
        graph.entry(index).or_default();
    }
    for join in schema.joins() {
        for &source in join.sources() {
            graph
                .entry(source)
                .or_default()
                .extend(join.targets().iter().copied());
        }
    }

    let mut visited = HashSet::new();
    let mut on_path = HashSet::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();

    for &start in graph.keys() {
        if !visited.contains(&start) {
            dfs_cycle_detection(start, &graph, &mut visited, &mut on_path, &mut path, &mut cycles);
        }
    }

    cycles
        .into_iter()
        .map(|cycle| {
            JoinCycleDetected { cycle: &cycle }.log();
            ValidationError::CyclicJoinWarning { cycle }
        })
        .collect()
}

fn dfs_cycle_detection(
    node: usize,
    graph: &BTreeMap<usize, Vec<usize>>,
    visited: &mut HashSet<usize>,
    on_path: &mut HashSet<usize>,
    path: &mut Vec<usize>,
    cycles: &mut Vec<Vec<usize>>,
) {
    visited.insert(node);
    on_path.insert(node);
    path.push(node);

    for &neighbor in graph.get(&node).map(Vec::as_slice).unwrap_or_default() {
        if on_path.contains(&neighbor) {
            if let Some(start) = path.iter().position(|&step| step == neighbor) {
                let mut cycle = path[start..].to_vec();
                cycle.push(neighbor);
                cycles.push(cycle);
            }
        } else if !visited.contains(&neighbor) {
            dfs_cycle_detection(neighbor, graph, visited, on_path, path, cycles);
        }
    }

    path.pop();
    on_path.remove(&node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{JoinFlags, JoinKind};

    fn schema(workflow: &str) -> Schema {
        Schema::parse(workflow).unwrap()
    }

    #[test]
    fn test_valid_schemas_have_no_findings() {
        for workflow in [
            "a",
            "a --: b --: c",
            "a --[] b -- c --0[1,2]",
            "a -- b --(0,1) c",
            "a --<1,2> b -- c",
        ] {
            assert!(validate_schema(&schema(workflow)).is_empty(), "{}", workflow);
        }
    }

    #[test]
    fn test_dangling_join() {
        let mut schema = schema("a -- b -- c");
        let first = schema.set(JoinKind::Sequence, &[0], &[1], JoinFlags::default()).unwrap();
        schema.set(JoinKind::Sequence, &[0], &[2], JoinFlags::default()).unwrap();

        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::DanglingJoin { join: first }]
        );
    }

    #[test]
    fn test_missing_node() {
        let mut schema = schema("a");
        let id = schema.set(JoinKind::Sequence, &[0], &[1], JoinFlags::default()).unwrap();
        // Linking creates the target position; a raw deserialized schema may not have it.
        let mut value = serde_json::to_value(&schema).unwrap();
        value["nodes"].as_array_mut().unwrap().truncate(1);
        let schema: Schema = serde_json::from_value(value).unwrap();

        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::MissingNode { join: id, index: 1 }]
        );
    }

    #[test]
    fn test_join_arity_per_kind() {
        struct TestCase {
            name: &'static str,
            kind: JoinKind,
            sources: Vec<usize>,
            targets: Vec<usize>,
        }

        let test_cases = vec![
            TestCase {
                name: "sequence to many",
                kind: JoinKind::Sequence,
                sources: vec![0],
                targets: vec![1, 2],
            },
            TestCase {
                name: "fork from many",
                kind: JoinKind::Fork,
                sources: vec![0, 1],
                targets: vec![2],
            },
            TestCase {
                name: "merge to many",
                kind: JoinKind::Merge,
                sources: vec![0],
                targets: vec![1, 2],
            },
            TestCase {
                name: "switch from many",
                kind: JoinKind::Switch,
                sources: vec![0, 1],
                targets: vec![2],
            },
        ];

        for case in test_cases {
            let mut schema = schema("a -- b -- c");
            schema
                .set(case.kind, &case.sources, &case.targets, JoinFlags::default())
                .unwrap();
            let findings = validate_schema(&schema);
            assert!(
                matches!(findings.as_slice(), [ValidationError::JoinArity { .. }]),
                "case {}: {:?}",
                case.name,
                findings
            );
        }
    }

    #[test]
    fn test_cycles_are_warnings_with_paths() {
        let findings = validate_schema(&schema("a --: b --: c --2:0"));
        assert_eq!(
            findings,
            vec![ValidationError::CyclicJoinWarning {
                cycle: vec![0, 1, 2, 0],
            }]
        );
        assert!(findings.iter().all(ValidationError::is_warning));
    }

    #[test]
    fn test_self_loop() {
        let mut schema = schema("a");
        schema.set(JoinKind::Sequence, &[0], &[0], JoinFlags::default()).unwrap();
        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::CyclicJoinWarning { cycle: vec![0, 0] }]
        );
    }

    #[test]
    fn test_cycle_detection_skipped_when_structure_invalid() {
        let mut schema = schema("a --: b --1:0");
        schema.set(JoinKind::Sequence, &[0], &[1, 2], JoinFlags::default()).unwrap();
        assert!(validate_schema(&schema).iter().all(|finding| !finding.is_warning()));
    }
}
