// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Property-based tests: compaction keeps rounds contiguous and compacted
//! schemas survive a dump and reparse unchanged.

use proptest::prelude::*;
use the_joinery::schema::{JoinFlags, JoinKind, Schema};

const MAX_NODES: usize = 6;

#[derive(Debug, Clone)]
enum Edit {
    Join {
        kind: JoinKind,
        anchor: usize,
        members: Vec<usize>,
        flags: JoinFlags,
    },
    Round(usize, usize),
    Global(usize),
    Clear(usize),
}

fn arb_kind() -> impl Strategy<Value = JoinKind> {
    prop_oneof![
        Just(JoinKind::Sequence),
        Just(JoinKind::Fork),
        Just(JoinKind::Switch),
        Just(JoinKind::Merge),
        Just(JoinKind::SyncMerge),
    ]
}

fn arb_flags() -> impl Strategy<Value = JoinFlags> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(iterate, stack, unbatched)| {
        let mut flags = JoinFlags::default();
        if iterate {
            flags = flags.iterate();
        }
        if stack {
            flags = flags.stack();
        }
        if unbatched {
            flags = flags.unbatched();
        }
        flags
    })
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (arb_kind(), 0..MAX_NODES, prop::collection::vec(0..MAX_NODES, 1..4), arb_flags()).prop_map(
            |(kind, anchor, members, flags)| Edit::Join {
                kind,
                anchor,
                members,
                flags,
            }
        ),
        2 => (0usize..4, 0..MAX_NODES).prop_map(|(round, index)| Edit::Round(round, index)),
        1 => (0..MAX_NODES).prop_map(Edit::Global),
        1 => (0..MAX_NODES).prop_map(Edit::Clear),
    ]
}

/// Every position holds arguments unless a later edit clears it; joins use the
/// one-anchor shapes the workflow grammar can express.
fn build(argvs: &[Vec<String>], edits: &[Edit]) -> Schema {
    let mut schema = Schema::new();
    let mut cleared = vec![false; argvs.len()];
    for edit in edits {
        if let Edit::Clear(index) = edit {
            cleared[*index] = true;
        }
    }
    for (index, argv) in argvs.iter().enumerate() {
        let node = schema.node_mut(index);
        if !cleared[index] {
            for arg in argv {
                node.push_arg(arg.as_str());
            }
        }
    }

    for edit in edits {
        match edit {
            Edit::Join {
                kind,
                anchor,
                members,
                flags,
            } => {
                let result = match kind {
                    JoinKind::Sequence => schema.set(*kind, &[*anchor], &members[..1], *flags),
                    JoinKind::Fork | JoinKind::Switch => schema.set(*kind, &[*anchor], members, *flags),
                    JoinKind::Merge | JoinKind::SyncMerge => schema.set(*kind, members, &[*anchor], *flags),
                };
                assert!(result.is_ok());
            }
            Edit::Round(round, index) => schema.set_round(*round, &[*index]),
            Edit::Global(index) => schema.set_global(*index),
            Edit::Clear(_) => {}
        }
    }
    schema
}

/// Plain words mixed with tokens the grammar reserves, so dumps have to
/// escape them.
fn arb_word() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z]{1,5}",
        1 => prop_oneof![
            Just("--"),
            Just(".-"),
            Just("-."),
            Just("---"),
            Just("--0:1"),
            Just("--+"),
            Just("--*"),
        ]
        .prop_map(String::from),
    ]
}

fn arb_argv() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_word(), 1..4)
}

fn arb_schema() -> impl Strategy<Value = Schema> {
    (
        prop::collection::vec(arb_argv(), MAX_NODES),
        prop::collection::vec(arb_edit(), 0..10),
    )
        .prop_map(|(argvs, edits)| build(&argvs, &edits))
}

proptest! {
    #[test]
    fn compaction_leaves_dense_nodes_and_contiguous_rounds(schema in arb_schema()) {
        let compacted = schema.clone().compacted();

        let positions: Vec<usize> = compacted.nodes().map(|(index, _)| index).collect();
        prop_assert_eq!(positions, (0..compacted.len()).collect::<Vec<_>>());
        prop_assert!(compacted.nodes().all(|(_, node)| !node.is_empty()));
        prop_assert!(compacted.dangling_joins().is_empty());

        let rounds = compacted.rounds();
        for (round, members) in rounds.iter().enumerate() {
            prop_assert!(!members.is_empty(), "round {} is empty", round);
        }
        for (_, node) in compacted.nodes() {
            if let Some(round) = node.round() {
                prop_assert!(round < rounds.len());
            }
        }

        for join in compacted.joins() {
            for &index in join.sources().iter().chain(join.targets()) {
                prop_assert!(index < compacted.len());
            }
        }
    }

    #[test]
    fn compaction_is_idempotent(schema in arb_schema()) {
        let once = schema.compacted();
        let twice = once.clone().compacted();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn compacted_schema_survives_reparse(schema in arb_schema()) {
        let compacted = schema.compacted();
        let reparsed = Schema::parse(&compacted.to_string()).unwrap();
        prop_assert_eq!(reparsed, compacted);
    }
}
