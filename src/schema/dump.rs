// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use super::{JoinKind, JoinSpec, Node, Schema};
use crate::parser::breaks::{is_break_shaped, END_FLAG, ESCAPE_BEGIN, ESCAPE_END, PLAIN_BREAK};

impl Schema {
    /// Serializes the schema back into workflow tokens.
    ///
    /// Arguments come first in positional order, then round assignments,
    /// joins in the order they were set, and finally globals. Parsing the
    /// result yields an equal schema whenever every position up to the last
    /// non-empty node holds arguments, which is always true after
    /// [`compact`](Schema::compact). Dangling joins cannot be expressed in the
    /// grammar and are omitted.
    pub fn dump(&self) -> Vec<String> {
        let last = self
            .nodes()
            .filter(|(_, node)| !node.is_empty())
            .map(|(index, _)| index)
            .last();

        let mut tokens = Vec::new();
        if let Some(last) = last {
            for index in 0..=last {
                if index > 0 {
                    tokens.push(PLAIN_BREAK.to_string());
                }
                push_argv(&mut tokens, self.node(index).map(Node::argv).unwrap_or_default());
            }
        }

        // Round 0 is the default, so only trailing placeholders need it spelled out.
        for (round, indices) in self.rounds().iter().enumerate() {
            let indices: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|&index| round > 0 || last.map_or(true, |last| index > last))
                .collect();
            if !indices.is_empty() {
                tokens.push(format!("{PLAIN_BREAK}+{round}[{}]", list(&indices)));
            }
        }

        for join in self.joins.iter().filter(|join| !join.sources.is_empty()) {
            tokens.push(join_token(join));
        }

        for index in self.globals() {
            tokens.push(format!("{PLAIN_BREAK}*{index}"));
        }
        tokens
    }
}

/// Shell-quoted workflow string, parseable by [`Schema::parse`].
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = self.dump();
        let line = shlex::try_join(tokens.iter().map(String::as_str)).map_err(|_| fmt::Error)?;
        f.write_str(&line)
    }
}

/// Escapes each argument the parser would otherwise read as grammar in its
/// own `-. arg .-` pair. A bare `.-` is only special inside an escape, so it
/// is always written unescaped.
fn push_argv(tokens: &mut Vec<String>, argv: &[String]) {
    for arg in argv {
        if is_break_shaped(arg) || arg == END_FLAG || arg == ESCAPE_BEGIN {
            tokens.push(ESCAPE_BEGIN.to_string());
            tokens.push(arg.clone());
            tokens.push(ESCAPE_END.to_string());
        } else {
            tokens.push(arg.clone());
        }
    }
}

fn join_token(join: &JoinSpec) -> String {
    let letters = join.flags.letters();
    let sources = list(&join.sources);
    let targets = list(&join.targets);
    match join.kind {
        JoinKind::Sequence => format!("{PLAIN_BREAK}{sources}:{targets}{letters}"),
        JoinKind::Fork => format!("{PLAIN_BREAK}{sources}[{targets}]{letters}"),
        JoinKind::Switch => format!("{PLAIN_BREAK}{sources}<{targets}>{letters}"),
        JoinKind::Merge => format!("{PLAIN_BREAK}{targets}{{{sources}}}{letters}"),
        JoinKind::SyncMerge => format!("{PLAIN_BREAK}{targets}({sources}){letters}"),
    }
}

fn list(indices: &[usize]) -> String {
    indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use crate::schema::{JoinFlags, JoinKind, Schema};

    #[test]
    fn test_dump_table_driven() {
        struct TestCase {
            name: &'static str,
            workflow: &'static str,
            expected: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "sequence",
                workflow: "a --: b -- c",
                expected: vec!["a", "--", "b", "--", "c", "--0:1"],
            },
            TestCase {
                name: "rounds",
                workflow: "-- a --+ b --++ c",
                expected: vec!["a", "--", "b", "--", "c", "--+1[1]", "--+2[2]"],
            },
            TestCase {
                name: "fork with flags",
                workflow: "a -- b -- c --0[1,2]si",
                expected: vec!["a", "--", "b", "--", "c", "--0[1,2]is"],
            },
            TestCase {
                name: "merge and sync merge",
                workflow: "a -- b -- c -- d --2{0,1} --3(2)",
                expected: vec!["a", "--", "b", "--", "c", "--", "d", "--2{0,1}", "--3(2)"],
            },
            TestCase {
                name: "switch",
                workflow: "a -- b -- c --0<1,2>",
                expected: vec!["a", "--", "b", "--", "c", "--0<1,2>"],
            },
            TestCase {
                name: "global",
                workflow: "a -- --* b",
                expected: vec!["a", "--", "b", "--*1"],
            },
            TestCase {
                name: "escaped break-shaped argument",
                workflow: "a -. -- --1 .- -- b",
                expected: vec!["a", "-.", "--", ".-", "-.", "--1", ".-", "--", "b"],
            },
            TestCase {
                name: "escape terminator as a plain argument",
                workflow: "a .- -. -- .- -- b",
                expected: vec!["a", ".-", "-.", "--", ".-", "--", "b"],
            },
        ];

        for case in test_cases {
            let schema = Schema::parse(case.workflow).unwrap();
            assert_eq!(schema.dump(), case.expected, "case: {}", case.name);
        }
    }

    #[test]
    fn test_display_round_trips() {
        let workflows = [
            "a --: b -- c",
            "-- a --+ b --++ c",
            "x 'y z' -- up --0[1]u --*",
            "a -- b -- c -- d --3(0,1,2)i",
            "a -. -- .- -- b --0:1s",
            "a .- -. -- .- -- b",
            "-. -. --- .- .- x -- b",
        ];
        for workflow in workflows {
            let schema = Schema::parse(workflow).unwrap();
            let reparsed = Schema::parse(&schema.to_string()).unwrap();
            assert_eq!(reparsed, schema, "workflow: {}", workflow);
        }
    }

    #[test]
    fn test_arguments_mixing_terminators_and_breaks_round_trip() {
        let schema = Schema::parse("a .- -. -- .- -- b").unwrap();
        assert_eq!(schema.argvs(), vec![vec!["a", ".-", "--"], vec!["b"]]);

        let reparsed = Schema::parse(&schema.to_string()).unwrap();
        assert_eq!(reparsed.argvs(), schema.argvs());
        assert_eq!(reparsed, schema);
    }

    #[test]
    fn test_dangling_joins_are_omitted() {
        let mut schema = Schema::new();
        schema.node_mut(0).push_arg("a");
        schema.node_mut(1).push_arg("b");
        schema.node_mut(2).push_arg("c");
        schema.set(JoinKind::Sequence, &[0], &[1], JoinFlags::default()).unwrap();
        schema.set(JoinKind::Sequence, &[0], &[2], JoinFlags::default()).unwrap();

        assert_eq!(schema.dump(), vec!["a", "--", "b", "--", "c", "--0:2"]);
    }
}
