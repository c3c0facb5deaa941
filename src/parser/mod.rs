// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-pass compiler from workflow tokens to a [`Schema`].
//!
//! Tokens are read left to right. Plain tokens accumulate into the arguments
//! of the node at `current_index`; break tokens finalize that node (moving to
//! the next position only if it collected arguments) and then apply a
//! structural directive. Tokens between `-.` and `.-` are taken literally,
//! and `---` stops parsing, handing back whatever follows.
//!
//! ```rust
//! use the_joinery::parser::Parser;
//!
//! let mut parser = Parser::new();
//! let remainder = parser.parse(["a", "--:", "b", "--", "c", "---", "rest"]).unwrap();
//!
//! assert_eq!(remainder, vec!["rest"]);
//! let schema = parser.into_schema();
//! assert_eq!(schema.argvs(), vec![vec!["a"], vec!["b"], vec!["c"]]);
//! assert_eq!(schema.joins().len(), 1);
//! ```

pub mod breaks;

pub use breaks::Break;

use crate::errors::ParseError;
use crate::observability::messages::parser::{BreakApplied, EndFlagReached, ParseCompleted};
use crate::observability::messages::StructuredLog;
use crate::schema::{JoinKind, Schema};

use breaks::{is_break_shaped, END_FLAG, ESCAPE_BEGIN, ESCAPE_END};

#[derive(Debug, Default)]
pub struct Parser {
    schema: Schema,
    current_index: usize,
    escaped: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// The position currently collecting arguments.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The position before the current one, or 0 at the start.
    pub fn previous_index(&self) -> usize {
        self.current_index.saturating_sub(1)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn into_schema(self) -> Schema {
        self.schema
    }

    /// Splits `input` with shell quoting rules, then parses the tokens.
    pub fn parse_str(&mut self, input: &str) -> Result<Vec<String>, ParseError> {
        let tokens = shlex::split(input).ok_or_else(|| ParseError::UnbalancedQuotes {
            input: input.to_string(),
        })?;
        self.parse(tokens)
    }

    /// Parses tokens into the schema. Returns the tokens after an end flag,
    /// or nothing if the input was consumed entirely.
    pub fn parse<I, S>(&mut self, tokens: I) -> Result<Vec<String>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        while let Some(token) = tokens.next() {
            if self.escaped {
                if token == ESCAPE_END {
                    self.escaped = false;
                } else {
                    self.push_arg(token);
                }
                continue;
            }

            if token == ESCAPE_BEGIN {
                self.escaped = true;
            } else if token == END_FLAG {
                let remainder: Vec<String> = tokens.collect();
                EndFlagReached {
                    remainder: remainder.len(),
                }
                .log();
                self.log_completed(remainder.len());
                return Ok(remainder);
            } else if is_break_shaped(&token) {
                let directive = Break::parse(&token)?;
                self.finalize();
                self.apply(directive)?;
                BreakApplied {
                    token: &token,
                    current_index: self.current_index,
                }
                .log();
            } else {
                self.push_arg(token);
            }
        }
        self.log_completed(0);
        Ok(Vec::new())
    }

    fn push_arg(&mut self, token: String) {
        self.schema.node_mut(self.current_index).push_arg(token);
    }

    fn finalize(&mut self) {
        let filled = self
            .schema
            .node(self.current_index)
            .map_or(false, |node| !node.is_empty());
        if filled {
            self.current_index += 1;
        }
    }

    fn apply(&mut self, directive: Break) -> Result<(), ParseError> {
        let (previous, current) = (self.previous_index(), self.current_index);
        match directive {
            Break::Plain => {}
            Break::Round { round, indices } => {
                let indices = indices.unwrap_or_else(|| vec![current]);
                self.schema.set_round(round, &indices);
            }
            Break::Sequence { indices, flags } => {
                let last = indices.len() - 1;
                let chain: Vec<usize> = indices
                    .iter()
                    .enumerate()
                    .map(|(position, index)| match index {
                        Some(index) => *index,
                        None if position == last => current,
                        None => previous,
                    })
                    .collect();
                for pair in chain.windows(2) {
                    self.schema.set(JoinKind::Sequence, &pair[..1], &pair[1..], flags)?;
                }
            }
            Break::Instance { index } => self.schema.set_global(index.unwrap_or(current)),
            Break::Join {
                kind,
                anchor,
                members,
                flags,
            } => {
                if kind.is_reverse() {
                    let target = anchor.unwrap_or(current);
                    let sources = if members.is_empty() { vec![previous] } else { members };
                    self.schema.set(kind, &sources, &[target], flags)?;
                } else {
                    let source = anchor.unwrap_or(previous);
                    let targets = if members.is_empty() { vec![current] } else { members };
                    self.schema.set(kind, &[source], &targets, flags)?;
                }
            }
        }
        Ok(())
    }

    fn log_completed(&self, remainder: usize) {
        ParseCompleted {
            nodes: self.schema.len(),
            joins: self.schema.joins().len(),
            remainder,
        }
        .log();
    }
}
