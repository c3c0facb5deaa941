// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Break tokens: the structural directives of the workflow grammar.
//!
//! | Break        | Syntax                               |
//! |--------------|--------------------------------------|
//! | plain        | `--`                                 |
//! | round        | `--+`, `--++`, `--+N`, `--+N[i,j]`   |
//! | sequence     | `--i:j:k`, `--:j:`, `--i:`           |
//! | instance     | `--*`, `--*i`                        |
//! | fork         | `--i[j,k]`                           |
//! | merge        | `--i{j,k}`                           |
//! | sync merge   | `--i(j,k)`                           |
//! | switch       | `--i<j,k>`                           |
//!
//! Sequence and bracketed breaks accept trailing flag letters (see
//! [`FLAG_LETTERS`](crate::schema::FLAG_LETTERS)).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ParseError;
use crate::schema::{JoinFlags, JoinKind};

pub const PLAIN_BREAK: &str = "--";
pub const ESCAPE_BEGIN: &str = "-.";
pub const ESCAPE_END: &str = ".-";
pub const END_FLAG: &str = "---";

static ROUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+(?:(\d+)|(\+*))(?:\[([\d,]*)\])?$").expect("valid round pattern"));
static SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d*(?::\d*)+)([A-Za-z]*)$").expect("valid sequence pattern"));
static INSTANCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*(\d*)$").expect("valid instance pattern"));
static BRACKETED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d*)([\[{(<])([\d,]*)([\]})>])([A-Za-z]*)$").expect("valid bracketed pattern")
});

/// Whether a token ends argument accumulation.
///
/// Anything starting with `--` whose third character is absent, or is neither
/// an ASCII letter nor `-`, is break-shaped. `--name` style options and the
/// `---` end flag are not.
pub fn is_break_shaped(token: &str) -> bool {
    match token.strip_prefix(PLAIN_BREAK) {
        Some(rest) => match rest.chars().next() {
            None => true,
            Some(c) => !(c.is_ascii_alphabetic() || c == '-'),
        },
        None => false,
    }
}

/// A parsed break. Open indices are `None` and are resolved against the
/// parser's position when applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Break {
    Plain,
    Round {
        round: usize,
        indices: Option<Vec<usize>>,
    },
    Sequence {
        indices: Vec<Option<usize>>,
        flags: JoinFlags,
    },
    Instance {
        index: Option<usize>,
    },
    /// A bracketed join. `anchor` is the written-first index: the source of a
    /// fork or switch, the target of a merge or sync merge.
    Join {
        kind: JoinKind,
        anchor: Option<usize>,
        members: Vec<usize>,
        flags: JoinFlags,
    },
}

impl Break {
    /// Parses a break token, with or without its leading `--`.
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        let body = token.strip_prefix(PLAIN_BREAK).unwrap_or(token);
        let unrecognized = || ParseError::UnrecognizedBreak {
            token: token.to_string(),
        };

        if body.is_empty() {
            return Ok(Break::Plain);
        }

        if let Some(captures) = ROUND.captures(body) {
            let round = match (captures.get(1), captures.get(2)) {
                (Some(digits), _) => number(digits.as_str()).ok_or_else(unrecognized)?,
                (None, Some(pluses)) => 1 + pluses.as_str().len(),
                (None, None) => 1,
            };
            let indices = match captures.get(3) {
                Some(list) => Some(numbers(list.as_str()).ok_or_else(unrecognized)?),
                None => None,
            };
            return Ok(Break::Round { round, indices });
        }

        if let Some(captures) = SEQUENCE.captures(body) {
            let pieces: Vec<&str> = captures[1].split(':').collect();
            let last = pieces.len() - 1;
            let mut indices = Vec::with_capacity(pieces.len());
            for (position, piece) in pieces.iter().enumerate() {
                if piece.is_empty() {
                    if position != 0 && position != last {
                        return Err(unrecognized());
                    }
                    indices.push(None);
                } else {
                    indices.push(Some(number(piece).ok_or_else(unrecognized)?));
                }
            }
            let flags = JoinFlags::from_letters(&captures[2]).ok_or_else(unrecognized)?;
            return Ok(Break::Sequence { indices, flags });
        }

        if let Some(captures) = INSTANCE.captures(body) {
            let index = match &captures[1] {
                "" => None,
                digits => Some(number(digits).ok_or_else(unrecognized)?),
            };
            return Ok(Break::Instance { index });
        }

        if let Some(captures) = BRACKETED.captures(body) {
            let kind = match (&captures[2], &captures[4]) {
                ("[", "]") => JoinKind::Fork,
                ("{", "}") => JoinKind::Merge,
                ("(", ")") => JoinKind::SyncMerge,
                ("<", ">") => JoinKind::Switch,
                _ => return Err(unrecognized()),
            };
            let anchor = match &captures[1] {
                "" => None,
                digits => Some(number(digits).ok_or_else(unrecognized)?),
            };
            let members = numbers(&captures[3]).ok_or_else(unrecognized)?;
            let flags = JoinFlags::from_letters(&captures[5]).ok_or_else(unrecognized)?;
            return Ok(Break::Join {
                kind,
                anchor,
                members,
                flags,
            });
        }

        Err(unrecognized())
    }
}

fn number(digits: &str) -> Option<usize> {
    digits.parse().ok()
}

fn numbers(list: &str) -> Option<Vec<usize>> {
    list.split(',')
        .filter(|piece| !piece.is_empty())
        .map(number)
        .collect()
}
