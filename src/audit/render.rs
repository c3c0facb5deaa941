// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Diagnostic tree rendering for audits. Not round-trippable.

use std::fmt;

use serde_json::Value;

use super::{Audit, Source};

impl fmt::Display for Audit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        render(self, "", &mut lines);
        for line in lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Merged branches are drawn side by side: branch `n` is shifted right by `n`
/// connectors, each branch is closed by a vertical continuation line, and the
/// merged entry joins all branches with one stroke per branch.
fn render(audit: &Audit, indent: &str, lines: &mut Vec<String>) {
    for (source, value) in audit.sources().iter().zip(audit.values()) {
        match source {
            Source::Merge(merge) => {
                let children = merge.children();
                for (level, child) in children.iter().enumerate() {
                    let branch_indent = format!("{}{}", indent, "| ".repeat(level));
                    render(child, &branch_indent, lines);
                    let continuation = format!("{}{}", indent, "| ".repeat(level + 1));
                    lines.push(continuation.trim_end().to_string());
                }
                lines.push(format!(
                    "{}{}o-[{}] {}",
                    indent,
                    "`-".repeat(children.len()),
                    label(source),
                    value_text(value)
                ));
            }
            Source::Audit(nested) => render(nested, indent, lines),
            _ => lines.push(format!(
                "{}o-[{}] {}",
                indent,
                label(source),
                value_text(value)
            )),
        }
    }
}

fn label(source: &Source) -> String {
    match source {
        Source::Nil => String::new(),
        Source::Marker(marker) => marker.to_string(),
        Source::Merge(_) => "merge".to_string(),
        Source::Audit(_) => "audit".to_string(),
        Source::Split(split) => format!("split:{}", split.name()),
        Source::Expand(expand) => format!("expand:{}", expand.position()),
    }
}

fn value_text(value: &Value) -> String {
    value.to_string()
}
