//! Inline annotation
//!
//! The final inline-resolution pass walks the finished tree and expands the
//! text runs of every heading and paragraph through the registered inline
//! patterns, one ordered pass per pattern. Precedence is positional: a pass
//! only ever sees text that earlier passes left unclaimed, which is what
//! keeps chord-shaped parentheticals out of the vox class.

use regex::{Captures, Regex};

use super::{StageEntry, StageRegistry};
use crate::models::{Element, Elements, Inline, Inlines};

/// One inline grammar: a compiled pattern and a constructor for the inline
/// element built from each match.
#[derive(Debug, Clone)]
pub struct InlinePattern {
    regex: Regex,
    build: fn(&Captures<'_>) -> Inline,
}

impl InlinePattern {
    #[must_use]
    pub const fn new(regex: Regex, build: fn(&Captures<'_>) -> Inline) -> Self {
        Self { regex, build }
    }
}

/// Expand text runs throughout the tree, in registry order.
pub fn annotate(elements: &mut Elements, registry: &StageRegistry<InlinePattern>) {
    let mut stack: Vec<&mut Element> = elements.iter_mut().collect();
    while let Some(element) = stack.pop() {
        match element {
            Element::Heading { content, .. } | Element::Paragraph { content } => {
                *content = expand(std::mem::take(content), registry.entries());
            }
            Element::Box { children } => stack.extend(children.iter_mut()),
        }
    }
}

fn expand(mut runs: Inlines, patterns: &[StageEntry<InlinePattern>]) -> Inlines {
    for entry in patterns {
        runs = apply_pattern(runs, &entry.stage);
    }
    runs
}

/// One leftmost, non-overlapping pass of a single pattern over the text runs.
/// Runs produced by earlier patterns pass through untouched.
fn apply_pattern(runs: Inlines, pattern: &InlinePattern) -> Inlines {
    let mut out = Vec::new();
    for run in runs {
        let Inline::Text { text } = run else {
            out.push(run);
            continue;
        };

        let mut last = 0;
        for caps in pattern.regex.captures_iter(&text) {
            let matched = caps.get(0).map_or(0..0, |m| m.range());
            if matched.start > last {
                out.push(Inline::text(&text[last..matched.start]));
            }
            out.push((pattern.build)(&caps));
            last = matched.end;
        }

        if last == 0 {
            out.push(Inline::Text { text });
        } else if last < text.len() {
            out.push(Inline::text(&text[last..]));
        }
    }
    out
}
