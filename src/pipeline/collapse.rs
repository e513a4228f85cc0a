//! Paragraph collapsing inside box containers
//!
//! Boxed sections render as one flowing paragraph per segment, with explicit
//! line breaks where the block parser produced separate paragraphs. This pass
//! rewrites every box container's child list accordingly. Headings and nested
//! containers stay put and restart the merge, and the rewrite is idempotent:
//! a segment that is already a single paragraph collapses to itself.

use crate::models::{Element, Elements, Inline, Inlines};

/// Merge sibling paragraphs inside every box container of the tree.
///
/// Traversal is an explicit work stack rather than recursion, so arbitrarily
/// deep trees cannot blow the call stack. Each container gets a freshly built
/// child list; nothing is removed from a list while iterating it.
pub fn collapse_tree(elements: &mut Elements) {
    let mut stack: Vec<&mut Element> = elements.iter_mut().collect();
    while let Some(element) = stack.pop() {
        if let Element::Box { children } = element {
            *children = merge_segments(std::mem::take(children));
            stack.extend(children.iter_mut());
        }
    }
}

/// Collapse each contiguous run of paragraphs into one, joined by line
/// breaks. Non-paragraph siblings pass through and end the current run.
fn merge_segments(children: Elements) -> Elements {
    let mut out = Vec::new();
    let mut run: Option<Inlines> = None;

    for child in children {
        match child {
            Element::Paragraph { content } => match run.as_mut() {
                Some(merged) => {
                    merged.push(Inline::LineBreak);
                    merged.extend(content);
                }
                None => run = Some(content),
            },
            other => {
                if let Some(merged) = run.take() {
                    out.push(Element::paragraph(merged));
                }
                out.push(other);
            }
        }
    }
    if let Some(merged) = run.take() {
        out.push(Element::paragraph(merged));
    }
    out
}
