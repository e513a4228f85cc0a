//! Block-level parsing
//!
//! The preprocessed document is split on blank lines into blocks, and each
//! block is claimed by the first stage in registry order whose test passes.
//! The box stage is the interesting one: it groups contiguous pipe-prefixed
//! lines into a box container and re-invokes block parsing on the cleaned
//! interior with the parser state switched to [`State::Box`].

use std::collections::VecDeque;

use super::StageRegistry;
use crate::models::{Element, Elements, Inline};
use crate::patterns::Patterns;

/// Block-parsing state, passed explicitly down the call chain.
///
/// Entering a box switches to [`State::Box`] for the recursive interior parse
/// only; the caller's state is untouched, so it cannot leak across sibling
/// blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Normal,
    Box,
}

/// Block processor stages, dispatched in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStage {
    Box,
    Empty,
    Heading,
    Paragraph,
}

pub(crate) struct BlockParser<'a> {
    pub patterns: &'a Patterns,
    pub stages: &'a StageRegistry<BlockStage>,
}

impl BlockParser<'_> {
    pub fn parse(&self, text: &str) -> Elements {
        let mut root = Vec::new();
        self.parse_blocks(&mut root, text, State::Normal);
        root
    }

    /// Split `text` on blank lines and feed each block through the stages.
    fn parse_blocks(&self, parent: &mut Elements, text: &str, state: State) {
        let mut queue: VecDeque<String> = text.split("\n\n").map(String::from).collect();
        while let Some(block) = queue.pop_front() {
            self.run_block(parent, block, &mut queue, state);
        }
    }

    fn run_block(
        &self,
        parent: &mut Elements,
        block: String,
        queue: &mut VecDeque<String>,
        state: State,
    ) {
        for entry in self.stages.entries() {
            match entry.stage {
                BlockStage::Box if self.test_box(&block) => {
                    self.run_box(parent, &block, state);
                    return;
                }
                BlockStage::Empty if block.trim().is_empty() => {
                    // Inside a box, a blank block marks a paragraph boundary
                    // that the collapse pass must still see.
                    if state == State::Box {
                        parent.push(Element::paragraph(Vec::new()));
                    }
                    return;
                }
                BlockStage::Heading if test_heading(&block) => {
                    self.run_heading(parent, &block, queue, state);
                    return;
                }
                BlockStage::Paragraph => {
                    let text = block.trim();
                    let content = if text.is_empty() {
                        Vec::new()
                    } else {
                        vec![Inline::text(text)]
                    };
                    parent.push(Element::paragraph(content));
                    return;
                }
                _ => {}
            }
        }
    }

    fn test_box(&self, block: &str) -> bool {
        block.lines().any(|line| self.is_box_line(line))
    }

    fn is_box_line(&self, line: &str) -> bool {
        self.patterns.box_break.is_match(line) || self.patterns.box_line.is_match(line)
    }

    /// Group the pipe-prefixed tail of `block` into a box container.
    fn run_box(&self, parent: &mut Elements, block: &str, state: State) {
        let lines: Vec<&str> = block.lines().collect();
        let Some(first) = lines.iter().position(|line| self.is_box_line(line)) else {
            return;
        };

        // Ordinary content may precede the box within the same block; hand it
        // back to the full stage chain first.
        let before = lines[..first].join("\n");
        if !before.trim().is_empty() {
            self.parse_blocks(parent, &before, state);
        }

        let interior = lines[first..]
            .iter()
            .filter_map(|line| self.clean(line))
            .collect::<Vec<_>>()
            .join("\n");

        // Adjacent box blocks merge into a single container.
        if !matches!(parent.last(), Some(Element::Box { .. })) {
            parent.push(Element::boxed(Vec::new()));
        }
        if let Some(Element::Box { children }) = parent.last_mut() {
            self.parse_blocks(children, &interior, State::Box);
        }
    }

    /// Strip the pipe markers from one box line.
    ///
    /// Bare `|` and `| |` lines become blank-line equivalents; lines that are
    /// not box lines at all are dropped from the interior.
    fn clean(&self, line: &str) -> Option<String> {
        if self.patterns.box_break.is_match(line) {
            return Some(String::new());
        }
        self.patterns
            .box_line
            .captures(line)
            .map(|caps| caps[1].trim().to_string())
    }

    fn run_heading(
        &self,
        parent: &mut Elements,
        block: &str,
        queue: &mut VecDeque<String>,
        state: State,
    ) {
        let lines: Vec<&str> = block.lines().collect();
        let Some(at) = lines.iter().position(|line| line.starts_with('#')) else {
            return;
        };

        let before = lines[..at].join("\n");
        if !before.trim().is_empty() {
            self.parse_blocks(parent, &before, state);
        }

        let line = lines[at];
        let level = line.chars().take_while(|&c| c == '#').count().min(6);
        let text = line[level..].trim();
        let content = if text.is_empty() {
            Vec::new()
        } else {
            vec![Inline::text(text)]
        };
        #[allow(clippy::cast_possible_truncation)]
        parent.push(Element::heading(level as u8, content));

        // Anything after the heading line is a fresh block.
        let after = lines[at + 1..].join("\n");
        if !after.is_empty() {
            queue.push_front(after);
        }
    }
}

fn test_heading(block: &str) -> bool {
    block.lines().any(|line| line.starts_with('#'))
}
