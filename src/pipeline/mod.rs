//! The markup conversion pipeline
//!
//! A [`Pipeline`] wires the dialect's stages into a small host engine:
//! line preprocessors, block processors, inline patterns, and tree
//! processors, each kept in an ordered, name-keyed registry. Stage order is
//! part of the dialect's contract: the junk cleaner runs before header
//! detection, chord recognition outranks vox, the box processor claims blocks
//! before the empty-block handler, and collapsing runs before the final
//! inline resolution.
//!
//! Construction compiles the grammar set and is the only fallible step;
//! [`Pipeline::convert`] is total over any input text.

pub mod block;
pub mod collapse;
pub mod inline;
pub mod preprocess;

pub use block::{BlockStage, State};
pub use inline::InlinePattern;
pub use preprocess::PreStage;

use regex::Captures;

use crate::error::PatternResult;
use crate::models::{Elements, Inline, SpanClass};
use crate::patterns::Patterns;
use block::BlockParser;

/// Tree processor stages, dispatched in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeStage {
    Collapse,
    Inline,
}

/// A named stage with its position in the registry
#[derive(Debug, Clone)]
pub struct StageEntry<T> {
    pub name: &'static str,
    pub stage: T,
}

/// An ordered stage registry keyed by stage name.
///
/// Order is the ordering key: stages run front to back, and extensions place
/// themselves relative to existing names.
#[derive(Debug, Clone)]
pub struct StageRegistry<T> {
    entries: Vec<StageEntry<T>>,
}

impl<T> StageRegistry<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a stage at the end of the chain
    pub fn push(&mut self, name: &'static str, stage: T) {
        self.entries.push(StageEntry { name, stage });
    }

    /// Insert a stage just before `anchor`; appends if `anchor` is unknown
    pub fn insert_before(&mut self, anchor: &str, name: &'static str, stage: T) {
        let at = self
            .entries
            .iter()
            .position(|entry| entry.name == anchor)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, StageEntry { name, stage });
    }

    #[must_use]
    pub fn entries(&self) -> &[StageEntry<T>] {
        &self.entries
    }

    /// Stage names in execution order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }
}

impl<T> Default for StageRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The song-sheet conversion pipeline.
///
/// Immutable once built; one instance may convert any number of documents and
/// may be shared read-only between threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    patterns: Patterns,
    preprocessors: StageRegistry<PreStage>,
    inline_patterns: StageRegistry<InlinePattern>,
    block_stages: StageRegistry<BlockStage>,
    tree_stages: StageRegistry<TreeStage>,
}

impl Pipeline {
    /// Build a pipeline with the dialect's stages registered in their
    /// contractual order.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::PatternError`] if any grammar definition fails to
    /// compile.
    pub fn new() -> PatternResult<Self> {
        let patterns = Patterns::compile()?;

        let mut preprocessors = StageRegistry::new();
        preprocessors.push("junk_cleaner", PreStage::JunkCleaner);
        preprocessors.push("headers", PreStage::Headers);

        let mut inline_patterns = StageRegistry::new();
        inline_patterns.push(
            "reference",
            InlinePattern::new(patterns.reference.clone(), reference_link),
        );
        inline_patterns.push(
            "nl2br",
            InlinePattern::new(patterns.line_break.clone(), line_break),
        );
        inline_patterns.insert_before(
            "reference",
            "chord",
            InlinePattern::new(patterns.chord.clone(), chord_span),
        );
        inline_patterns.insert_before(
            "reference",
            "vox",
            InlinePattern::new(patterns.vox.clone(), vox_span),
        );
        inline_patterns.insert_before(
            "reference",
            "notes",
            InlinePattern::new(patterns.notes.clone(), notes_span),
        );

        let mut block_stages = StageRegistry::new();
        block_stages.push("empty", BlockStage::Empty);
        block_stages.push("heading", BlockStage::Heading);
        block_stages.push("paragraph", BlockStage::Paragraph);
        block_stages.insert_before("empty", "box", BlockStage::Box);

        let mut tree_stages = StageRegistry::new();
        tree_stages.push("inline", TreeStage::Inline);
        tree_stages.insert_before("inline", "collapse", TreeStage::Collapse);

        Ok(Self {
            patterns,
            preprocessors,
            inline_patterns,
            block_stages,
            tree_stages,
        })
    }

    /// Convert song-sheet markup into its element tree.
    ///
    /// Total: any text converts, and the result always begins with exactly
    /// one level-1 title heading.
    #[must_use]
    pub fn convert(&self, source: &str) -> Elements {
        let text = source.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines: Vec<String> = text.lines().map(String::from).collect();

        for entry in self.preprocessors.entries() {
            lines = match entry.stage {
                PreStage::JunkCleaner => preprocess::junk_cleaner(lines),
                PreStage::Headers => preprocess::headers(&self.patterns, lines),
            };
        }

        let parser = BlockParser {
            patterns: &self.patterns,
            stages: &self.block_stages,
        };
        let mut tree = parser.parse(&lines.join("\n"));

        for entry in self.tree_stages.entries() {
            match entry.stage {
                TreeStage::Collapse => collapse::collapse_tree(&mut tree),
                TreeStage::Inline => inline::annotate(&mut tree, &self.inline_patterns),
            }
        }
        tree
    }

    /// Preprocessor names in execution order
    #[must_use]
    pub fn preprocessor_names(&self) -> Vec<&'static str> {
        self.preprocessors.names()
    }

    /// Inline pattern names in execution order
    #[must_use]
    pub fn inline_pattern_names(&self) -> Vec<&'static str> {
        self.inline_patterns.names()
    }

    /// Block processor names in execution order
    #[must_use]
    pub fn block_stage_names(&self) -> Vec<&'static str> {
        self.block_stages.names()
    }

    /// Tree processor names in execution order
    #[must_use]
    pub fn tree_stage_names(&self) -> Vec<&'static str> {
        self.tree_stages.names()
    }
}

fn capture(caps: &Captures<'_>, group: usize) -> String {
    caps.get(group).map_or("", |m| m.as_str()).to_string()
}

fn chord_span(caps: &Captures<'_>) -> Inline {
    Inline::span(SpanClass::Chord, capture(caps, 1))
}

fn vox_span(caps: &Captures<'_>) -> Inline {
    Inline::span(SpanClass::Vox, capture(caps, 1))
}

fn notes_span(caps: &Captures<'_>) -> Inline {
    Inline::span(SpanClass::Notes, capture(caps, 1))
}

fn reference_link(caps: &Captures<'_>) -> Inline {
    Inline::Link {
        text: capture(caps, 1),
        target: capture(caps, 2),
    }
}

fn line_break(_caps: &Captures<'_>) -> Inline {
    Inline::LineBreak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Element, plain_text};
    use pretty_assertions::assert_eq;

    fn convert(source: &str) -> Elements {
        Pipeline::new().unwrap().convert(source)
    }

    #[test]
    fn stage_orders_are_contractual() {
        let pipeline = Pipeline::new().unwrap();
        assert_eq!(pipeline.preprocessor_names(), vec!["junk_cleaner", "headers"]);
        assert_eq!(
            pipeline.inline_pattern_names(),
            vec!["chord", "vox", "notes", "reference", "nl2br"]
        );
        assert_eq!(
            pipeline.block_stage_names(),
            vec!["box", "empty", "heading", "paragraph"]
        );
        assert_eq!(pipeline.tree_stage_names(), vec!["collapse", "inline"]);
    }

    #[test]
    fn every_document_starts_with_one_title_heading() {
        for source in ["My Song\n\nla la", "", "\n\n\n", "# Already marked\n\nx"] {
            let tree = convert(source);
            assert!(
                matches!(&tree[0], Element::Heading { level: 1, .. }),
                "missing title for {source:?}"
            );
            let extra_titles = tree[1..]
                .iter()
                .filter(|el| matches!(el, Element::Heading { level: 1, .. }))
                .count();
            assert_eq!(extra_titles, 0);
        }
    }

    #[test]
    fn all_blank_document_yields_empty_title() {
        let tree = convert("\n  \n");
        assert_eq!(tree, vec![Element::heading(1, Vec::new())]);
    }

    #[test]
    fn section_headings_and_spans() {
        let tree = convert("My Song\n\n[Chorus]\n(Am7) la (softly) {repeat x2}");
        assert_eq!(tree[1], Element::heading(2, vec![Inline::text("Chorus")]));
        let Element::Paragraph { content } = &tree[2] else {
            panic!("expected lyric paragraph");
        };
        assert_eq!(
            content,
            &vec![
                Inline::span(SpanClass::Chord, "Am7"),
                Inline::text(" la "),
                Inline::span(SpanClass::Vox, "softly"),
                Inline::text(" "),
                Inline::span(SpanClass::Notes, "repeat x2"),
            ]
        );
    }

    #[test]
    fn box_block_collapses_to_single_paragraph() {
        let tree = convert("Title\n\n| line one\n| line two\n\nafter");
        assert_eq!(
            tree[1],
            Element::boxed(vec![Element::paragraph(vec![
                Inline::text("line one"),
                Inline::LineBreak,
                Inline::text("line two"),
            ])])
        );
        assert_eq!(tree[2], Element::paragraph(vec![Inline::text("after")]));
    }

    #[test]
    fn box_heading_segments_the_collapse() {
        let tree = convert("Title\n\n| one\n| [Bridge]\n| two\n| three");
        let Element::Box { children } = &tree[1] else {
            panic!("expected box");
        };
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], Element::paragraph(vec![Inline::text("one")]));
        assert_eq!(children[1], Element::heading(2, vec![Inline::text("Bridge")]));
        assert_eq!(
            children[2],
            Element::paragraph(vec![
                Inline::text("two"),
                Inline::LineBreak,
                Inline::text("three"),
            ])
        );
    }

    #[test]
    fn adjacent_boxes_merge_before_collapsing() {
        let tree = convert("Title\n\n| a\n\n| b");
        assert_eq!(
            tree[1],
            Element::boxed(vec![Element::paragraph(vec![
                Inline::text("a"),
                Inline::LineBreak,
                Inline::text("b"),
            ])])
        );
    }

    #[test]
    fn collapse_is_idempotent_on_converted_trees() {
        let mut tree = convert("Title\n\n| a\n| |\n| b\n\n| c");
        let reference = tree.clone();
        collapse::collapse_tree(&mut tree);
        assert_eq!(tree, reference);
    }

    #[test]
    fn smart_punctuation_never_reaches_the_tree() {
        let tree = convert("My Song \u{2014} My Band\n\nla \u{2019}la\u{2026}");
        let mut text = String::new();
        for el in &tree {
            match el {
                Element::Heading { content, .. } | Element::Paragraph { content } => {
                    text.push_str(&plain_text(content));
                }
                Element::Box { .. } => {}
            }
        }
        for smart in ['\u{2014}', '\u{2019}', '\u{2026}'] {
            assert!(!text.contains(smart));
        }
        assert!(text.contains("My Song - My Band"));
    }

    #[test]
    fn newlines_within_a_verse_become_breaks() {
        let tree = convert("Title\n\n(C) one\n(G) two");
        let Element::Paragraph { content } = &tree[1] else {
            panic!("expected paragraph");
        };
        assert!(content.contains(&Inline::LineBreak));
    }
}
