//! Song wrapper around the conversion pipeline
//!
//! A [`Song`] is the caller-side shell: it strips out-of-band metadata lines
//! before the markup ever reaches the pipeline, converts the remainder, and
//! summarises the result (title, chord inventory). Splitting a combined
//! "Title - Artist" string is left to the consumer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SongResult;
use crate::models::{Element, Elements, Inline, SpanClass, plain_text};
use crate::pipeline::Pipeline;

/// Default leader character for metadata lines
pub const META_LEADER: char = ';';

/// Out-of-band metadata parsed from leader-prefixed lines.
///
/// The lines form one YAML mapping; well-known keys are typed, anything else
/// lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_sort: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub artist_sort: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A parsed song: its converted tree plus the summary fields the book
/// tooling works from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    /// Chord names in first-use order, de-duplicated
    pub chords: Vec<String>,
    pub meta: Option<SongMeta>,
    /// The full converted tree, title heading included
    pub tree: Elements,
}

impl Song {
    /// Parse a song from raw markup, using `;` as the metadata leader.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata lines are not a valid YAML mapping.
    pub fn parse(pipeline: &Pipeline, source: &str) -> SongResult<Self> {
        Self::parse_with_leader(pipeline, source, META_LEADER)
    }

    /// Parse a song, treating lines prefixed with `leader` as metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata lines are not a valid YAML mapping.
    pub fn parse_with_leader(
        pipeline: &Pipeline,
        source: &str,
        leader: char,
    ) -> SongResult<Self> {
        let (meta_lines, content) = split_meta(source, leader);
        let meta: Option<SongMeta> = if meta_lines.is_empty() {
            None
        } else {
            Some(serde_yaml::from_str(&meta_lines.join("\n"))?)
        };

        let tree = pipeline.convert(&content);

        let detected_title = tree
            .first()
            .and_then(|el| match el {
                Element::Heading { level: 1, content } => Some(plain_text(content)),
                _ => None,
            })
            .unwrap_or_default();

        let title = meta
            .as_ref()
            .and_then(|m| m.title.clone())
            .unwrap_or_else(|| detected_title.trim().to_string());
        let artist = meta.as_ref().and_then(|m| m.artist.clone());
        let chords = chord_names(&tree);

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            artist,
            chords,
            meta,
            tree,
        })
    }

    /// The tree without its title heading, as fed to sheet templates
    #[must_use]
    pub fn body(&self) -> &[Element] {
        match self.tree.first() {
            Some(Element::Heading { level: 1, .. }) => &self.tree[1..],
            _ => &self.tree,
        }
    }
}

/// Separate leader-prefixed metadata lines from markup content.
fn split_meta(source: &str, leader: char) -> (Vec<String>, String) {
    let mut meta = Vec::new();
    let mut content = Vec::new();
    for line in source.lines() {
        if let Some(rest) = line.strip_prefix(leader) {
            meta.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        } else {
            content.push(line);
        }
    }
    (meta, content.join("\n"))
}

/// Collect chord names used by the tree: the first whitespace-delimited token
/// of every chord span, first-use order, no duplicates.
#[must_use]
pub fn chord_names(tree: &[Element]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut stack: Vec<&Element> = tree.iter().rev().collect();
    while let Some(element) = stack.pop() {
        match element {
            Element::Heading { content, .. } | Element::Paragraph { content } => {
                for inline in content {
                    if let Inline::Span {
                        class: SpanClass::Chord,
                        text,
                    } = inline
                        && let Some(name) = text.split_whitespace().next()
                        && !names.iter().any(|known| known == name)
                    {
                        names.push(name.to_string());
                    }
                }
            }
            Element::Box { children } => stack.extend(children.iter().rev()),
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline {
        Pipeline::new().unwrap()
    }

    #[test]
    fn metadata_lines_never_reach_the_pipeline() {
        let song = Song::parse(
            &pipeline(),
            "; tags: [tested]\nMy Song\n\n; artist: The Band\n(C) la la",
        )
        .unwrap();
        assert_eq!(song.title, "My Song");
        assert_eq!(song.artist.as_deref(), Some("The Band"));
        let meta = song.meta.unwrap();
        assert_eq!(meta.tags, vec!["tested"]);
        // the metadata lines must not show up as content
        assert!(!crate::render::to_html(&song.tree).contains("tags"));
    }

    #[test]
    fn meta_title_overrides_detected_title() {
        let song = Song::parse(&pipeline(), "; title: Proper Name\nscratch title\n\nla").unwrap();
        assert_eq!(song.title, "Proper Name");
    }

    #[test]
    fn songs_without_metadata_have_none() {
        let song = Song::parse(&pipeline(), "My Song\n\nla la").unwrap();
        assert!(song.meta.is_none());
        assert_eq!(song.title, "My Song");
        assert!(song.artist.is_none());
    }

    #[test]
    fn invalid_metadata_is_an_error() {
        assert!(Song::parse(&pipeline(), "; [not: valid: yaml\nTitle\n").is_err());
    }

    #[test]
    fn chord_inventory_keeps_first_use_order() {
        let song = Song::parse(
            &pipeline(),
            "Title\n\n(C) la (G) la (C) la\n\n| (Am) boxed (C - single strum)",
        )
        .unwrap();
        assert_eq!(song.chords, vec!["C", "G", "Am"]);
    }

    #[test]
    fn custom_leader_character() {
        let song =
            Song::parse_with_leader(&pipeline(), "% title: Led\nAnything\n\nla", '%').unwrap();
        assert_eq!(song.title, "Led");
    }

    #[test]
    fn body_skips_the_title_heading() {
        let song = Song::parse(&pipeline(), "Title\n\nla la").unwrap();
        assert_eq!(song.tree.len(), 2);
        assert_eq!(song.body().len(), 1);
        assert!(song.body()[0].is_paragraph());
    }

    #[test]
    fn ids_are_unique_per_parse() {
        let p = pipeline();
        let a = Song::parse(&p, "T\n\nx").unwrap();
        let b = Song::parse(&p, "T\n\nx").unwrap();
        assert_ne!(a.id, b.id);
    }
}
