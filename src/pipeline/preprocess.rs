//! Line-level preprocessors
//!
//! These run over the raw line sequence before any block splitting: first the
//! junk cleaner, then header detection.

use crate::normalize::clean_line;
use crate::patterns::Patterns;

/// Preprocessor stages, dispatched in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreStage {
    JunkCleaner,
    Headers,
}

/// Normalize smart punctuation on every line.
#[must_use]
pub fn junk_cleaner(lines: Vec<String>) -> Vec<String> {
    lines.iter().map(|line| clean_line(line)).collect()
}

/// Detect the title line and bracketed section headings.
///
/// Leading blank lines are dropped; the first non-blank line becomes the
/// level-1 title, with any pre-existing `#` markers stripped so it cannot
/// escape to a deeper level. A document with no content at all still yields
/// an (empty) title. Every later `[section]` line becomes a level-2 heading;
/// if the line sat inside a box (leading `|`), the marker is preserved so the
/// heading still takes part in box grouping.
#[must_use]
pub fn headers(patterns: &Patterns, lines: Vec<String>) -> Vec<String> {
    let mut rest = lines.into_iter();
    let mut out = Vec::new();

    let mut title = None;
    for line in rest.by_ref() {
        if !line.trim().is_empty() {
            title = Some(line);
            break;
        }
    }
    let title = title.unwrap_or_default();
    out.push(format!("# {}", title.trim_start_matches('#')));

    for line in rest {
        match patterns.header.captures(&line) {
            Some(caps) => {
                let text = caps[2].trim();
                if caps[1].trim_start().starts_with('|') {
                    out.push(format!("| ## {text}"));
                } else {
                    out.push(format!("## {text}"));
                }
            }
            None => out.push(line),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_headers(input: &[&str]) -> Vec<String> {
        let patterns = Patterns::compile().unwrap();
        headers(&patterns, input.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn first_nonblank_line_becomes_title() {
        let out = run_headers(&["", "  ", "My Song - Band", "la la"]);
        assert_eq!(out, vec!["# My Song - Band", "la la"]);
    }

    #[test]
    fn existing_heading_markers_are_stripped_from_title() {
        let out = run_headers(&["## My Song"]);
        assert_eq!(out, vec!["#  My Song"]);
    }

    #[test]
    fn all_blank_document_yields_empty_title() {
        let out = run_headers(&["", "   "]);
        assert_eq!(out, vec!["# "]);

        let out = run_headers(&[]);
        assert_eq!(out, vec!["# "]);
    }

    #[test]
    fn bracketed_sections_become_level_two() {
        let out = run_headers(&["Title", "[Chorus]", "plain line"]);
        assert_eq!(out, vec!["# Title", "## Chorus", "plain line"]);
    }

    #[test]
    fn box_marker_survives_heading_detection() {
        let out = run_headers(&["Title", "| [Bridge] "]);
        assert_eq!(out, vec!["# Title", "| ## Bridge"]);
    }

    #[test]
    fn junk_cleaner_runs_per_line() {
        let out = junk_cleaner(vec!["a \u{2014} b".to_string(), "\u{2019}ok".to_string()]);
        assert_eq!(out, vec!["a - b", "'ok"]);
    }
}
