//! Grammar definitions for the song-sheet dialect
//!
//! All recognition in the pipeline is regex-driven. The source strings live
//! here as constants and are compiled exactly once, when a [`Patterns`] set is
//! built for a pipeline. A definition that fails to compile aborts pipeline
//! construction; nothing is validated per document.

use regex::Regex;

use crate::error::{PatternError, PatternResult};

/// Chords: a root letter, optional accidental and quality run, optional
/// trailing "- single strum(s)" instruction. The character class is looser
/// than strict chord naming (it admits some non-chords); real songsheets rely
/// on that slack for slash chords and ad-hoc qualities, so it stays loose.
pub const CHORD: &str =
    r"\(([A-G][abdgijmnsu0-9#+*/A-G-]*(?:\s*-\s*single(?:\s*strums?)?)?)\)";

/// Backing vocals: anything parenthesised that is not a chord
pub const VOX: &str = r"\(([\w\s]+)\)";

/// Band/performance instructions use a different delimiter
pub const NOTES: &str = r"\{([^}]+)\}";

/// A line containing a `[section name]` heading
pub const HEADER: &str = r"^(.*)\[([^\]]+)\](.*)$";

/// One content line of a boxed section: leading pipe, non-blank body with no
/// embedded pipes, optional closing pipe
pub const BOX_LINE: &str = r"^\| *([^ |][^|]*)\|?$";

/// A bare `|` or `| |` line: a paragraph break inside a box
pub const BOX_BREAK: &str = r"^\|(?: *\|)? *$";

/// The host's stock inline link pattern
pub const REFERENCE: &str = r"\[([^\]]*)\]\(([^)]*)\)";

/// Newlines inside a resolved paragraph become explicit line breaks
pub const LINE_BREAK: &str = r"\n";

/// The compiled grammar set for one pipeline. Immutable after construction
/// and safe to share read-only across threads.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub chord: Regex,
    pub vox: Regex,
    pub notes: Regex,
    pub header: Regex,
    pub box_line: Regex,
    pub box_break: Regex,
    pub reference: Regex,
    pub line_break: Regex,
}

impl Patterns {
    /// Compile the full grammar set.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] naming the first definition that is not a
    /// valid regular expression.
    pub fn compile() -> PatternResult<Self> {
        Ok(Self {
            chord: compile("chord", CHORD)?,
            vox: compile("vox", VOX)?,
            notes: compile("notes", NOTES)?,
            header: compile("header", HEADER)?,
            box_line: compile("box_line", BOX_LINE)?,
            box_break: compile("box_break", BOX_BREAK)?,
            reference: compile("reference", REFERENCE)?,
            line_break: compile("line_break", LINE_BREAK)?,
        })
    }
}

fn compile(name: &'static str, pattern: &str) -> PatternResult<Regex> {
    Regex::new(pattern).map_err(|source| PatternError::invalid(name, source))
}
