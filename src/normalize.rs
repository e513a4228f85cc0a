//! Character normalization
//!
//! Word processors love to swap plain punctuation for "smart" variants. Every
//! downstream grammar in the pipeline assumes ASCII punctuation, so this runs
//! first and folds the usual suspects back down.

/// Replacement table: typographic character to its ASCII equivalent
pub const SMART_PUNCTUATION: &[(char, &str)] = &[
    ('\u{2010}', "-"),   // hyphen
    ('\u{2011}', "-"),   // non-breaking hyphen
    ('\u{2012}', "-"),   // figure dash
    ('\u{2013}', "-"),   // en dash
    ('\u{2014}', "-"),   // em dash
    ('\u{2015}', "-"),   // horizontal bar
    ('\u{2018}', "'"),   // left single quotation
    ('\u{2019}', "'"),   // right single quotation
    ('\u{201c}', "\""),  // left double quotation
    ('\u{201d}', "\""),  // right double quotation
    ('\u{2026}', "..."), // ellipsis
];

/// Fold smart punctuation in one line down to ASCII.
///
/// Total over any input line; characters outside the table pass through
/// untouched.
#[must_use]
pub fn clean_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match SMART_PUNCTUATION.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => out.push_str(to),
            None => out.push(ch),
        }
    }
    out
}
