use core::fmt;

use serde::{Deserialize, Serialize};

pub type Elements = Vec<Element>;
pub type Inlines = Vec<Inline>;

/// Class attribute carried by an annotation span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanClass {
    /// Chord annotation, e.g. `(Am7)`
    Chord,
    /// Backing vocals, any other parenthetical
    Vox,
    /// Performance notes, brace-delimited
    Notes,
}

impl SpanClass {
    /// Name of this class as it appears in rendered output
    #[must_use]
    pub const fn name(&self) -> &str {
        match self {
            Self::Chord => "chord",
            Self::Vox => "vox",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for SpanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A node in the converted document tree.
///
/// Parents own their children exclusively; the pipeline only ever builds new
/// trees and never shares nodes between documents.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub enum Element {
    Heading { level: u8, content: Inlines },
    Paragraph { content: Inlines },
    Box { children: Elements },
}

impl Element {
    #[must_use]
    pub const fn heading(level: u8, content: Inlines) -> Self {
        Self::Heading { level, content }
    }

    #[must_use]
    pub const fn paragraph(content: Inlines) -> Self {
        Self::Paragraph { content }
    }

    #[must_use]
    pub const fn boxed(children: Elements) -> Self {
        Self::Box { children }
    }
}

/// Inline content of a heading or paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Inline {
    Text { text: String },
    Span { class: SpanClass, text: String },
    Link { text: String, target: String },
    LineBreak,
}

impl Inline {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    #[must_use]
    pub fn span(class: SpanClass, text: impl Into<String>) -> Self {
        Self::Span {
            class,
            text: text.into(),
        }
    }
}

macro_rules! impl_element_helpers {
    ($($variant:ident { $($field:ident),* }),* $(,)?) => {
        $(
            impl Element {
                paste::paste! {
                    #[must_use]
                    pub fn [<as_ $variant:snake>](&self) -> Option<Element> {
                        if let Element::$variant { $($field),* } = self {
                            Some(Element::$variant {
                                $(
                                    $field: $field.clone(),
                                )*
                            })
                        } else {
                            None
                        }
                    }

                    #[must_use]
                    pub fn [<is_ $variant:snake>](&self) -> bool {
                        self.[<as_ $variant:snake>]().is_some()
                    }
                }
            }
        )*
    };
}

impl_element_helpers!(
    Heading { level, content },
    Paragraph { content },
    Box { children }
);

/// Flatten inline content to plain text, dropping markup.
///
/// Line breaks become newlines so multi-line content stays readable.
#[must_use]
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text { text } | Inline::Span { text, .. } | Inline::Link { text, .. } => {
                out.push_str(text);
            }
            Inline::LineBreak => out.push('\n'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_class_names() {
        assert_eq!(SpanClass::Chord.name(), "chord");
        assert_eq!(SpanClass::Vox.name(), "vox");
        assert_eq!(SpanClass::Notes.to_string(), "notes");
    }

    #[test]
    fn element_helpers() {
        let el = Element::paragraph(vec![Inline::text("la")]);
        assert!(el.is_paragraph());
        assert!(!el.is_heading());
        assert!(!el.is_box());

        let boxed = Element::boxed(vec![el]);
        assert!(boxed.is_box());
        assert!(boxed.as_box().is_some());
    }

    #[test]
    fn plain_text_flattens_spans_and_breaks() {
        let content = vec![
            Inline::text("la la "),
            Inline::span(SpanClass::Chord, "Am"),
            Inline::LineBreak,
            Inline::text("second line"),
        ];
        assert_eq!(plain_text(&content), "la la Am\nsecond line");
    }
}
