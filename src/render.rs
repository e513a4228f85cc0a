//! HTML fragment rendering
//!
//! Serializes an element tree to the fragment consumed by the downstream
//! book tooling: headings, paragraphs, `div.box` containers and the three
//! annotation span classes. Text and attribute values are escaped.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::models::{Element, Inline};

/// Render a tree (or any slice of it) as an HTML fragment.
#[must_use]
pub fn to_html(elements: &[Element]) -> String {
    let mut out = String::new();
    for element in elements {
        write_element(&mut out, element);
    }
    out
}

fn write_element(out: &mut String, element: &Element) {
    match element {
        Element::Heading { level, content } => {
            out.push_str(&format!("<h{level}>"));
            write_inlines(out, content);
            out.push_str(&format!("</h{level}>\n"));
        }
        Element::Paragraph { content } => {
            out.push_str("<p>");
            write_inlines(out, content);
            out.push_str("</p>\n");
        }
        Element::Box { children } => {
            out.push_str("<div class=\"box\">\n");
            for child in children {
                write_element(out, child);
            }
            out.push_str("</div>\n");
        }
    }
}

fn write_inlines(out: &mut String, content: &[Inline]) {
    for inline in content {
        match inline {
            Inline::Text { text } => out.push_str(&encode_text(text)),
            Inline::Span { class, text } => {
                out.push_str(&format!("<span class=\"{class}\">"));
                out.push_str(&encode_text(text));
                out.push_str("</span>");
            }
            Inline::Link { text, target } => {
                out.push_str(&format!(
                    "<a href=\"{}\">",
                    encode_double_quoted_attribute(target)
                ));
                out.push_str(&encode_text(text));
                out.push_str("</a>");
            }
            Inline::LineBreak => out.push_str("<br />\n"),
        }
    }
}
