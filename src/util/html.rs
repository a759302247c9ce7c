//! Minimal HTML-to-text conversion for terminal rendering.
//!
//! Content bodies arrive as HTML markup. A terminal client cannot render
//! markup directly, so this module flattens it: tags are stripped, block
//! elements become line breaks, list items become bullets, and the common
//! named entities are decoded. This is deliberately not a full HTML parser;
//! the API serves simple article markup, not arbitrary documents.

use crate::util::strip_control_chars;

/// Tags that terminate a block of text and force a line break.
const BLOCK_TAGS: &[&str] = &[
    "p", "/p", "div", "/div", "br", "br/", "h1", "/h1", "h2", "/h2", "h3", "/h3", "h4", "/h4",
    "ul", "/ul", "ol", "/ol", "tr", "/tr", "table", "/table", "blockquote", "/blockquote",
];

/// Converts an HTML fragment to plain text lines.
///
/// Consecutive blank lines are collapsed to one, and leading/trailing blank
/// lines are dropped. Control characters are stripped so server markup cannot
/// inject terminal escapes.
pub fn html_to_lines(html: &str) -> Vec<String> {
    let text = flatten(html);
    let mut lines = Vec::new();
    let mut blank_pending = false;
    for raw in text.lines() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            blank_pending = !lines.is_empty();
        } else {
            if blank_pending {
                lines.push(String::new());
                blank_pending = false;
            }
            lines.push(strip_control_chars(line).into_owned());
        }
    }
    lines
}

/// Converts an HTML fragment to a single plain-text string.
pub fn html_to_text(html: &str) -> String {
    html_to_lines(html).join("\n")
}

fn flatten(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        push_decoded(&mut out, &rest[..open]);
        let tail = &rest[open + 1..];
        let Some(close) = tail.find('>') else {
            // Unterminated tag: treat the remainder as text
            push_decoded(&mut out, &rest[open..]);
            return out;
        };
        let tag = tag_name(&tail[..close]);
        if BLOCK_TAGS.contains(&tag.as_str()) {
            out.push('\n');
        }
        if tag == "li" {
            out.push_str("\n• ");
        }
        rest = &tail[close + 1..];
    }
    push_decoded(&mut out, rest);
    out
}

/// Lowercased tag name without attributes, keeping a leading slash.
fn tag_name(tag: &str) -> String {
    tag.trim()
        .split(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Appends `text` with the common named/numeric entities decoded.
fn push_decoded(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|&i| i <= 8) {
            Some(end) => {
                match &tail[1..end] {
                    "amp" => out.push('&'),
                    "lt" => out.push('<'),
                    "gt" => out.push('>'),
                    "quot" => out.push('"'),
                    "apos" | "#39" => out.push('\''),
                    "nbsp" => out.push(' '),
                    entity => {
                        let decoded = entity
                            .strip_prefix('#')
                            .and_then(|d| d.parse::<u32>().ok())
                            .and_then(char::from_u32);
                        match decoded {
                            Some(c) => out.push(c),
                            None => out.push_str(&tail[..=end]),
                        }
                    }
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
}
