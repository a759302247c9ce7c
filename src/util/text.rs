use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
///
/// Unicode-aware: CJK and emoji count as 2 columns, combining marks as 0.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns, appending
/// "..." when text was cut off.
///
/// Returns `Cow::Borrowed` when the string already fits. For widths of 3 or
/// less there is no room for a character plus the ellipsis, so as many
/// characters as fit are returned without one.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    if max_width <= ELLIPSIS_WIDTH {
        let end = prefix_end(s, max_width);
        return Cow::Owned(s[..end].to_string());
    }

    let end = prefix_end(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
}

/// Byte index of the longest prefix of `s` that fits in `width` columns.
fn prefix_end(s: &str, width: usize) -> usize {
    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }
    end
}

/// Strips control characters (C0 and C1) and ANSI escape sequences from
/// text.
///
/// Server-provided names and titles are rendered directly into the terminal,
/// so CSI/OSC sequences and control characters must not pass through. Tab,
/// newline and carriage return are preserved. Returns `Cow::Borrowed` when
/// the input is already clean.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let needs_strip = s
        .chars()
        .any(|c| c.is_control() && c != '\t' && c != '\n' && c != '\r');
    if !needs_strip {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                Some('[') => {
                    // CSI: skip until a final byte in 0x40..=0x7e
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    // OSC: skip until BEL or ST
                    chars.next();
                    let mut prev = '\0';
                    for c in chars.by_ref() {
                        if c == '\u{07}' || (prev == '\u{1b}' && c == '\\') {
                            break;
                        }
                        prev = c;
                    }
                }
                _ => {} // bare ESC dropped
            }
        } else if c == '\u{7f}' || (c.is_control() && c != '\t' && c != '\n' && c != '\r') {
            // dropped
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_ascii() {
        assert_eq!(display_width("Hello"), 5);
    }

    #[test]
    fn test_display_width_cjk() {
        assert_eq!(display_width("你好"), 4);
    }

    #[test]
    fn test_truncate_fits_borrowed() {
        let result = truncate_to_width("Short", 10);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Short");
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
    }

    #[test]
    fn test_truncate_cjk_boundary() {
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test!", 0), "");
        assert_eq!(truncate_to_width("Test!", 1), "T");
        assert_eq!(truncate_to_width("Test!", 3), "Tes");
    }

    #[test]
    fn test_strip_ansi_csi() {
        assert_eq!(strip_control_chars("\x1b[31mEvil\x1b[0m"), "Evil");
    }

    #[test]
    fn test_strip_clean_input_borrowed() {
        let result = strip_control_chars("plain text\nwith newline");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_osc_sequence() {
        assert_eq!(strip_control_chars("\x1b]0;title\x07name"), "name");
    }

    #[test]
    fn test_strip_preserves_whitespace() {
        assert_eq!(strip_control_chars("a\tb\nc\x00d"), "a\tb\ncd");
    }

    #[test]
    fn test_strip_c1_controls() {
        // NEL and the single-char CSI are two-byte in UTF-8
        assert_eq!(strip_control_chars("a\u{85}b\u{9b}c"), "abc");
    }
}
