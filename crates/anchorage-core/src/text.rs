//! Display-width helpers for laying text out in terminal cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` columns, appending `tail` when cut.
///
/// ```
/// use anchorage_core::text::truncate;
///
/// assert_eq!(truncate("hello world", 8, "…"), "hello w…");
/// assert_eq!(truncate("hi", 10, "…"), "hi");
/// ```
pub fn truncate(s: &str, max_width: usize, tail: &str) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let tail_width = display_width(tail);
    if tail_width > max_width {
        return String::new();
    }
    let budget = max_width - tail_width;
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(tail);
    out
}

/// The widest line among `lines`.
pub fn max_width<'a>(lines: impl IntoIterator<Item = &'a str>) -> usize {
    lines.into_iter().map(display_width).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn truncate_respects_wide_characters() {
        assert_eq!(truncate("日本語", 5, "…"), "日本…");
        assert_eq!(truncate("abcdef", 2, "..."), "");
    }

    #[test]
    fn max_width_of_lines() {
        assert_eq!(max_width(["a", "abcd", "ab"]), 4);
        assert_eq!(max_width(Vec::<&str>::new()), 0);
    }
}
