//! Per-character display width.
//!
//! Invariants:
//! * `char_width` always returns 0, 1, or 2.
//! * Control codepoints and a fixed list of zero-width joiners/selectors are
//!   0 regardless of what `unicode_width` reports for them, since terminals
//!   vary here and we'd rather under-claim width than drift the cursor.
//! * Tabs and newlines are never passed to this function — the layout pass
//!   handles them as control flow, not as cells.

use unicode_width::UnicodeWidthChar;

/// Codepoints that never occupy a terminal cell, beyond what `is_control`
/// already excludes: joiners, selectors, and marks that commonly survive as
/// standalone codepoints in command-line text.
const ZERO_WIDTH: &[char] = &[
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{FEFF}', // zero width no-break space / BOM
    '\u{FE0E}', // variation selector-15 (text presentation)
    '\u{FE0F}', // variation selector-16 (emoji presentation)
];

/// Display width of a single codepoint: 0 for controls/combining/zero-width,
/// 1 or 2 for printable characters (2 for East-Asian wide/full-width).
pub fn char_width(c: char) -> u8 {
    if c.is_control() {
        return 0;
    }
    if ZERO_WIDTH.contains(&c) {
        return 0;
    }
    match UnicodeWidthChar::width(c) {
        Some(w) => w.min(2) as u8,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_width_one() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width(' '), 1);
    }

    #[test]
    fn control_chars_are_width_zero() {
        assert_eq!(char_width('\n'), 0);
        assert_eq!(char_width('\t'), 0);
        assert_eq!(char_width('\x1b'), 0);
        assert_eq!(char_width('\x07'), 0);
    }

    #[test]
    fn combining_mark_is_width_zero() {
        assert_eq!(char_width('\u{0301}'), 0); // combining acute accent
    }

    #[test]
    fn east_asian_wide_is_width_two() {
        assert_eq!(char_width('漢'), 2);
        assert_eq!(char_width('字'), 2);
    }

    #[test]
    fn zero_width_joiner_is_width_zero() {
        assert_eq!(char_width('\u{200D}'), 0);
        assert_eq!(char_width('\u{FE0F}'), 0);
    }

    #[test]
    fn always_in_range() {
        for c in ['a', '漢', '\u{0301}', '\n', '\u{200D}', '€', '中'] {
            assert!(matches!(char_width(c), 0 | 1 | 2));
        }
    }
}
