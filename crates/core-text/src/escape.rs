//! Recognizing the length of a terminal escape sequence at the start of a string.
//!
//! `escape_code_length` is pure given the current `LayoutCache` contents and
//! the capability set: same cache state + same capabilities + same input
//! always returns the same length. It never allocates on the hot path.

use crate::layout_cache::LayoutCache;
use core_terminal::TerminalCapabilities;

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Returns the number of leading bytes of `s` that form a terminal escape
/// sequence, or 0 if `s` does not begin with one.
pub fn escape_code_length(s: &str, cache: &LayoutCache, caps: &TerminalCapabilities) -> usize {
    if !s.starts_with(ESC) {
        return 0;
    }

    // 1. Fast path: a sequence the cache has already recognized once.
    let cached = cache.esc_cache.find(s);
    if cached > 0 {
        return cached;
    }

    // 2. CSI: ESC '[' params (0x30-0x3F) intermediates (0x20-0x2F) final (0x40-0x7E).
    if let Some(len) = csi_length(s) {
        return len;
    }

    // 3. OSC: ESC ']' ... BEL | ESC '\'.
    if let Some(len) = osc_length(s) {
        return len;
    }

    // 4. Two-byte ESC sequence: ESC + single byte in 0x20-0x7E, not '[' or ']'.
    if let Some(len) = two_byte_length(s) {
        return len;
    }

    // 5. Conservative capability-driven fallback.
    for known in caps.known_sequences() {
        if s.starts_with(known) {
            return known.len();
        }
    }

    0
}

fn csi_length(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    let (_, esc) = chars.next()?;
    debug_assert_eq!(esc, ESC);
    let (_, bracket) = chars.next()?;
    if bracket != '[' {
        return None;
    }
    for (idx, c) in chars {
        let b = c as u32;
        if (0x30..=0x3F).contains(&b) || (0x20..=0x2F).contains(&b) {
            continue;
        }
        if (0x40..=0x7E).contains(&b) {
            return Some(idx + c.len_utf8());
        }
        return None; // not a valid final byte; abandon CSI recognition
    }
    None // unterminated
}

fn osc_length(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    let (_, esc) = chars.next()?;
    debug_assert_eq!(esc, ESC);
    let (_, bracket) = chars.next()?;
    if bracket != ']' {
        return None;
    }
    let mut prev_was_esc = false;
    for (idx, c) in chars {
        if c == BEL {
            return Some(idx + 1);
        }
        if prev_was_esc && c == '\\' {
            return Some(idx + 1);
        }
        prev_was_esc = c == ESC;
    }
    None // unterminated
}

fn two_byte_length(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    let (_, esc) = chars.next()?;
    debug_assert_eq!(esc, ESC);
    let (idx, c) = chars.next()?;
    if c == '[' || c == ']' {
        return None; // handled by CSI/OSC above
    }
    let b = c as u32;
    if (0x20..=0x7E).contains(&b) {
        Some(idx + c.len_utf8())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (LayoutCache, TerminalCapabilities) {
        (LayoutCache::new(), TerminalCapabilities::detect())
    }

    #[test]
    fn csi_color_sequence() {
        let (cache, caps) = fixture();
        assert_eq!(escape_code_length("\x1b[31mhi", &cache, &caps), 5);
    }

    #[test]
    fn plain_text_is_zero() {
        let (cache, caps) = fixture();
        assert_eq!(escape_code_length("hi", &cache, &caps), 0);
    }

    #[test]
    fn osc_terminated_by_bel() {
        let (cache, caps) = fixture();
        let s = "\x1b]0;title\x07rest";
        assert_eq!(escape_code_length(s, &cache, &caps), 10);
    }

    #[test]
    fn osc_terminated_by_st() {
        let (cache, caps) = fixture();
        let s = "\x1b]0;title\x1b\\rest";
        assert_eq!(escape_code_length(s, &cache, &caps), 11);
    }

    #[test]
    fn two_byte_sequence() {
        let (cache, caps) = fixture();
        assert_eq!(escape_code_length("\x1bArest", &cache, &caps), 2);
    }

    #[test]
    fn cached_sequence_takes_fast_path() {
        let mut cache = LayoutCache::new();
        let caps = TerminalCapabilities::detect();
        cache.esc_cache.add("\x1b]0;title\x07");
        assert_eq!(
            escape_code_length("\x1b]0;title\x07rest", &cache, &caps),
            10
        );
    }

    #[test]
    fn capability_fallback_recognizes_known_literal() {
        let cache = LayoutCache::new();
        // A contrived capability string whose second byte falls outside the
        // printable 0x20-0x7E range, so rules 2-4 all decline and only the
        // capability fallback (rule 5) can recognize it.
        let caps = TerminalCapabilities {
            auto_right_margin: true,
            eat_newline_glitch: true,
            cursor_address: None,
            cursor_up: Some("\x1b\x01AB".to_string()),
            cursor_down: None,
            cursor_left: None,
            cursor_right: None,
            clr_eol: None,
            clr_eos: None,
            enter_bold_mode: None,
            exit_attribute_mode: None,
            set_a_foreground: None,
            set_a_background: None,
            carriage_return: None,
        };
        assert_eq!(escape_code_length("\x1b\x01ABrest", &cache, &caps), 4);
    }

    #[test]
    fn zero_iff_no_sequence_recognized() {
        let (cache, caps) = fixture();
        for s in ["", "plain", "\x1b", "\x1bq"] {
            let len = escape_code_length(s, &cache, &caps);
            if s.starts_with('\x1b') && s.len() > 1 {
                assert!(len > 0, "expected a match for {s:?}");
            } else {
                assert_eq!(len, 0, "expected no match for {s:?}");
            }
        }
    }
}
