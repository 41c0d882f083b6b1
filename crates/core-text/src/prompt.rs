//! Prompt layout: line count, maximum line width, and last-line width of a
//! prompt string, honoring embedded escape sequences and wide characters.

use crate::escape::escape_code_length;
use crate::layout_cache::LayoutCache;
use crate::width::char_width;
use core_terminal::TerminalCapabilities;

/// Display-column measurements of a (possibly multi-line) prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PromptLayout {
    pub line_count: usize,
    pub max_line_width: usize,
    pub last_line_width: usize,
}

impl PromptLayout {
    pub fn new(line_count: usize, max_line_width: usize, last_line_width: usize) -> Self {
        Self {
            line_count,
            max_line_width,
            last_line_width,
        }
    }
}

/// Compute (and cache) the layout of `prompt`. A cache hit returns the exact
/// layout a fresh computation would, and promotes the entry to the front of
/// the LRU.
pub fn compute_prompt_layout(
    prompt: &str,
    cache: &mut LayoutCache,
    caps: &TerminalCapabilities,
    tab_stop: usize,
) -> PromptLayout {
    if let Some(layout) = cache.prompt_cache.find(prompt) {
        return layout;
    }
    let layout = measure_prompt(prompt, cache, caps, tab_stop);
    cache.prompt_cache.add(prompt.to_string(), layout);
    layout
}

fn measure_prompt(
    prompt: &str,
    cache: &LayoutCache,
    caps: &TerminalCapabilities,
    tab_stop: usize,
) -> PromptLayout {
    let tab_stop = tab_stop.max(1);
    let mut line_count = 1usize;
    let mut max_line_width = 0usize;
    let mut col = 0usize;

    let bytes = prompt.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        let rest = &prompt[i..];
        let esc_len = escape_code_length(rest, cache, caps);
        if esc_len > 0 {
            i += esc_len;
            continue;
        }
        let c = rest.chars().next().expect("non-empty slice has a char");
        match c {
            '\n' => {
                max_line_width = max_line_width.max(col);
                col = 0;
                line_count += 1;
            }
            '\r' => {
                col = 0;
            }
            '\t' => {
                col = (col / tab_stop + 1) * tab_stop;
            }
            _ => {
                col += char_width(c) as usize;
            }
        }
        i += c.len_utf8();
    }
    max_line_width = max_line_width.max(col);

    PromptLayout {
        line_count,
        max_line_width,
        last_line_width: col,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (LayoutCache, TerminalCapabilities) {
        (LayoutCache::new(), TerminalCapabilities::detect())
    }

    #[test]
    fn single_line_plain_prompt() {
        let (mut cache, caps) = fixture();
        let layout = compute_prompt_layout("$ ", &mut cache, &caps, 8);
        assert_eq!(layout, PromptLayout::new(1, 2, 2));
    }

    #[test]
    fn multi_line_prompt_tracks_max_and_last() {
        let (mut cache, caps) = fixture();
        let layout = compute_prompt_layout("user@host\n$ ", &mut cache, &caps, 8);
        assert_eq!(layout.line_count, 2);
        assert_eq!(layout.max_line_width, 9);
        assert_eq!(layout.last_line_width, 2);
    }

    #[test]
    fn escape_sequences_consume_no_columns() {
        let (mut cache, caps) = fixture();
        let layout = compute_prompt_layout("\x1b[32m$\x1b[0m ", &mut cache, &caps, 8);
        assert_eq!(layout.max_line_width, 2);
        assert_eq!(layout.last_line_width, 2);
    }

    #[test]
    fn tab_advances_to_next_stop() {
        let (mut cache, caps) = fixture();
        let layout = compute_prompt_layout("a\tb", &mut cache, &caps, 8);
        // 'a' -> col 1, tab -> col 8, 'b' -> col 9
        assert_eq!(layout.last_line_width, 9);
    }

    #[test]
    fn wide_character_counts_two_columns() {
        let (mut cache, caps) = fixture();
        let layout = compute_prompt_layout("漢$ ", &mut cache, &caps, 8);
        assert_eq!(layout.last_line_width, 4);
    }

    #[test]
    fn cache_hit_matches_fresh_computation() {
        let (mut cache, caps) = fixture();
        let fresh = compute_prompt_layout("$ hello ", &mut cache, &caps, 8);
        let mut cache2 = LayoutCache::new();
        let again = compute_prompt_layout("$ hello ", &mut cache2, &caps, 8);
        assert_eq!(fresh, again);
        // Second lookup against the same cache is a hit and returns the same value.
        let cached = compute_prompt_layout("$ hello ", &mut cache, &caps, 8);
        assert_eq!(fresh, cached);
        assert_eq!(cache.prompt_cache.len(), 1);
    }
}
