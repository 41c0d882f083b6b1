//! Process-wide cache of recognized escape sequences and measured prompt layouts.
//!
//! Two independent structures share one cache object because both are
//! invalidated by the same event: a change to `$TERM`, locale, or any other
//! terminal-capability input. Exposing `clear()` explicitly (rather than
//! hiding the cache behind magic global state) keeps that invalidation the
//! host's responsibility, not ours.

use crate::prompt::PromptLayout;
use std::sync::{Mutex, OnceLock};

/// Hard cap on the number of cached prompt layouts. Not configurable: a
/// prompt is re-measured constantly across keystrokes but the set of
/// distinct prompt strings seen in a session is small, so this is plenty.
pub const PROMPT_CACHE_CAPACITY: usize = 8;

/// Sorted, prefix-free set of escape-sequence strings used as a fast-path
/// prefix index by `escape::escape_code_length`.
#[derive(Debug, Default)]
pub struct EscCache {
    entries: Vec<String>,
}

impl EscCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the first entry strictly greater than `s` (lexicographic upper bound).
    fn upper_bound(&self, s: &str) -> usize {
        self.entries.partition_point(|e| e.as_str() <= s)
    }

    /// Insert `s`, maintaining sort order and the prefix-free invariant.
    /// No-op if `s` is already present. Refuses (debug-asserts) an insertion
    /// that would make an existing entry a prefix of `s` or vice versa —
    /// that would break the binary-search lookup in `find`.
    pub fn add(&mut self, s: &str) {
        if self.entries.iter().any(|e| e == s) {
            return;
        }
        let violates_prefix_free = self
            .entries
            .iter()
            .any(|e| e.starts_with(s.as_ref()) || s.starts_with(e.as_str()));
        debug_assert!(
            !violates_prefix_free,
            "escape code {s:?} is a prefix of (or prefixed by) an existing cache entry"
        );
        if violates_prefix_free {
            return;
        }
        let pos = self.upper_bound(s);
        self.entries.insert(pos, s.to_string());
    }

    /// Length of the cached escape sequence that is a prefix of `s`, or 0 if none match.
    /// Relies on prefix-freeness: among entries that prefix `s`, only the longest one
    /// can be the upper-bound predecessor, so a single candidate check suffices.
    pub fn find(&self, s: &str) -> usize {
        let ub = self.upper_bound(s);
        if ub == 0 {
            return 0;
        }
        let candidate = &self.entries[ub - 1];
        if s.starts_with(candidate.as_str()) {
            candidate.len()
        } else {
            0
        }
    }

    pub fn is_sorted_and_prefix_free(&self) -> bool {
        for w in self.entries.windows(2) {
            if w[0] >= w[1] {
                return false;
            }
        }
        for i in 0..self.entries.len() {
            for j in 0..self.entries.len() {
                if i != j && self.entries[j].starts_with(self.entries[i].as_str()) {
                    return false;
                }
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Most-recent-first LRU of prompt string to measured layout, capacity `PROMPT_CACHE_CAPACITY`.
#[derive(Debug, Default)]
pub struct PromptCache {
    entries: Vec<(String, PromptLayout)>,
}

impl PromptCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `prompt`; on hit, splice the entry to the front and return its layout.
    pub fn find(&mut self, prompt: &str) -> Option<PromptLayout> {
        let idx = self.entries.iter().position(|(p, _)| p == prompt)?;
        let entry = self.entries.remove(idx);
        let layout = entry.1;
        self.entries.insert(0, entry);
        Some(layout)
    }

    /// Insert at the front, evicting the least-recently-used entry if over capacity.
    pub fn add(&mut self, prompt: String, layout: PromptLayout) {
        self.entries.retain(|(p, _)| p != &prompt);
        self.entries.insert(0, (prompt, layout));
        if self.entries.len() > PROMPT_CACHE_CAPACITY {
            self.entries.truncate(PROMPT_CACHE_CAPACITY);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The paired layout cache: escape-sequence prefix index plus prompt-layout LRU.
#[derive(Debug, Default)]
pub struct LayoutCache {
    pub esc_cache: EscCache,
    pub prompt_cache: PromptCache,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.esc_cache.clear();
        self.prompt_cache.clear();
        tracing::debug!(target: "core_text::layout_cache", "layout cache cleared");
    }

    /// Process-wide singleton. The host calls `global().lock().unwrap().clear()`
    /// whenever `$TERM`, locale, or capability detection changes.
    pub fn global() -> &'static Mutex<LayoutCache> {
        static CACHE: OnceLock<Mutex<LayoutCache>> = OnceLock::new();
        CACHE.get_or_init(|| Mutex::new(LayoutCache::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptLayout;

    #[test]
    fn esc_cache_stays_sorted_and_prefix_free() {
        let mut c = EscCache::new();
        for s in ["\x1b[31m", "\x1b]0;title\x07", "\x1b[1m", "\x1bA"] {
            c.add(s);
            assert!(c.is_sorted_and_prefix_free());
        }
    }

    #[test]
    fn esc_cache_find_returns_longest_match() {
        let mut c = EscCache::new();
        c.add("\x1b[31m");
        assert_eq!(c.find("\x1b[31mhi"), 5);
        assert_eq!(c.find("hi"), 0);
    }

    #[test]
    fn esc_cache_refuses_prefix_violation() {
        let mut c = EscCache::new();
        c.add("\x1b[31m");
        c.add("\x1b[31"); // would be a prefix of the existing entry; rejected
        assert_eq!(c.find("\x1b[31mhi"), 5);
    }

    #[test]
    fn prompt_cache_lru_eviction_order() {
        let mut c = PromptCache::new();
        for i in 1..=9 {
            c.add(format!("P{i}"), PromptLayout::new(1, i, i));
        }
        assert_eq!(c.len(), 8);
        // P1 was evicted (oldest, capacity 8 means P1..P9 keeps last 8: P2..P9).
        assert!(c.find("P1").is_none());
        assert!(c.find("P2").is_some());
        // Querying P2 promotes it to front; insert P10 evicts the now-oldest entry (P3).
        c.add("P10".to_string(), PromptLayout::new(1, 10, 10));
        assert_eq!(c.len(), 8);
        assert!(c.find("P3").is_none());
        assert!(c.find("P2").is_some());
    }

    #[test]
    fn global_singleton_clear_is_idempotent() {
        let cache = LayoutCache::global();
        cache.lock().unwrap().esc_cache.add("\x1bZ");
        cache.lock().unwrap().clear();
        cache.lock().unwrap().clear();
        assert!(cache.lock().unwrap().prompt_cache.is_empty());
    }
}
