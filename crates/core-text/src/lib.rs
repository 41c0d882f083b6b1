//! Display-width, escape-sequence recognition, and prompt layout.
//!
//! This crate is the "text" half of the differential screen renderer: given
//! raw code units (prompt strings, command-line text) it answers two
//! questions the layout pass and the diff-and-emit pass both need —
//! *how many columns does this take*, and *is this actually a terminal
//! control sequence that takes zero columns*. Both answers are cached
//! (`layout_cache`) since prompts and escape sequences repeat across
//! keystrokes far more often than they change.
//!
//! No Unicode normalization happens here; grapheme-cluster awareness is
//! limited to East-Asian wide detection and a fixed list of zero-width
//! controls (see `width::char_width`).

pub mod escape;
pub mod layout_cache;
pub mod prompt;
pub mod width;

pub use escape::escape_code_length;
pub use layout_cache::LayoutCache;
pub use prompt::{PromptLayout, compute_prompt_layout};
pub use width::char_width;
