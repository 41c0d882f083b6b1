//! Terminal capability detection.
//!
//! Breadth-first placeholder that records the booleans and control-sequence
//! strings the renderer consults when deciding whether it can use the
//! soft-wrap-without-newline optimization, relative cursor motion, and
//! styled output, or must fall back to a less efficient path.
//!
//! Design considerations:
//! * Must be cheap: detection runs once at startup (or whenever `$TERM`
//!   changes) and is driven entirely by environment inspection — no
//!   dependency on a terminfo database.
//! * Conservative: when in doubt, a capability is reported absent rather
//!   than guessed present, since a wrongly-assumed optimization corrupts
//!   the screen while a missed optimization only costs a few extra bytes.
//! * Extensible: struct is non-exhaustive so future capability bits can be
//!   added without breaking downstream code.

use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    /// Lines wrap automatically when a character is written in the last column.
    pub auto_right_margin: bool,
    /// Writing a character in the last column does not move the cursor until
    /// the next character is written (lets us avoid an explicit newline).
    pub eat_newline_glitch: bool,
    pub cursor_address: Option<String>,
    pub cursor_up: Option<String>,
    pub cursor_down: Option<String>,
    pub cursor_left: Option<String>,
    pub cursor_right: Option<String>,
    pub clr_eol: Option<String>,
    pub clr_eos: Option<String>,
    pub enter_bold_mode: Option<String>,
    pub exit_attribute_mode: Option<String>,
    pub set_a_foreground: Option<String>,
    pub set_a_background: Option<String>,
    pub carriage_return: Option<String>,
}

impl TerminalCapabilities {
    /// Detect capabilities from the environment. Optimistic defaults for any
    /// terminal that isn't explicitly known to be "dumb".
    pub fn detect() -> Self {
        let term = env::var("TERM").unwrap_or_default();
        let is_dumb = term.is_empty() || term == "dumb";

        if is_dumb {
            tracing::warn!(target: "core_terminal", term = %term, "dumb or unset $TERM; disabling layout optimizations");
            return Self {
                auto_right_margin: false,
                eat_newline_glitch: false,
                cursor_address: None,
                cursor_up: None,
                cursor_down: None,
                cursor_left: None,
                cursor_right: None,
                clr_eol: None,
                clr_eos: None,
                enter_bold_mode: None,
                exit_attribute_mode: None,
                set_a_foreground: None,
                set_a_background: None,
                carriage_return: Some("\r".to_string()),
            };
        }

        Self {
            auto_right_margin: true,
            eat_newline_glitch: true,
            cursor_address: Some("\x1b[%d;%dH".to_string()),
            cursor_up: Some("\x1b[A".to_string()),
            cursor_down: Some("\x1b[B".to_string()),
            cursor_left: Some("\x1b[D".to_string()),
            cursor_right: Some("\x1b[C".to_string()),
            clr_eol: Some("\x1b[K".to_string()),
            clr_eos: Some("\x1b[J".to_string()),
            enter_bold_mode: Some("\x1b[1m".to_string()),
            exit_attribute_mode: Some("\x1b[0m".to_string()),
            set_a_foreground: Some("\x1b[38;5;%dm".to_string()),
            set_a_background: Some("\x1b[48;5;%dm".to_string()),
            carriage_return: Some("\r".to_string()),
        }
    }

    /// All known literal capability strings (for the escape-recognition fallback path).
    /// Parameterized strings (containing `%`) are skipped: they are templates, not
    /// literal sequences that could appear verbatim in a byte stream.
    pub fn known_sequences(&self) -> Vec<&str> {
        [
            &self.cursor_address,
            &self.cursor_up,
            &self.cursor_down,
            &self.cursor_left,
            &self.cursor_right,
            &self.clr_eol,
            &self.clr_eos,
            &self.enter_bold_mode,
            &self.exit_attribute_mode,
            &self.set_a_foreground,
            &self.set_a_background,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .filter(|s| !s.contains('%'))
        .collect()
    }

    pub fn supports_soft_wrap_optimization(&self) -> bool {
        self.auto_right_margin && self.eat_newline_glitch
    }
}
