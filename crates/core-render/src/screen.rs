//! Screen state: the desired/actual grid pair and the bookkeeping diff-and-emit
//! needs across renders (last prompt drawn, soft-wrap cursor trick location,
//! foreign-output stat snapshots, pending reset bookkeeping).

use crate::foreign_output::FileStat;
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    CurrentLineContents,
    CurrentLineAndPrompt,
    AbandonLine,
    AbandonLineAndClearToEndOfScreen,
}

#[derive(Debug)]
pub struct ScreenState {
    pub desired: Grid,
    pub actual: Grid,
    pub last_left_prompt: String,
    pub last_right_prompt_width: u16,
    /// -1 sentinel meaning "unknown"; otherwise the last known terminal width.
    pub actual_width: i32,
    pub soft_wrap_location: Option<(u16, u16)>,
    pub autosuggestion_is_truncated: bool,
    pub need_clear_lines: bool,
    pub need_clear_screen: bool,
    pub actual_lines_before_reset: usize,
    /// Set by `AbandonLine*` reset modes; consumed by the next diff-and-emit
    /// pass to move past the abandoned line before drawing.
    pub pending_line_advance: bool,
    pub prev_stdout_stat: Option<FileStat>,
    pub prev_stderr_stat: Option<FileStat>,
    pub post_stdout_stat: Option<FileStat>,
    pub post_stderr_stat: Option<FileStat>,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            desired: Grid::new(),
            actual: Grid::new(),
            last_left_prompt: String::new(),
            last_right_prompt_width: 0,
            actual_width: -1,
            soft_wrap_location: None,
            autosuggestion_is_truncated: false,
            need_clear_lines: false,
            need_clear_screen: false,
            actual_lines_before_reset: 0,
            pending_line_advance: false,
            prev_stdout_stat: None,
            prev_stderr_stat: None,
            post_stdout_stat: None,
            post_stderr_stat: None,
        }
    }
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate `actual` per the given reset mode, per the table in the
    /// component design: every mode clears `actual` and forces a full-line
    /// repaint; the prompt-repainting and next-line and clear-to-end-of-screen
    /// behaviors layer on top of that.
    pub fn reset_with_mode(&mut self, mode: ResetMode) {
        self.actual_lines_before_reset = self.actual.len();
        self.actual.clear();
        self.need_clear_lines = true;
        self.soft_wrap_location = None;

        match mode {
            ResetMode::CurrentLineContents => {}
            ResetMode::CurrentLineAndPrompt => {
                self.last_left_prompt.clear();
            }
            ResetMode::AbandonLine => {
                self.last_left_prompt.clear();
                self.pending_line_advance = true;
            }
            ResetMode::AbandonLineAndClearToEndOfScreen => {
                self.last_left_prompt.clear();
                self.pending_line_advance = true;
                self.need_clear_screen = true;
            }
        }

        tracing::debug!(target: "core_render::screen", ?mode, "screen reset");
    }

    /// Two-bool convenience entry point. `(true, _)` always abandons the
    /// line; the explicit full-screen-clear mode is reachable only via
    /// `reset_with_mode`, since it is a rarer operator-requested case (e.g.
    /// running `clear`) rather than a per-keystroke reset decision.
    pub fn reset(&mut self, reset_cursor: bool, reset_prompt: bool) {
        let mode = match (reset_cursor, reset_prompt) {
            (false, false) => ResetMode::CurrentLineContents,
            (false, true) => ResetMode::CurrentLineAndPrompt,
            (true, _) => ResetMode::AbandonLine,
        };
        self.reset_with_mode(mode);
    }

    /// Record post-write stat snapshots; call immediately after a render
    /// flushes successfully.
    pub fn save_status(&mut self, stdout: Option<FileStat>, stderr: Option<FileStat>) {
        self.post_stdout_stat = stdout;
        self.post_stderr_stat = stderr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::style::Style;

    fn dirty_screen() -> ScreenState {
        let mut s = ScreenState::new();
        s.actual.line_mut(0).push(Cell::char('x', Style::NORMAL));
        s.actual.line_mut(1).push(Cell::char('y', Style::NORMAL));
        s
    }

    #[test]
    fn current_line_contents_clears_actual_without_touching_prompt() {
        let mut s = dirty_screen();
        s.last_left_prompt = "$ ".to_string();
        s.reset(false, false);
        assert!(s.actual.is_empty());
        assert_eq!(s.last_left_prompt, "$ ");
        assert!(!s.pending_line_advance);
        assert!(!s.need_clear_screen);
    }

    #[test]
    fn current_line_and_prompt_clears_prompt_too() {
        let mut s = dirty_screen();
        s.last_left_prompt = "$ ".to_string();
        s.reset(false, true);
        assert!(s.last_left_prompt.is_empty());
        assert!(!s.pending_line_advance);
    }

    #[test]
    fn reset_cursor_true_always_abandons_line() {
        let mut s = dirty_screen();
        s.reset(true, false);
        assert!(s.pending_line_advance);
        assert!(!s.need_clear_screen);

        let mut s2 = dirty_screen();
        s2.reset(true, true);
        assert!(s2.pending_line_advance);
        assert!(!s2.need_clear_screen);
    }

    #[test]
    fn full_clear_mode_only_reachable_via_mode_enum() {
        let mut s = dirty_screen();
        s.reset_with_mode(ResetMode::AbandonLineAndClearToEndOfScreen);
        assert!(s.pending_line_advance);
        assert!(s.need_clear_screen);
    }

    #[test]
    fn reset_records_prior_line_count() {
        let mut s = dirty_screen();
        assert_eq!(s.actual.len(), 2);
        s.reset(false, false);
        assert_eq!(s.actual_lines_before_reset, 2);
    }
}
