//! Differential screen renderer.
//!
//! Takes a desired screen state (prompts, command line, pager, cursor) and
//! drives a character-cell terminal from its last-known state to that target
//! while emitting as few control sequences as possible. The layout pass
//! (`layout`) builds the desired `Grid`; the diff-and-emit pass (`diff`)
//! reconciles it against `actual` through a `Writer`; `screen::ScreenState`
//! owns both grids plus the bookkeeping a reset or a foreign write on the
//! tty needs to invalidate.
//!
//! No region-level optimizations (block insert/delete, line-scroll reuse,
//! horizontal scroll), no mouse/input handling, no multi-window layout: this
//! crate draws one screen's worth of prompt + command line + pager, once
//! per call to [`write`].

pub mod cell;
pub mod diff;
pub mod foreign_output;
pub mod grid;
pub mod layout;
pub mod pager;
pub mod screen;
pub mod style;
pub mod writer;

pub use cell::{Cell, CellContent};
pub use core_text::escape_code_length;
pub use core_text::LayoutCache;
pub use grid::{Grid, Line};
pub use pager::PagerGrid;
pub use screen::{ResetMode, ScreenState};
pub use style::Style;
pub use writer::{Command, CrosstermWriter, RecordingWriter, Writer};

use anyhow::Result;
use core_config::RenderConfig;
use core_terminal::TerminalCapabilities;
use layout::LayoutInputs;

/// Perform a full render: build the desired grid from the given inputs,
/// check for foreign output written to the tty since the last render, diff
/// it against `screen.actual`, and emit the minimal control stream through
/// `writer`.
#[allow(clippy::too_many_arguments)]
pub fn write(
    screen: &mut ScreenState,
    writer: &mut impl Writer,
    caps: &TerminalCapabilities,
    config: &RenderConfig,
    left_prompt: &str,
    right_prompt: &str,
    commandline: &str,
    explicit_len: usize,
    colors: &[Style],
    indent: &[usize],
    cursor_pos: usize,
    pager: Option<&PagerGrid>,
    cursor_in_pager: bool,
    width: u16,
    screen_height: usize,
) -> Result<()> {
    check_foreign_output(screen);

    let cache = LayoutCache::global();
    let cache = cache.lock().expect("layout cache mutex poisoned");

    let inputs = LayoutInputs {
        left_prompt,
        right_prompt,
        commandline,
        explicit_len,
        colors,
        indent,
        cursor_pos,
        pager,
        cursor_in_pager,
        width: width as i32,
        screen_height,
    };
    let result = layout::build_desired_grid(
        &inputs,
        &cache,
        caps,
        config.tab_stop(),
        config.indent_width(),
    );
    drop(cache);

    screen.desired = result.grid;
    screen.autosuggestion_is_truncated = result.autosuggestion_is_truncated;
    screen.last_left_prompt = left_prompt.to_string();
    screen.last_right_prompt_width = result.right_prompt_width;

    diff::diff_and_emit(screen, writer, caps, width)?;

    save_status(screen);
    Ok(())
}

/// Invalidate `actual` per the given reset mode and the two-bool convenience
/// mapping (see `screen::ScreenState::reset`/`reset_with_mode`).
pub fn reset(screen: &mut ScreenState, reset_cursor: bool, reset_prompt: bool) {
    screen.reset(reset_cursor, reset_prompt);
}

pub fn reset_with_mode(screen: &mut ScreenState, mode: ResetMode) {
    screen.reset_with_mode(mode);
}

/// Take post-write stat snapshots of stdout/stderr so the next `write` can
/// detect whether something else wrote to the tty in between.
pub fn save_status(screen: &mut ScreenState) {
    let stdout = foreign_output::stat_stdout().ok();
    let stderr = foreign_output::stat_stderr().ok();
    screen.save_status(stdout, stderr);
}

/// Emit `clr_eos` immediately, independent of any screen object.
pub fn force_clear_to_end(writer: &mut impl Writer) -> Result<()> {
    diff::force_clear_to_end(writer)
}

fn check_foreign_output(screen: &mut ScreenState) {
    let stdout_changed = foreign_output::stat_stdout()
        .map(|pre| foreign_output::foreign_output_detected(screen.post_stdout_stat, &pre))
        .unwrap_or(false);
    let stderr_changed = foreign_output::stat_stderr()
        .map(|pre| foreign_output::foreign_output_detected(screen.post_stderr_stat, &pre))
        .unwrap_or(false);

    if stdout_changed || stderr_changed {
        tracing::warn!(
            target: "core_render",
            "foreign output detected on stdout/stderr since last render; abandoning line"
        );
        screen.reset(true, true);
    }
}
