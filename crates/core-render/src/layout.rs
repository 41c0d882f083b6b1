//! Layout pass: build the desired grid from a left prompt, a command line
//! with per-character style/indent, an optional right prompt, and a
//! pre-rendered pager grid.

use crate::cell::Cell;
use crate::grid::Grid;
use crate::pager::PagerGrid;
use crate::style::Style;
use core_text::{LayoutCache, char_width, compute_prompt_layout, escape_code_length};
use core_terminal::TerminalCapabilities;

/// One ellipsis-eligible character trimmed from the end of a truncated
/// autosuggestion is simply dropped, not replaced with a visible marker:
/// the suffix is synthetic suggestion text the user never typed, so cutting
/// it silently (rather than spending a column on `…`) keeps the truncated
/// tail legible without surprising column math.
pub struct LayoutInputs<'a> {
    pub left_prompt: &'a str,
    pub right_prompt: &'a str,
    pub commandline: &'a str,
    pub explicit_len: usize,
    pub colors: &'a [Style],
    pub indent: &'a [usize],
    pub cursor_pos: usize,
    pub pager: Option<&'a PagerGrid>,
    pub cursor_in_pager: bool,
    /// Current terminal width; `<= 0` is the "unknown/invalid" failure mode.
    pub width: i32,
    /// Total terminal rows available for prompt + command line + pager.
    pub screen_height: usize,
}

pub struct LayoutResult {
    pub grid: Grid,
    pub autosuggestion_is_truncated: bool,
    pub right_prompt_width: u16,
}

/// Build the desired grid. On malformed input (non-positive width, or a
/// colors/indent vector whose length disagrees with the command line),
/// degrades to a minimal grid containing only the left prompt and logs a
/// warning, per the documented failure mode.
pub fn build_desired_grid(
    inputs: &LayoutInputs,
    cache: &LayoutCache,
    caps: &TerminalCapabilities,
    tab_stop: u16,
    indent_width: u16,
) -> LayoutResult {
    let cmd_chars: Vec<char> = inputs.commandline.chars().collect();

    if inputs.width <= 0 {
        tracing::warn!(
            target: "core_render::layout",
            width = inputs.width,
            "invalid terminal width, degrading to prompt-only grid"
        );
        return degraded_grid(inputs, cache, caps, tab_stop);
    }
    if inputs.colors.len() != cmd_chars.len() || inputs.indent.len() != cmd_chars.len() {
        tracing::warn!(
            target: "core_render::layout",
            cmd_len = cmd_chars.len(),
            colors_len = inputs.colors.len(),
            indent_len = inputs.indent.len(),
            "style/indent vector length mismatch, degrading to prompt-only grid"
        );
        return degraded_grid(inputs, cache, caps, tab_stop);
    }

    let width = inputs.width as u16;
    let mut grid = Grid::new();

    let (mut col, mut row) = place_prompt(
        &mut grid,
        inputs.left_prompt,
        Style::NORMAL,
        cache,
        caps,
        tab_stop,
    );

    let pager_rows = inputs.pager.map(PagerGrid::len).unwrap_or(0);
    let max_row_index = inputs
        .screen_height
        .saturating_sub(pager_rows)
        .saturating_sub(1)
        .max(row as usize);

    let mut autosuggestion_is_truncated = false;

    for (i, &c) in cmd_chars.iter().enumerate() {
        let style = inputs.colors[i];
        let ind = inputs.indent[i];
        let is_suggestion = i >= inputs.explicit_len;

        let will_start_new_row = c == '\n' || col + char_width(c) as u16 > width;
        let candidate_row = if will_start_new_row { row + 1 } else { row };

        if is_suggestion && will_start_new_row && candidate_row as usize > max_row_index {
            autosuggestion_is_truncated = true;
            break;
        }

        if c == '\n' {
            row += 1;
            col = (ind as u16) * indent_width;
            grid.line_mut(row as usize).indentation = ind;
        } else {
            let w = char_width(c) as u16;
            if col + w > width {
                while col < width {
                    grid.line_mut(row as usize).push(Cell::char(' ', style));
                    col += 1;
                }
                grid.line_mut(row as usize).soft_wrapped = true;
                row += 1;
                col = 0;
                grid.line_mut(row as usize).indentation = ind;
            }
            if i == inputs.cursor_pos {
                grid.cursor = (col, row);
            }
            grid.line_mut(row as usize).push(Cell::char(c, style));
            col += w;
        }
    }
    if inputs.cursor_pos >= cmd_chars.len() {
        grid.cursor = (col, row);
    }

    let right_prompt_width = place_right_prompt(&mut grid, inputs.right_prompt, cache, caps, width);

    if let Some(pager) = inputs.pager {
        let pager_top = grid.len() as u16;
        for line in &pager.lines {
            grid.lines.push(line.clone());
        }
        if inputs.cursor_in_pager {
            if pager.is_empty() {
                tracing::warn!(
                    target: "core_render::layout",
                    "cursor_in_pager set with an empty pager grid; keeping command-line cursor"
                );
            } else {
                grid.cursor = (pager.cursor.0, pager_top + pager.cursor.1);
            }
        }
    }

    LayoutResult {
        grid,
        autosuggestion_is_truncated,
        right_prompt_width,
    }
}

fn degraded_grid(
    inputs: &LayoutInputs,
    cache: &LayoutCache,
    caps: &TerminalCapabilities,
    tab_stop: u16,
) -> LayoutResult {
    let mut grid = Grid::new();
    let (col, row) = place_prompt(
        &mut grid,
        inputs.left_prompt,
        Style::NORMAL,
        cache,
        caps,
        tab_stop,
    );
    grid.cursor = (col, row);
    LayoutResult {
        grid,
        autosuggestion_is_truncated: false,
        right_prompt_width: 0,
    }
}

/// Walk `text` left to right, pushing escape-sequence cells (zero width) and
/// character cells into `grid` starting at line 0, honoring newline,
/// carriage return and tab the same way `core_text::compute_prompt_layout`
/// measures them. Returns the column and row immediately after the text.
fn place_prompt(
    grid: &mut Grid,
    text: &str,
    style: Style,
    cache: &LayoutCache,
    caps: &TerminalCapabilities,
    tab_stop: u16,
) -> (u16, u16) {
    let tab_stop = tab_stop.max(1);
    let mut row: u16 = 0;
    let mut col: u16 = 0;
    let mut i = 0usize;
    let bytes = text.as_bytes();

    while i < bytes.len() {
        let rest = &text[i..];
        let esc_len = escape_code_length(rest, cache, caps);
        if esc_len > 0 {
            grid.line_mut(row as usize).push(Cell::escape(&rest[..esc_len]));
            i += esc_len;
            continue;
        }
        let c = rest.chars().next().expect("non-empty slice has a char");
        match c {
            '\n' => {
                row += 1;
                col = 0;
                grid.line_mut(row as usize);
            }
            '\r' => {
                col = 0;
            }
            '\t' => {
                let next_stop = (col / tab_stop + 1) * tab_stop;
                while col < next_stop {
                    grid.line_mut(row as usize).push(Cell::char(' ', style));
                    col += 1;
                }
            }
            _ => {
                grid.line_mut(row as usize).push(Cell::char(c, style));
                col += char_width(c) as u16;
            }
        }
        i += c.len_utf8();
    }
    (col, row)
}

/// Append the right prompt to line 0 if it fits with at least one column of
/// breathing room; otherwise drop it but return its measured width so the
/// caller can remember it for diff purposes (a shorter left prompt on a
/// later render should let it reappear cleanly).
fn place_right_prompt(
    grid: &mut Grid,
    right_prompt: &str,
    cache: &LayoutCache,
    caps: &TerminalCapabilities,
    width: u16,
) -> u16 {
    if right_prompt.is_empty() {
        return 0;
    }
    // `compute_prompt_layout` takes `&mut LayoutCache`; we're only given a
    // shared reference here (the grid build is read-only w.r.t. the cache),
    // so measure with a throwaway scratch cache seeded from escape lengths
    // already known. This never stores the result back into the shared
    // singleton; the caller's own `compute_prompt_layout` call for prompts
    // is what populates it.
    let mut scratch = LayoutCache::new();
    let layout = compute_prompt_layout(right_prompt, &mut scratch, caps, 8);
    let right_width = layout.last_line_width as u16;

    let line0_used = grid.line(0).map(|l| l.width()).unwrap_or(0);
    if line0_used + right_width + 1 > width {
        return right_width;
    }

    let start_col = width - right_width;
    let mut col = line0_used;
    while col < start_col {
        grid.line_mut(0).push(Cell::char(' ', Style::NORMAL));
        col += 1;
    }
    let mut i = 0usize;
    let bytes = right_prompt.as_bytes();
    while i < bytes.len() {
        let rest = &right_prompt[i..];
        let esc_len = escape_code_length(rest, cache, caps);
        if esc_len > 0 {
            grid.line_mut(0).push(Cell::escape(&rest[..esc_len]));
            i += esc_len;
            continue;
        }
        let c = rest.chars().next().expect("non-empty slice has a char");
        grid.line_mut(0).push(Cell::char(c, Style::NORMAL));
        i += c.len_utf8();
    }
    right_width
}
