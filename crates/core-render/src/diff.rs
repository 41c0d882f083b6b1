//! Diff-and-emit: walk `desired` against `actual` line by line and cell by
//! cell, issuing the minimal cursor moves, attribute changes, character
//! writes, and clear-to-end commands through a `Writer`, then assign
//! `actual := desired`.

use crate::cell::Cell;
use crate::grid::Line;
use crate::screen::ScreenState;
use crate::style::Style;
use crate::writer::Writer;
use anyhow::Result;
use core_terminal::TerminalCapabilities;

/// Render `screen.desired` onto the terminal reached through `writer`,
/// reconciling it against `screen.actual`. On success, `actual` becomes the
/// grid that was just drawn and all dirty flags are cleared. On writer
/// failure, `actual` is left untouched so the next call retries the same
/// diff against the last known-good state.
pub fn diff_and_emit(
    screen: &mut ScreenState,
    writer: &mut impl Writer,
    caps: &TerminalCapabilities,
    width: u16,
) -> Result<()> {
    let mut last_style: Option<Style> = None;

    if screen.need_clear_screen {
        let first_actual_line = 0u16;
        writer.move_to(0, first_actual_line);
        writer.clear_to_eos();
        screen.actual.clear();
        screen.need_clear_screen = false;
    }

    if screen.actual_width != width as i32 {
        screen.need_clear_lines = true;
        screen.actual_width = width as i32;
    }

    if screen.pending_line_advance {
        writer.write_str("\r\n");
        screen.pending_line_advance = false;
    }

    let row_count = screen
        .desired
        .len()
        .max(screen.actual.len())
        .max(screen.actual_lines_before_reset);
    screen.actual_lines_before_reset = 0;
    let empty_line = Line::default();

    'rows: for row in 0..row_count {
        if row >= screen.desired.len() {
            writer.move_to(0, row as u16);
            writer.clear_to_eol();
            if caps.supports_soft_wrap_optimization() {
                writer.clear_to_eos();
                break 'rows;
            }
            continue;
        }

        let desired_line = screen.desired.line(row).unwrap_or(&empty_line);
        let actual_line = screen.actual.line(row).unwrap_or(&empty_line);

        let skip = matching_prefix_len(desired_line, actual_line);
        let skip_col: u16 = desired_line.cells[..skip]
            .iter()
            .map(|c| c.width() as u16)
            .sum();
        let desired_width = desired_line.width();
        let actual_width = actual_line.width();

        if skip_col < desired_width || actual_width > desired_width {
            writer.move_to(skip_col, row as u16);
            for cell in &desired_line.cells[skip..] {
                emit_cell(writer, cell, &mut last_style);
            }
            if actual_width > desired_width || screen.need_clear_lines {
                writer.clear_to_eol();
            }
        }

        if desired_line.soft_wrapped && caps.supports_soft_wrap_optimization() {
            screen.soft_wrap_location = Some((width, row as u16));
        } else if row + 1 < screen.desired.len() {
            writer.move_to(0, (row + 1) as u16);
        }
    }

    let target = screen.desired.cursor;
    if Some(target) != screen.soft_wrap_location {
        writer.move_to(target.0, target.1);
    }
    if last_style.map(|s| !s.is_normal()).unwrap_or(false) {
        writer.reset_style();
    }

    writer.flush()?;

    screen.actual = screen.desired.clone();
    screen.actual.cursor = target;
    screen.need_clear_lines = false;
    Ok(())
}

/// Emit `clr_eos` immediately, independent of any screen object (e.g. in
/// response to an explicit `clear` command).
pub fn force_clear_to_end(writer: &mut impl Writer) -> Result<()> {
    writer.clear_to_eos();
    writer.flush()
}

fn emit_cell(writer: &mut impl Writer, cell: &Cell, last_style: &mut Option<Style>) {
    if *last_style != Some(cell.style) {
        writer.set_style(cell.style);
        *last_style = Some(cell.style);
    }
    writer.write_str(&cell.as_str());
}

/// Length of the common prefix where both codepoint/escape text and style match.
fn matching_prefix_len(desired: &Line, actual: &Line) -> usize {
    desired
        .cells
        .iter()
        .zip(actual.cells.iter())
        .take_while(|(d, a)| d == a)
        .count()
}
