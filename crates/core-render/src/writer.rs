//! Terminal writer abstraction.
//!
//! The diff-and-emit pass never touches a terminal directly: it queues
//! primitive commands against a `Writer`, which batches and flushes them
//! once per render. `CrosstermWriter` is the default, real-terminal
//! implementation; `RecordingWriter` (used by tests) records the command
//! sequence instead of touching a tty, so diff behavior can be asserted
//! without a real terminal.

use crate::style::Style;
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    Write(String),
    SetStyle(Style),
    ResetStyle,
    ClearToEol,
    ClearToEos,
}

pub trait Writer {
    fn move_to(&mut self, x: u16, y: u16);
    fn write_str(&mut self, s: &str);
    fn set_style(&mut self, style: Style);
    fn reset_style(&mut self);
    fn clear_to_eol(&mut self);
    fn clear_to_eos(&mut self);
    fn flush(&mut self) -> Result<()>;
}

/// Batches commands and flushes them to real stdout via crossterm.
#[derive(Default)]
pub struct CrosstermWriter {
    cmds: Vec<Command>,
}

impl CrosstermWriter {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
}

impl Writer for CrosstermWriter {
    fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    fn write_str(&mut self, s: &str) {
        if !s.is_empty() {
            self.cmds.push(Command::Write(s.to_string()));
        }
    }

    fn set_style(&mut self, style: Style) {
        self.cmds.push(Command::SetStyle(style));
    }

    fn reset_style(&mut self) {
        self.cmds.push(Command::ResetStyle);
    }

    fn clear_to_eol(&mut self) {
        self.cmds.push(Command::ClearToEol);
    }

    fn clear_to_eos(&mut self) {
        self.cmds.push(Command::ClearToEos);
    }

    fn flush(&mut self) -> Result<()> {
        let mut out = stdout();
        for c in self.cmds.drain(..) {
            match c {
                Command::MoveTo(x, y) => {
                    queue!(out, MoveTo(x, y))?;
                }
                Command::Write(s) => {
                    queue!(out, Print(s))?;
                }
                Command::SetStyle(style) => {
                    // The highlighter's style token is opaque; we map it onto a
                    // small ANSI palette by index rather than a fixed meaning.
                    queue!(
                        out,
                        SetAttribute(Attribute::Bold),
                        SetForegroundColor(crossterm::style::Color::AnsiValue(
                            (style.0.rem_euclid(256)) as u8
                        ))
                    )?;
                }
                Command::ResetStyle => {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                }
                Command::ClearToEol => {
                    queue!(out, Clear(ClearType::UntilNewLine))?;
                }
                Command::ClearToEos => {
                    queue!(out, Clear(ClearType::FromCursorDown))?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Records the command sequence instead of touching a terminal. Used by
/// `core-render`'s own tests and available to hosts that want to assert on
/// what would have been emitted.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub cmds: Vec<Command>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Writer for RecordingWriter {
    fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    fn write_str(&mut self, s: &str) {
        if !s.is_empty() {
            self.cmds.push(Command::Write(s.to_string()));
        }
    }

    fn set_style(&mut self, style: Style) {
        self.cmds.push(Command::SetStyle(style));
    }

    fn reset_style(&mut self) {
        self.cmds.push(Command::ResetStyle);
    }

    fn clear_to_eol(&mut self) {
        self.cmds.push(Command::ClearToEol);
    }

    fn clear_to_eos(&mut self) {
        self.cmds.push(Command::ClearToEos);
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_writer_preserves_order() {
        let mut w = RecordingWriter::new();
        w.move_to(0, 0);
        w.set_style(Style(1));
        w.write_str("hi");
        w.clear_to_eol();
        assert_eq!(
            w.cmds,
            vec![
                Command::MoveTo(0, 0),
                Command::SetStyle(Style(1)),
                Command::Write("hi".to_string()),
                Command::ClearToEol,
            ]
        );
    }

    #[test]
    fn empty_writes_are_not_queued() {
        let mut w = RecordingWriter::new();
        w.write_str("");
        assert!(w.cmds.is_empty());
    }
}
