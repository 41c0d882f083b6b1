//! Grid cell representation.
//!
//! A cell is either a printable character (width derived from the codepoint)
//! or a raw escape-sequence passthrough with zero display width. Keeping
//! embedded escape sequences (e.g. colors baked into a user's prompt string)
//! as their own zero-width cells lets the layout pass skip them without
//! losing them, and lets diff-and-emit reproduce them byte-for-byte without
//! routing them through the style-tracking write path.

use crate::style::Style;
use core_text::char_width;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Char(char),
    Escape(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub content: CellContent,
    pub style: Style,
}

impl Cell {
    pub fn char(c: char, style: Style) -> Self {
        Self {
            content: CellContent::Char(c),
            style,
        }
    }

    pub fn escape(seq: impl Into<String>) -> Self {
        Self {
            content: CellContent::Escape(seq.into()),
            style: Style::NORMAL,
        }
    }

    pub fn blank() -> Self {
        Self::char(' ', Style::NORMAL)
    }

    /// Display columns this cell occupies: 0 for escape passthrough cells,
    /// otherwise the codepoint's width.
    pub fn width(&self) -> u8 {
        match &self.content {
            CellContent::Char(c) => char_width(*c),
            CellContent::Escape(_) => 0,
        }
    }

    /// Raw bytes to hand the writer for this cell: the escape sequence
    /// verbatim, or the single character re-encoded as a string.
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        match &self.content {
            CellContent::Char(c) => std::borrow::Cow::Owned(c.to_string()),
            CellContent::Escape(s) => std::borrow::Cow::Borrowed(s.as_str()),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}
