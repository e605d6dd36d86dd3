//! Output sink for widgets.
//!
//! Everything a widget draws goes through here as an append-only stream of
//! text and control sequences. Nothing ever asks the terminal where its
//! cursor is: every widget tracks the cursor row symbolically and moves it
//! with the relative helpers below. There is no absolute positioning and no
//! full-screen clear.

use std::io::{self, Write};

use crossterm::QueueableCommand;
use crossterm::cursor::{Hide, MoveDown, MoveUp, Show};
use crossterm::terminal::{Clear, ClearType};
use unicode_width::UnicodeWidthStr;

use crate::term::style::RESET;

pub struct Screen<'a> {
    out: &'a mut dyn Write,
    width: u16,
}

impl<'a> Screen<'a> {
    /// `width` is the terminal width in columns, captured by the caller.
    pub fn new(out: &'a mut dyn Write, width: u16) -> Self {
        Self { out, width }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// Write text that may span several lines. Line feeds get a carriage
    /// return so the block renders the same in raw mode.
    pub fn write_block(&mut self, text: &str) -> io::Result<()> {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline()?;
            }
            self.write(line)?;
        }
        Ok(())
    }

    /// `background + color + text + reset`. Empty codes are skipped.
    pub fn styled(&mut self, text: &str, color: &str, background: &str) -> io::Result<()> {
        if color.is_empty() && background.is_empty() {
            return self.write(text);
        }
        self.write(background)?;
        self.write(color)?;
        self.write(text)?;
        self.write(RESET)
    }

    pub fn spaces(&mut self, n: usize) -> io::Result<()> {
        if n > 0 {
            write!(self.out, "{:n$}", "")?;
        }
        Ok(())
    }

    pub fn newline(&mut self) -> io::Result<()> {
        self.write("\r\n")
    }

    pub fn newlines(&mut self, n: usize) -> io::Result<()> {
        for _ in 0..n {
            self.newline()?;
        }
        Ok(())
    }

    /// Carriage return: column 0 of the current row.
    pub fn line_head(&mut self) -> io::Result<()> {
        self.write("\r")
    }

    /// `n` literal backspaces.
    pub fn backspace(&mut self, n: usize) -> io::Result<()> {
        for _ in 0..n {
            self.write("\u{8}")?;
        }
        Ok(())
    }

    pub fn move_up(&mut self, n: usize) -> io::Result<()> {
        // CSI 0 A moves one row on most terminals, so zero must emit nothing.
        if n > 0 {
            self.out.queue(MoveUp(clamp_rows(n)))?;
        }
        Ok(())
    }

    pub fn move_down(&mut self, n: usize) -> io::Result<()> {
        if n > 0 {
            self.out.queue(MoveDown(clamp_rows(n)))?;
        }
        Ok(())
    }

    /// Blank the current row and return to its first column.
    pub fn clear_line(&mut self) -> io::Result<()> {
        self.out.queue(Clear(ClearType::CurrentLine))?;
        self.line_head()
    }

    /// Blank from the cursor to the end of the row.
    pub fn clear_to_end(&mut self) -> io::Result<()> {
        self.out.queue(Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    /// Blank the current row and the `n` rows above it, leaving the cursor at
    /// the start of the topmost one.
    pub fn clear_rows_up(&mut self, n: usize) -> io::Result<()> {
        self.clear_line()?;
        for _ in 0..n {
            self.move_up(1)?;
            self.clear_line()?;
        }
        Ok(())
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        self.out.queue(Hide)?;
        Ok(())
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        self.out.queue(Show)?;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn clamp_rows(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Display width in terminal columns.
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Number of rows a block of text occupies, ignoring soft wrapping.
pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}
