//! Pieces shared by the three list widgets: the choice column, the look,
//! row painting, and the cursor-movement handlers `Bullet` and `Check` bind.
//!
//! Every list renders the same way: an optional prompt, `shift` blank rows,
//! then one row per visible choice. While a list is active the terminal
//! cursor sits at column 0 of the cursor's row.

use std::io;

use crate::core::error::{BuildError, PromptError};
use crate::term::Step;
use crate::term::screen::{Screen, line_count, text_width};
use crate::term::style::{self, Palette, REVERSE};

/// The labels of a list, with their display widths measured once.
#[derive(Debug, Clone)]
pub struct Choices {
    labels: Vec<String>,
    widths: Vec<usize>,
    max_width: usize,
}

impl Choices {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Result<Self, BuildError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(BuildError::EmptyChoices);
        }
        let widths: Vec<usize> = labels.iter().map(|l| text_width(l)).collect();
        let max_width = widths.iter().copied().max().unwrap_or(0);
        Ok(Self {
            labels,
            widths,
            max_width,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, idx: usize) -> &str {
        &self.labels[idx]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    fn padding(&self, idx: usize, pad_right: usize) -> usize {
        self.max_width + pad_right - self.widths[idx]
    }
}

/// Colors and spacing of a list. Colors are stored resolved.
#[derive(Debug, Clone)]
pub struct ListLook {
    pub prompt_color: String,
    pub word_color: String,
    pub word_on_switch: String,
    pub background_color: String,
    pub background_on_switch: String,
    pub pad_right: usize,
    pub indent: usize,
    pub align: usize,
    pub margin: usize,
    pub shift: usize,
}

impl Default for ListLook {
    fn default() -> Self {
        Self {
            prompt_color: Palette::Foreground.default_code(),
            word_color: Palette::Foreground.default_code(),
            word_on_switch: REVERSE.to_string(),
            background_color: Palette::Background.default_code(),
            background_on_switch: REVERSE.to_string(),
            pad_right: 0,
            indent: 0,
            align: 0,
            margin: 0,
            shift: 0,
        }
    }
}

/// The glyph column left of each label (bullet, check mark or pointer).
pub struct Mark<'m> {
    pub glyph: &'m str,
    pub color: &'m str,
    pub shown: bool,
}

impl ListLook {
    /// Prompt plus `shift` blank rows. Returns the rows written.
    pub fn write_header(&self, screen: &mut Screen<'_>, prompt: &str) -> io::Result<usize> {
        if prompt.is_empty() {
            return Ok(0);
        }
        screen.spaces(self.indent)?;
        screen.write(&self.prompt_color)?;
        screen.write_block(prompt)?;
        screen.write(style::RESET)?;
        screen.newline()?;
        screen.newlines(self.shift)?;
        Ok(self.header_rows(prompt))
    }

    pub fn header_rows(&self, prompt: &str) -> usize {
        if prompt.is_empty() {
            0
        } else {
            line_count(prompt) + self.shift
        }
    }

    /// One choice row, without returning to the row head.
    pub fn paint(
        &self,
        screen: &mut Screen<'_>,
        choices: &Choices,
        idx: usize,
        mark: Mark<'_>,
        highlighted: bool,
    ) -> io::Result<()> {
        let (word, back) = if highlighted {
            (&self.word_on_switch, &self.background_on_switch)
        } else {
            (&self.word_color, &self.background_color)
        };
        screen.spaces(self.indent + self.align)?;
        let mark_cell = if mark.shown {
            format!("{}{}", mark.glyph, " ".repeat(self.margin))
        } else {
            " ".repeat(text_width(mark.glyph) + self.margin)
        };
        screen.styled(&mark_cell, mark.color, back)?;
        screen.styled(choices.label(idx), word, back)?;
        screen.styled(&" ".repeat(choices.padding(idx, self.pad_right)), "", back)
    }
}

/// Builder methods shared by every list widget.
pub trait ListBuilder: Sized {
    fn look_mut(&mut self) -> &mut ListLook;

    fn prompt_color(mut self, color: &str) -> Self {
        self.look_mut().prompt_color = style::resolve(color, Palette::Foreground);
        self
    }

    fn word_color(mut self, color: &str) -> Self {
        self.look_mut().word_color = style::resolve(color, Palette::Foreground);
        self
    }

    fn word_on_switch(mut self, color: &str) -> Self {
        self.look_mut().word_on_switch = style::resolve(color, Palette::Foreground);
        self
    }

    fn background_color(mut self, color: &str) -> Self {
        self.look_mut().background_color = style::resolve(color, Palette::Background);
        self
    }

    fn background_on_switch(mut self, color: &str) -> Self {
        self.look_mut().background_on_switch = style::resolve(color, Palette::Background);
        self
    }

    fn pad_right(mut self, n: usize) -> Self {
        self.look_mut().pad_right = n;
        self
    }

    fn indent(mut self, n: usize) -> Self {
        self.look_mut().indent = n;
        self
    }

    fn align(mut self, n: usize) -> Self {
        self.look_mut().align = n;
        self
    }

    fn margin(mut self, n: usize) -> Self {
        self.look_mut().margin = n;
        self
    }

    fn shift(mut self, n: usize) -> Self {
        self.look_mut().shift = n;
        self
    }
}

/// A list whose whole choice set is on screen, one row each, with a single
/// cursor. `Bullet` and `Check` bind the handlers below.
pub trait SelectableList {
    fn len(&self) -> usize;

    fn cursor(&self) -> usize;

    fn set_cursor(&mut self, cursor: usize);

    /// Repaint row `idx` and return to its first column.
    fn paint_row(&self, screen: &mut Screen<'_>, idx: usize) -> io::Result<()>;

    /// Paint every row from the current terminal row down, leaving the
    /// terminal cursor on the cursor's row.
    fn render_rows(&self, screen: &mut Screen<'_>) -> io::Result<()> {
        for idx in 0..self.len() {
            self.paint_row(screen, idx)?;
            screen.newline()?;
        }
        screen.move_up(self.len() - self.cursor())
    }

    /// Rows from the cursor's row down to the row below the list.
    fn rows_below(&self) -> usize {
        self.len() - self.cursor()
    }

    /// Move the cursor to `to`, repainting the old and new rows.
    fn jump(&mut self, screen: &mut Screen<'_>, to: usize) -> io::Result<()> {
        let from = self.cursor();
        if from == to {
            return Ok(());
        }
        screen.clear_line()?;
        self.set_cursor(to);
        self.paint_row(screen, from)?;
        if to < from {
            screen.move_up(from - to)?;
        } else {
            screen.move_down(to - from)?;
        }
        self.paint_row(screen, to)
    }
}

pub fn move_up<L: SelectableList, O>(list: &mut L, screen: &mut Screen<'_>) -> Step<O> {
    if let Some(to) = list.cursor().checked_sub(1) {
        list.jump(screen, to)?;
    }
    Ok(None)
}

pub fn move_down<L: SelectableList, O>(list: &mut L, screen: &mut Screen<'_>) -> Step<O> {
    let to = list.cursor() + 1;
    if to < list.len() {
        list.jump(screen, to)?;
    }
    Ok(None)
}

pub fn move_top<L: SelectableList, O>(list: &mut L, screen: &mut Screen<'_>) -> Step<O> {
    list.jump(screen, 0)?;
    Ok(None)
}

pub fn move_bottom<L: SelectableList, O>(list: &mut L, screen: &mut Screen<'_>) -> Step<O> {
    let last = list.len() - 1;
    list.jump(screen, last)?;
    Ok(None)
}

/// Leave the list from below and unwind.
pub fn interrupt<L: SelectableList, O>(list: &mut L, screen: &mut Screen<'_>) -> Step<O> {
    screen.move_down(list.rows_below())?;
    Err(PromptError::Interrupted)
}
