//! Single-line editor used by every text field.
//!
//! The editor never repaints the whole line. An insert or delete rewrites
//! only the suffix from the edit point, then walks the terminal cursor back
//! with literal backspaces. Widths are display widths, so wide characters
//! move the cursor by two columns.

use std::io;
use std::sync::OnceLock;

use log::debug;
use unicode_width::UnicodeWidthChar;

use crate::core::error::PromptError;
use crate::core::key::SemanticKey;
use crate::term::screen::Screen;
use crate::term::style::Palette;
use crate::term::{KeyMap, Step, Terminal};

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct LineEditor {
    buffer: Vec<char>,
    cursor: usize,
    /// Glyph echoed instead of each character in masked mode.
    mask: Option<char>,
    word_color: String,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            mask: None,
            word_color: Palette::Foreground.default_code(),
        }
    }

    /// Echo `mask` for every character. Spaces are rejected in this mode.
    pub fn masked(mask: char) -> Self {
        Self {
            mask: Some(mask),
            ..Self::new()
        }
    }

    /// Resolved color code for echoed text.
    pub fn with_word_color(mut self, code: String) -> Self {
        self.word_color = code;
        self
    }

    pub fn buffer(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_masked(&self) -> bool {
        self.mask.is_some()
    }

    fn shown(&self, c: char) -> char {
        self.mask.unwrap_or(c)
    }

    /// Echo of `buffer[from..]` and its display width.
    fn echo_from(&self, from: usize) -> (String, usize) {
        let text: String = self.buffer[from..].iter().map(|&c| self.shown(c)).collect();
        let width = text.chars().map(char_width).sum();
        (text, width)
    }

    /// Splice `c` in at the cursor and advance past it.
    pub fn insert(&mut self, c: char, screen: &mut Screen<'_>) -> io::Result<()> {
        self.buffer.insert(self.cursor, c);
        let (suffix, width) = self.echo_from(self.cursor);
        screen.styled(&suffix, &self.word_color, "")?;
        screen.backspace(width - char_width(self.shown(c)))?;
        self.cursor += 1;
        Ok(())
    }

    /// Remove the character under the cursor. Returns `false` at the end of
    /// the buffer.
    pub fn delete(&mut self, screen: &mut Screen<'_>) -> io::Result<bool> {
        if self.cursor == self.buffer.len() {
            return Ok(false);
        }
        let removed = self.buffer.remove(self.cursor);
        let (suffix, width) = self.echo_from(self.cursor);
        let blank = char_width(self.shown(removed));
        screen.styled(&suffix, &self.word_color, "")?;
        screen.spaces(blank)?;
        screen.backspace(width + blank)?;
        Ok(true)
    }

    /// Walk the cursor to `to`. Returns `false`, and does nothing, if `to` is
    /// past the end of the buffer.
    pub fn move_to(&mut self, to: usize, screen: &mut Screen<'_>) -> io::Result<bool> {
        if to > self.buffer.len() {
            return Ok(false);
        }
        while self.cursor < to {
            let c = self.shown(self.buffer[self.cursor]);
            screen.styled(c.encode_utf8(&mut [0; 4]), &self.word_color, "")?;
            self.cursor += 1;
        }
        while self.cursor > to {
            self.cursor -= 1;
            screen.backspace(char_width(self.shown(self.buffer[self.cursor])))?;
        }
        Ok(true)
    }

    /// The buffer's contents. Leaves the editor empty for reuse.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        self.buffer.drain(..).collect()
    }

    /// Read one line from the keyboard, echoing as it is typed. Enter ends
    /// the line and moves to the next row.
    pub fn read_line(&mut self, term: &mut Terminal<'_>) -> Result<String, PromptError> {
        let keymap = if self.is_masked() {
            masked_keymap()
        } else {
            keymap()
        };
        let line = term.run(self, keymap)?;
        debug!("Read a line of {} characters", line.chars().count());
        Ok(line)
    }

    fn on_enter(&mut self, screen: &mut Screen<'_>) -> Step<String> {
        screen.newline()?;
        Ok(Some(self.take()))
    }

    fn on_interrupt(&mut self, screen: &mut Screen<'_>) -> Step<String> {
        screen.newline()?;
        self.take();
        Err(PromptError::Interrupted)
    }

    fn on_backspace(&mut self, screen: &mut Screen<'_>) -> Step<String> {
        if self.cursor > 0 && self.move_to(self.cursor - 1, screen)? {
            self.delete(screen)?;
        }
        Ok(None)
    }

    fn on_delete(&mut self, screen: &mut Screen<'_>) -> Step<String> {
        self.delete(screen)?;
        Ok(None)
    }

    fn on_left(&mut self, screen: &mut Screen<'_>) -> Step<String> {
        if self.cursor > 0 {
            self.move_to(self.cursor - 1, screen)?;
        }
        Ok(None)
    }

    fn on_right(&mut self, screen: &mut Screen<'_>) -> Step<String> {
        self.move_to(self.cursor + 1, screen)?;
        Ok(None)
    }

    fn on_begin(&mut self, screen: &mut Screen<'_>) -> Step<String> {
        self.move_to(0, screen)?;
        Ok(None)
    }

    fn on_end(&mut self, screen: &mut Screen<'_>) -> Step<String> {
        self.move_to(self.buffer.len(), screen)?;
        Ok(None)
    }

    fn on_space(&mut self, screen: &mut Screen<'_>) -> Step<String> {
        self.insert(' ', screen)?;
        Ok(None)
    }

    fn on_char(&mut self, c: char, screen: &mut Screen<'_>) -> Step<String> {
        self.insert(c, screen)?;
        Ok(None)
    }
}

fn ignore(_: &mut LineEditor, _: &mut Screen<'_>) -> Step<String> {
    Ok(None)
}

fn keymap() -> &'static KeyMap<LineEditor, String> {
    static KEYMAP: OnceLock<KeyMap<LineEditor, String>> = OnceLock::new();
    KEYMAP.get_or_init(|| {
        KeyMap::new()
            .bind(&[SemanticKey::Enter], LineEditor::on_enter)
            .bind(&[SemanticKey::Interrupt], LineEditor::on_interrupt)
            .bind(&[SemanticKey::Backspace], LineEditor::on_backspace)
            .bind(&[SemanticKey::Delete], LineEditor::on_delete)
            .bind(&[SemanticKey::ArrowLeft], LineEditor::on_left)
            .bind(&[SemanticKey::ArrowRight], LineEditor::on_right)
            .bind(&[SemanticKey::Home, SemanticKey::LineBegin], LineEditor::on_begin)
            .bind(&[SemanticKey::End, SemanticKey::LineEnd], LineEditor::on_end)
            .bind(&[SemanticKey::Space], LineEditor::on_space)
            .on_char(LineEditor::on_char)
    })
}

fn masked_keymap() -> &'static KeyMap<LineEditor, String> {
    static KEYMAP: OnceLock<KeyMap<LineEditor, String>> = OnceLock::new();
    KEYMAP.get_or_init(|| keymap().inherit().bind(&[SemanticKey::Space], ignore))
}
