//! # Terminal Layer
//!
//! Everything that touches bytes: decoding keys, writing control sequences,
//! resolving colors, and the blocking loop that feeds keys to a widget.
//!
//! ## Modules
//!
//! - [`decoder`]: raw input units → `SemanticKey`
//! - [`keymap`]: per-widget key → handler tables
//! - [`screen`]: the output sink and relative cursor movement
//! - [`style`]: color names → escape codes
//! - [`wrap`]: word wrapping for help messages

pub mod decoder;
pub mod keymap;
pub mod screen;
pub mod style;
pub mod wrap;

use std::io::{self, Write};

use crossterm::terminal;
use log::{debug, info};

pub use decoder::{KeySource, ScriptedKeys, stdin_keys};
pub use keymap::{KeyMap, Step};
pub use screen::Screen;

use crate::core::error::PromptError;

/// Width assumed when the real terminal can't be asked.
pub const DEFAULT_WIDTH: u16 = 80;

/// Current terminal width, or [`DEFAULT_WIDTH`] when stdout is not a
/// terminal.
pub fn detect_width() -> u16 {
    match terminal::size() {
        Ok((cols, _)) if cols > 0 => cols,
        _ => DEFAULT_WIDTH,
    }
}

/// Puts the terminal in raw mode for as long as it lives, restoring the
/// previous mode on drop. Does nothing if raw mode was already on.
struct RawModeGuard {
    restore: bool,
}

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        if terminal::is_raw_mode_enabled()? {
            return Ok(Self { restore: false });
        }
        terminal::enable_raw_mode()?;
        debug!("Raw mode enabled");
        Ok(Self { restore: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.restore {
            let _ = terminal::disable_raw_mode();
            debug!("Raw mode restored");
        }
    }
}

/// A key source and an output sink, shared by every widget of a run.
pub struct Terminal<'a> {
    keys: &'a mut dyn KeySource,
    screen: Screen<'a>,
    raw_mode: bool,
}

impl<'a> Terminal<'a> {
    /// `width` is captured once here; widgets read it from the screen.
    pub fn new(keys: &'a mut dyn KeySource, out: &'a mut dyn Write, width: u16) -> Self {
        Self {
            keys,
            screen: Screen::new(out, width),
            raw_mode: false,
        }
    }

    /// Switch the real terminal to raw mode around every key loop. Off by
    /// default so scripted runs never touch the tty.
    pub fn with_raw_mode(mut self, raw_mode: bool) -> Self {
        self.raw_mode = raw_mode;
        self
    }

    pub fn screen(&mut self) -> &mut Screen<'a> {
        &mut self.screen
    }

    pub fn width(&self) -> u16 {
        self.screen.width()
    }

    /// Feed keys to `widget` through `keymap` until a handler produces a
    /// value or fails. Interruption and I/O errors end the loop.
    pub fn run<W, O>(&mut self, widget: &mut W, keymap: &KeyMap<W, O>) -> Result<O, PromptError> {
        let result = {
            let _raw = if self.raw_mode {
                Some(RawModeGuard::enter()?)
            } else {
                None
            };
            self.pump(widget, keymap)
        };
        self.screen.flush()?;
        if let Err(PromptError::Interrupted) = &result {
            info!("Prompt interrupted");
        }
        result
    }

    /// [`run`](Self::run) with the terminal cursor hidden. It is shown again
    /// on every exit path.
    pub fn run_hidden<W, O>(
        &mut self,
        widget: &mut W,
        keymap: &KeyMap<W, O>,
    ) -> Result<O, PromptError> {
        self.screen.hide_cursor()?;
        let result = self.run(widget, keymap);
        self.screen.show_cursor()?;
        self.screen.flush()?;
        result
    }

    fn pump<W, O>(&mut self, widget: &mut W, keymap: &KeyMap<W, O>) -> Result<O, PromptError> {
        self.screen.flush()?;
        loop {
            let key = self.keys.next_key()?;
            let step = keymap.dispatch(widget, key, &mut self.screen);
            self.screen.flush()?;
            if let Some(value) = step? {
                return Ok(value);
            }
            if key.is_terminal() {
                debug!("{key} did not end the prompt");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::key::SemanticKey;

    struct Echo {
        seen: Vec<SemanticKey>,
    }

    fn record_up(w: &mut Echo, screen: &mut Screen<'_>) -> Step<usize> {
        w.seen.push(SemanticKey::ArrowUp);
        screen.write("^")?;
        Ok(None)
    }

    fn finish(w: &mut Echo, _: &mut Screen<'_>) -> Step<usize> {
        Ok(Some(w.seen.len()))
    }

    fn interrupt(_: &mut Echo, screen: &mut Screen<'_>) -> Step<usize> {
        screen.newline()?;
        Err(PromptError::Interrupted)
    }

    fn keymap() -> KeyMap<Echo, usize> {
        KeyMap::new()
            .bind(&[SemanticKey::ArrowUp], record_up)
            .bind(&[SemanticKey::Enter], finish)
            .bind(&[SemanticKey::Interrupt], interrupt)
    }

    #[test]
    fn test_run_until_value() {
        let mut keys = ScriptedKeys::new([
            SemanticKey::ArrowUp,
            SemanticKey::Tab,
            SemanticKey::ArrowUp,
            SemanticKey::Enter,
            SemanticKey::ArrowUp,
        ]);
        let mut out = Vec::new();
        let mut term = Terminal::new(&mut keys, &mut out, 40);
        let mut echo = Echo { seen: Vec::new() };
        assert_eq!(term.run(&mut echo, &keymap()).unwrap(), 2);
        drop(term);
        assert_eq!(keys.remaining(), 1);
        assert_eq!(out, b"^^");
    }

    #[test]
    fn test_interrupt_propagates_after_output() {
        let mut keys = ScriptedKeys::new([SemanticKey::Interrupt]);
        let mut out = Vec::new();
        let mut term = Terminal::new(&mut keys, &mut out, 40);
        let mut echo = Echo { seen: Vec::new() };
        let err = term.run(&mut echo, &keymap()).unwrap_err();
        assert!(err.is_interrupt());
        drop(term);
        assert_eq!(out, b"\r\n");
    }

    #[test]
    fn test_end_of_input_is_fatal() {
        let mut keys = ScriptedKeys::new([SemanticKey::ArrowUp]);
        let mut out = Vec::new();
        let mut term = Terminal::new(&mut keys, &mut out, 40);
        let mut echo = Echo { seen: Vec::new() };
        let err = term.run(&mut echo, &keymap()).unwrap_err();
        assert!(matches!(err, PromptError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_run_hidden_restores_cursor() {
        let mut keys = ScriptedKeys::new([SemanticKey::Interrupt]);
        let mut out = Vec::new();
        let mut term = Terminal::new(&mut keys, &mut out, 40);
        let mut echo = Echo { seen: Vec::new() };
        assert!(term.run_hidden(&mut echo, &keymap()).is_err());
        drop(term);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[?25l"));
        assert!(text.ends_with("\x1b[?25h"));
    }
}
