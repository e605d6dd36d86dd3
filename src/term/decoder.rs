//! Key decoder: raw input units → [`SemanticKey`].
//!
//! Reading is split in two layers so the platform-specific part stays small:
//!
//! - a [`RawInput`] yields one platform-native unit per call. On Unix that
//!   is one UTF-8 character read from stdin in raw mode ([`ByteInput`]). The
//!   console byte layout, where special keys arrive as a `0x00`/`0xE0`
//!   prefix plus a scan code, is rewritten by [`ConsoleInput`] into the CSI
//!   units a terminal would have sent. On Windows, [`EventInput`] builds the
//!   same units from crossterm key events.
//! - [`KeyDecoder`] consumes exactly as many units as one key needs and maps
//!   them onto the closed key set. Unknown sequences become
//!   [`SemanticKey::Undefined`]; end of input is an error.

use std::collections::VecDeque;
use std::io::{self, Read};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

use crate::core::key::SemanticKey;

const LINE_BEGIN: char = '\u{01}';
const INTERRUPT: char = '\u{03}';
const LINE_END: char = '\u{05}';
const BACKSPACE: char = '\u{08}';
const TAB: char = '\t';
const LINE_FEED: char = '\n';
const CARRIAGE_RETURN: char = '\r';
const ESCAPE: char = '\u{1b}';
const DELETE: char = '\u{7f}';
const CSI: char = '[';
const TILDE: char = '~';

/// Console prefix bytes announcing a scan code.
const CONSOLE_PREFIX: u8 = 0x00;
const CONSOLE_EXTENDED_PREFIX: u8 = 0xE0;

/// Stands in for input that maps to no key. The decoder reads it as
/// [`SemanticKey::Undefined`].
const UNDEFINED_UNIT: char = '\u{0}';

/// A source of raw input units, one per call. Blocks until one is available.
pub trait RawInput {
    fn read_unit(&mut self) -> io::Result<char>;
}

/// Anything that can hand out semantic keys. Widgets only see this.
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<SemanticKey>;
}

// =============================================================================
// Raw inputs
// =============================================================================

/// UTF-8 characters read byte by byte from any reader.
pub struct ByteInput<R> {
    reader: R,
}

impl<R: Read> ByteInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "keyboard input closed",
                    ));
                }
                Ok(_) => return Ok(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Read the rest of the UTF-8 character whose first bytes are `lead`.
    /// Malformed input becomes [`UNDEFINED_UNIT`].
    fn finish_char(&mut self, lead: &[u8]) -> io::Result<char> {
        let len = match lead[0] {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            // Stray continuation byte.
            _ => return Ok(UNDEFINED_UNIT),
        };
        let mut buf = [0u8; 4];
        buf[..lead.len()].copy_from_slice(lead);
        for slot in buf.iter_mut().take(len).skip(lead.len()) {
            *slot = self.read_byte()?;
        }
        Ok(std::str::from_utf8(&buf[..len])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(UNDEFINED_UNIT))
    }
}

impl<R: Read> RawInput for ByteInput<R> {
    fn read_unit(&mut self) -> io::Result<char> {
        let first = self.read_byte()?;
        self.finish_char(&[first])
    }
}

/// `ESC [ id` plus a trailing `~` when `tilde` is set, after the `ESC`
/// already handed out.
fn queue_csi(pending: &mut VecDeque<char>, id: char, tilde: bool) {
    pending.push_back(CSI);
    pending.push_back(id);
    if tilde {
        pending.push_back(TILDE);
    }
}

/// Console byte layout: special keys arrive as a `0x00`/`0xE0` prefix byte
/// plus a scan code. Each pair is rewritten into `ESC [ id [~]` so the
/// decoder sees one layout on every platform; everything else is UTF-8.
///
/// The prefix is checked before UTF-8 assembly. `0xE0` also leads the
/// three-byte characters `U+0800..=U+0FFF`, whose second byte is always in
/// `0xA0..=0xBF`; any other byte after `0xE0` is a scan code.
pub struct ConsoleInput<R> {
    bytes: ByteInput<R>,
    pending: VecDeque<char>,
}

impl<R: Read> ConsoleInput<R> {
    pub fn new(bytes: ByteInput<R>) -> Self {
        Self {
            bytes,
            pending: VecDeque::new(),
        }
    }

    /// Scan code → CSI key id, and whether the sequence ends with `~`.
    fn translate(scan: u8) -> Option<(char, bool)> {
        Some(match scan {
            b'H' => ('A', false), // up
            b'P' => ('B', false), // down
            b'M' => ('C', false), // right
            b'K' => ('D', false), // left
            b'G' => ('H', false), // home
            b'O' => ('F', false), // end
            b'R' => ('2', true),  // insert
            b'S' => ('3', true),  // delete
            b'I' => ('5', true),  // page up
            b'Q' => ('6', true),  // page down
            _ => return None,
        })
    }

    fn scan_code(&mut self, scan: u8) -> char {
        match Self::translate(scan) {
            Some((id, tilde)) => {
                queue_csi(&mut self.pending, id, tilde);
                ESCAPE
            }
            None => {
                debug!("Unmapped console scan code {scan:#04x}");
                UNDEFINED_UNIT
            }
        }
    }
}

impl<R: Read> RawInput for ConsoleInput<R> {
    fn read_unit(&mut self) -> io::Result<char> {
        if let Some(unit) = self.pending.pop_front() {
            return Ok(unit);
        }
        let first = self.bytes.read_byte()?;
        match first {
            CONSOLE_PREFIX => {
                let scan = self.bytes.read_byte()?;
                Ok(self.scan_code(scan))
            }
            CONSOLE_EXTENDED_PREFIX => {
                let second = self.bytes.read_byte()?;
                if (0xA0..=0xBF).contains(&second) {
                    self.bytes.finish_char(&[first, second])
                } else {
                    Ok(self.scan_code(second))
                }
            }
            _ => self.bytes.finish_char(&[first]),
        }
    }
}

/// Units built from crossterm key events, for consoles that report keys as
/// events instead of bytes. Special keys become the CSI units a terminal
/// would send, control chords their control unit, and characters pass
/// through unchanged.
#[derive(Default)]
pub struct EventInput {
    pending: VecDeque<char>,
}

impl EventInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue_key(&mut self, key: KeyEvent) {
        let csi = |pending: &mut VecDeque<char>, id, tilde| {
            pending.push_back(ESCAPE);
            queue_csi(pending, id, tilde);
        };
        let pending = &mut self.pending;
        match key.code {
            // AltGr reports as Ctrl+Alt and types a character.
            KeyCode::Char(c)
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                if c.is_ascii_alphabetic() {
                    pending.push_back(char::from(c.to_ascii_lowercase() as u8 & 0x1f));
                }
            }
            KeyCode::Char(c) => pending.push_back(c),
            KeyCode::Enter => pending.push_back(CARRIAGE_RETURN),
            KeyCode::Tab => pending.push_back(TAB),
            KeyCode::Backspace => pending.push_back(DELETE),
            KeyCode::Esc => pending.push_back(ESCAPE),
            KeyCode::Up => csi(pending, 'A', false),
            KeyCode::Down => csi(pending, 'B', false),
            KeyCode::Right => csi(pending, 'C', false),
            KeyCode::Left => csi(pending, 'D', false),
            KeyCode::Home => csi(pending, 'H', false),
            KeyCode::End => csi(pending, 'F', false),
            KeyCode::Insert => csi(pending, '2', true),
            KeyCode::Delete => csi(pending, '3', true),
            KeyCode::PageUp => csi(pending, '5', true),
            KeyCode::PageDown => csi(pending, '6', true),
            other => debug!("Ignoring key event {other:?}"),
        }
    }
}

impl RawInput for EventInput {
    fn read_unit(&mut self) -> io::Result<char> {
        loop {
            if let Some(unit) = self.pending.pop_front() {
                return Ok(unit);
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    self.queue_key(key);
                }
            }
        }
    }
}

// =============================================================================
// Decoder
// =============================================================================

pub struct KeyDecoder<I> {
    input: I,
}

impl<I: RawInput> KeyDecoder<I> {
    pub fn new(input: I) -> Self {
        Self { input }
    }

    /// The units after `ESC`. `None` means "not a CSI sequence", in which
    /// case the escape is dropped and a fresh key is read.
    fn decode_escape(&mut self) -> io::Result<Option<SemanticKey>> {
        if self.input.read_unit()? != CSI {
            return Ok(None);
        }
        let id = self.input.read_unit()?;
        let key = match id {
            'A' => SemanticKey::ArrowUp,
            'B' => SemanticKey::ArrowDown,
            'C' => SemanticKey::ArrowRight,
            'D' => SemanticKey::ArrowLeft,
            'H' => SemanticKey::Home,
            'F' => SemanticKey::End,
            '1'..='8' => {
                if self.input.read_unit()? != TILDE {
                    return Ok(Some(SemanticKey::Undefined));
                }
                match id {
                    '1' | '7' => SemanticKey::Home,
                    '4' | '8' => SemanticKey::End,
                    '3' => SemanticKey::Delete,
                    '5' => SemanticKey::PageUp,
                    '6' => SemanticKey::PageDown,
                    // Insert has no meaning for any widget.
                    _ => SemanticKey::Undefined,
                }
            }
            _ => SemanticKey::Undefined,
        };
        Ok(Some(key))
    }
}

impl<I: RawInput> KeySource for KeyDecoder<I> {
    fn next_key(&mut self) -> io::Result<SemanticKey> {
        loop {
            let unit = self.input.read_unit()?;
            let key = match unit {
                CARRIAGE_RETURN | LINE_FEED => SemanticKey::Enter,
                INTERRUPT => SemanticKey::Interrupt,
                TAB => SemanticKey::Tab,
                BACKSPACE | DELETE => SemanticKey::Backspace,
                LINE_BEGIN => SemanticKey::LineBegin,
                LINE_END => SemanticKey::LineEnd,
                ' ' => SemanticKey::Space,
                ESCAPE => match self.decode_escape()? {
                    Some(key) => key,
                    None => continue,
                },
                c if !c.is_control() => SemanticKey::Char(c),
                _ => SemanticKey::Undefined,
            };
            debug!("Decoded key {key} from unit {unit:?}");
            return Ok(key);
        }
    }
}

/// Keyboard keys from this process's stdin, using the layout of the host.
pub fn stdin_keys() -> Box<dyn KeySource> {
    if cfg!(windows) {
        Box::new(KeyDecoder::new(EventInput::new()))
    } else {
        Box::new(KeyDecoder::new(ByteInput::new(io::stdin())))
    }
}

/// A fixed queue of keys. Running out behaves like a closed keyboard.
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeys {
    keys: VecDeque<SemanticKey>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = SemanticKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Printable text as `Char` keys (spaces become `Space`), then `Enter`.
    pub fn line(text: &str) -> Vec<SemanticKey> {
        text.chars()
            .map(|c| match c {
                ' ' => SemanticKey::Space,
                c => SemanticKey::Char(c),
            })
            .chain(std::iter::once(SemanticKey::Enter))
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> io::Result<SemanticKey> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted keys"))
    }
}
