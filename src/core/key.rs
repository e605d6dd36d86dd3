//! # Semantic Keys
//!
//! The closed set of logical keystrokes every widget understands. The
//! decoder in `term::decoder` is the only producer; the key-dispatch
//! registry and widget handlers are the only consumers.

use std::fmt;

/// One normalized, platform-independent keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticKey {
    Enter,
    Interrupt,
    Tab,
    Home,
    End,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Space,
    /// Ctrl+A
    LineBegin,
    /// Ctrl+E
    LineEnd,
    /// Anything the decoder could not map. Widgets ignore it.
    Undefined,
    /// A literal printable character.
    Char(char),
}

impl SemanticKey {
    /// Keys that end a widget's loop one way or the other.
    pub fn is_terminal(self) -> bool {
        matches!(self, SemanticKey::Enter | SemanticKey::Interrupt)
    }
}

impl fmt::Display for SemanticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticKey::Char(c) => write!(f, "Char({c:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}
