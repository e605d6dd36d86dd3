//! Key-dispatch registry.
//!
//! Each widget type builds one [`KeyMap`] the first time it is launched and
//! keeps it in a `static OnceLock`. A variant that needs different behavior
//! for a few keys starts from [`KeyMap::inherit`] on its base map and rebinds
//! them; the base map is never touched.

use std::collections::HashMap;

use log::debug;

use crate::core::error::PromptError;
use crate::core::key::SemanticKey;
use crate::term::screen::Screen;

/// Outcome of one handler call: `Some` ends the widget's loop with a value.
pub type Step<O> = Result<Option<O>, PromptError>;

pub type Handler<W, O> = fn(&mut W, &mut Screen<'_>) -> Step<O>;

/// Fallback for printable characters that have no explicit binding.
pub type CharHandler<W, O> = fn(&mut W, char, &mut Screen<'_>) -> Step<O>;

pub struct KeyMap<W, O> {
    handlers: HashMap<SemanticKey, Handler<W, O>>,
    on_char: Option<CharHandler<W, O>>,
}

impl<W, O> KeyMap<W, O> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            on_char: None,
        }
    }

    /// Bind every key in `keys` to `handler`, replacing earlier bindings.
    pub fn bind(mut self, keys: &[SemanticKey], handler: Handler<W, O>) -> Self {
        for key in keys {
            self.handlers.insert(*key, handler);
        }
        self
    }

    pub fn on_char(mut self, handler: CharHandler<W, O>) -> Self {
        self.on_char = Some(handler);
        self
    }

    /// A copy of this map to build a variant on.
    pub fn inherit(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            on_char: self.on_char,
        }
    }

    pub fn get(&self, key: SemanticKey) -> Option<Handler<W, O>> {
        self.handlers.get(&key).copied()
    }

    /// Run the handler bound to `key` against `widget`. Unbound keys do
    /// nothing.
    pub fn dispatch(&self, widget: &mut W, key: SemanticKey, screen: &mut Screen<'_>) -> Step<O> {
        if let Some(handler) = self.get(key) {
            return handler(widget, screen);
        }
        match (key, self.on_char) {
            (SemanticKey::Char(c), Some(handler)) => handler(widget, c, screen),
            _ => {
                debug!("No handler for {key}");
                Ok(None)
            }
        }
    }
}

impl<W, O> Default for KeyMap<W, O> {
    fn default() -> Self {
        Self::new()
    }
}
