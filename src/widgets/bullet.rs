use std::io;
use std::sync::OnceLock;

use log::info;

use crate::core::error::{BuildError, PromptError};
use crate::core::key::SemanticKey;
use crate::term::screen::Screen;
use crate::term::style::{self, Palette};
use crate::term::{KeyMap, Step, Terminal};
use crate::widgets::component::{Prompt, Selection};
use crate::widgets::list::{self, Choices, ListBuilder, ListLook, Mark, SelectableList};

/// Single-select list: a bullet marks the current choice, Enter picks it.
#[derive(Debug, Clone)]
pub struct Bullet {
    prompt: String,
    choices: Choices,
    look: ListLook,
    bullet: String,
    bullet_color: String,
    default: Option<usize>,
    return_index: bool,
    cursor: usize,
}

impl Bullet {
    pub fn new<S: Into<String>>(
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = S>,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            prompt: prompt.into(),
            choices: Choices::new(choices)?,
            look: ListLook::default(),
            bullet: "●".to_string(),
            bullet_color: Palette::Foreground.default_code(),
            default: None,
            return_index: false,
            cursor: 0,
        })
    }

    pub fn bullet(mut self, glyph: impl Into<String>) -> Self {
        self.bullet = glyph.into();
        self
    }

    pub fn bullet_color(mut self, color: &str) -> Self {
        self.bullet_color = style::resolve(color, Palette::Foreground);
        self
    }

    /// Start with the cursor on `index`.
    pub fn default(mut self, index: usize) -> Result<Self, BuildError> {
        if index >= self.choices.len() {
            return Err(BuildError::DefaultOutOfRange {
                index,
                len: self.choices.len(),
            });
        }
        self.default = Some(index);
        Ok(self)
    }

    /// Answer with [`Selection::Indexed`] instead of the bare label.
    pub fn return_index(mut self, on: bool) -> Self {
        self.return_index = on;
        self
    }

    pub fn choices(&self) -> &Choices {
        &self.choices
    }

    fn keymap() -> &'static KeyMap<Bullet, Selection> {
        static KEYMAP: OnceLock<KeyMap<Bullet, Selection>> = OnceLock::new();
        KEYMAP.get_or_init(|| {
            KeyMap::new()
                .bind(&[SemanticKey::ArrowUp], list::move_up)
                .bind(&[SemanticKey::ArrowDown], list::move_down)
                .bind(&[SemanticKey::Home], list::move_top)
                .bind(&[SemanticKey::End], list::move_bottom)
                .bind(&[SemanticKey::Enter], Bullet::accept)
                .bind(&[SemanticKey::Interrupt], list::interrupt)
        })
    }

    fn accept(&mut self, screen: &mut Screen<'_>) -> Step<Selection> {
        screen.move_down(self.rows_below())?;
        let index = self.cursor;
        let label = self.choices.label(index).to_string();
        self.cursor = 0;
        info!("Bullet accepted {label:?} ({index})");
        Ok(Some(if self.return_index {
            Selection::Indexed { label, index }
        } else {
            Selection::Label(label)
        }))
    }
}

impl ListBuilder for Bullet {
    fn look_mut(&mut self) -> &mut ListLook {
        &mut self.look
    }
}

impl SelectableList for Bullet {
    fn len(&self) -> usize {
        self.choices.len()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    fn paint_row(&self, screen: &mut Screen<'_>, idx: usize) -> io::Result<()> {
        let mark = Mark {
            glyph: &self.bullet,
            color: &self.bullet_color,
            shown: idx == self.cursor,
        };
        self.look
            .paint(screen, &self.choices, idx, mark, idx == self.cursor)?;
        screen.line_head()
    }
}

impl Prompt for Bullet {
    type Output = Selection;

    fn prompt(&self) -> &str {
        &self.prompt
    }

    fn launch(&mut self, term: &mut Terminal<'_>) -> Result<Selection, PromptError> {
        let screen = term.screen();
        self.look.write_header(screen, &self.prompt)?;
        self.cursor = self.default.unwrap_or(0);
        self.render_rows(screen)?;
        term.run_hidden(self, Self::keymap())
    }

    fn rendered_rows(&self) -> usize {
        self.look.header_rows(&self.prompt) + self.choices.len()
    }
}
