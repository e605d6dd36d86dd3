use std::io;
use std::sync::OnceLock;

use log::info;

use crate::core::error::{BuildError, PromptError};
use crate::core::key::SemanticKey;
use crate::core::viewport::{Scroll, Viewport};
use crate::term::screen::{Screen, text_width};
use crate::term::style::{self, Palette};
use crate::term::{KeyMap, Step, Terminal};
use crate::widgets::component::{Prompt, Selection};
use crate::widgets::list::{Choices, ListBuilder, ListLook, Mark};

/// Single-select list showing a window of `height` rows. Indicators at the
/// window edges tell whether more choices are hidden above or below.
#[derive(Debug, Clone)]
pub struct ScrollBar {
    prompt: String,
    choices: Choices,
    look: ListLook,
    pointer: String,
    up_indicator: String,
    down_indicator: String,
    pointer_color: String,
    indicator_color: String,
    return_index: bool,
    viewport: Viewport,
}

impl ScrollBar {
    pub fn new<S: Into<String>>(
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = S>,
    ) -> Result<Self, BuildError> {
        let choices = Choices::new(choices)?;
        Ok(Self {
            prompt: prompt.into(),
            viewport: Viewport::new(choices.len(), None),
            choices,
            look: ListLook::default(),
            pointer: "→".to_string(),
            up_indicator: "↑".to_string(),
            down_indicator: "↓".to_string(),
            pointer_color: Palette::Foreground.default_code(),
            indicator_color: Palette::Foreground.default_code(),
            return_index: false,
        })
    }

    /// Visible rows, clamped to the number of choices. Zero shows all.
    pub fn height(mut self, height: usize) -> Self {
        self.viewport = Viewport::new(self.choices.len(), Some(height));
        self
    }

    pub fn pointer(mut self, glyph: impl Into<String>) -> Self {
        self.pointer = glyph.into();
        self
    }

    pub fn up_indicator(mut self, glyph: impl Into<String>) -> Self {
        self.up_indicator = glyph.into();
        self
    }

    pub fn down_indicator(mut self, glyph: impl Into<String>) -> Self {
        self.down_indicator = glyph.into();
        self
    }

    pub fn pointer_color(mut self, color: &str) -> Self {
        self.pointer_color = style::resolve(color, Palette::Foreground);
        self
    }

    pub fn indicator_color(mut self, color: &str) -> Self {
        self.indicator_color = style::resolve(color, Palette::Foreground);
        self
    }

    pub fn return_index(mut self, on: bool) -> Self {
        self.return_index = on;
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn keymap() -> &'static KeyMap<ScrollBar, Selection> {
        static KEYMAP: OnceLock<KeyMap<ScrollBar, Selection>> = OnceLock::new();
        KEYMAP.get_or_init(|| {
            KeyMap::<ScrollBar, Selection>::new()
                .bind(&[SemanticKey::ArrowUp], |s, screen| s.navigate(screen, Viewport::step_up))
                .bind(&[SemanticKey::ArrowDown], |s, screen| {
                    s.navigate(screen, Viewport::step_down)
                })
                .bind(&[SemanticKey::Home], |s, screen| s.navigate(screen, Viewport::home))
                .bind(&[SemanticKey::End], |s, screen| s.navigate(screen, Viewport::end))
                .bind(&[SemanticKey::PageUp], |s, screen| s.navigate(screen, Viewport::page_up))
                .bind(&[SemanticKey::PageDown], |s, screen| {
                    s.navigate(screen, Viewport::page_down)
                })
                .bind(&[SemanticKey::Enter], ScrollBar::accept)
                .bind(&[SemanticKey::Interrupt], ScrollBar::interrupt)
        })
    }

    /// Edge glyph for a visible row: up on the first row when rows are hidden
    /// above, down on the last row when rows are hidden below.
    fn indicator(&self, idx: usize) -> Option<&str> {
        let vp = &self.viewport;
        if idx == vp.top() && vp.has_hidden_above() {
            Some(self.up_indicator.as_str())
        } else if idx == vp.bottom() - 1 && vp.has_hidden_below() {
            Some(self.down_indicator.as_str())
        } else {
            None
        }
    }

    fn paint_row(&self, screen: &mut Screen<'_>, idx: usize) -> io::Result<()> {
        let highlighted = idx == self.viewport.cursor();
        let mark = Mark {
            glyph: &self.pointer,
            color: &self.pointer_color,
            shown: highlighted,
        };
        self.look
            .paint(screen, &self.choices, idx, mark, highlighted)?;
        match self.indicator(idx) {
            Some(glyph) => screen.styled(glyph, &self.indicator_color, "")?,
            None => {
                let blank = text_width(&self.up_indicator).max(text_width(&self.down_indicator));
                screen.spaces(blank)?;
            }
        }
        screen.line_head()
    }

    /// Paint the window from the current terminal row down, ending on the
    /// cursor's row.
    fn render_window(&self, screen: &mut Screen<'_>) -> io::Result<()> {
        let vp = &self.viewport;
        for (n, idx) in vp.rows().enumerate() {
            if n > 0 {
                screen.move_down(1)?;
            }
            screen.clear_line()?;
            self.paint_row(screen, idx)?;
        }
        screen.move_up(vp.height() - 1 - vp.cursor_row())
    }

    fn navigate(
        &mut self,
        screen: &mut Screen<'_>,
        transition: fn(&mut Viewport) -> Scroll,
    ) -> Step<Selection> {
        match transition(&mut self.viewport) {
            Scroll::Unchanged => {}
            Scroll::Step { from, to } => {
                screen.clear_line()?;
                self.paint_row(screen, from)?;
                if to < from {
                    screen.move_up(from - to)?;
                } else {
                    screen.move_down(to - from)?;
                }
                self.paint_row(screen, to)?;
            }
            Scroll::Window {
                from_top,
                from_cursor,
            } => {
                screen.move_up(from_cursor - from_top)?;
                self.render_window(screen)?;
            }
        }
        Ok(None)
    }

    fn rows_below(&self) -> usize {
        self.viewport.height() - self.viewport.cursor_row()
    }

    fn accept(&mut self, screen: &mut Screen<'_>) -> Step<Selection> {
        screen.move_down(self.rows_below())?;
        let index = self.viewport.cursor();
        let label = self.choices.label(index).to_string();
        self.viewport.reset();
        info!("ScrollBar accepted {label:?} ({index})");
        Ok(Some(if self.return_index {
            Selection::Indexed { label, index }
        } else {
            Selection::Label(label)
        }))
    }

    fn interrupt(&mut self, screen: &mut Screen<'_>) -> Step<Selection> {
        screen.move_down(self.rows_below())?;
        Err(PromptError::Interrupted)
    }
}

impl ListBuilder for ScrollBar {
    fn look_mut(&mut self) -> &mut ListLook {
        &mut self.look
    }
}

impl Prompt for ScrollBar {
    type Output = Selection;

    fn prompt(&self) -> &str {
        &self.prompt
    }

    fn launch(&mut self, term: &mut Terminal<'_>) -> Result<Selection, PromptError> {
        let screen = term.screen();
        self.look.write_header(screen, &self.prompt)?;
        self.viewport.reset();
        for idx in self.viewport.rows() {
            self.paint_row(screen, idx)?;
            screen.newline()?;
        }
        screen.move_up(self.viewport.height())?;
        term.run_hidden(self, Self::keymap())
    }

    fn rendered_rows(&self) -> usize {
        self.look.header_rows(&self.prompt) + self.viewport.height()
    }
}
