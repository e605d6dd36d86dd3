use std::io;
use std::sync::OnceLock;

use log::{debug, info};

use crate::core::dependency::DependencyGraph;
use crate::core::error::{BuildError, PromptError};
use crate::core::key::SemanticKey;
use crate::term::screen::Screen;
use crate::term::style::{self, Palette, REVERSE};
use crate::term::{KeyMap, Step, Terminal};
use crate::widgets::component::{MultiSelection, Prompt};
use crate::widgets::list::{self, Choices, ListBuilder, ListLook, Mark, SelectableList};

/// Checkbox list. Space toggles the current row, Enter returns every checked
/// label in choice order.
///
/// Built with [`Check::with_dependencies`], a toggle also propagates through
/// the requires-graph: checking a choice checks what it requires, unchecking
/// one unchecks what requires it.
#[derive(Debug, Clone)]
pub struct Check {
    prompt: String,
    choices: Choices,
    look: ListLook,
    check: String,
    check_color: String,
    check_on_switch: String,
    defaults: Vec<usize>,
    return_index: bool,
    graph: Option<DependencyGraph>,
    checked: Vec<bool>,
    cursor: usize,
}

impl Check {
    pub fn new<S: Into<String>>(
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = S>,
    ) -> Result<Self, BuildError> {
        let choices = Choices::new(choices)?;
        Ok(Self {
            prompt: prompt.into(),
            checked: vec![false; choices.len()],
            choices,
            look: ListLook::default(),
            check: "√".to_string(),
            check_color: Palette::Foreground.default_code(),
            check_on_switch: REVERSE.to_string(),
            defaults: Vec::new(),
            return_index: false,
            graph: None,
            cursor: 0,
        })
    }

    /// Choices come from `tree`, a list of `(choice, [required choices…])`.
    pub fn with_dependencies<C, D>(
        prompt: impl Into<String>,
        tree: impl IntoIterator<Item = (C, Vec<D>)>,
    ) -> Result<Self, BuildError>
    where
        C: Into<String>,
        D: Into<String>,
    {
        let graph = DependencyGraph::new(tree)?;
        let mut check = Self::new(prompt, graph.choices().to_vec())?;
        check.graph = Some(graph);
        Ok(check)
    }

    pub fn check(mut self, glyph: impl Into<String>) -> Self {
        self.check = glyph.into();
        self
    }

    pub fn check_color(mut self, color: &str) -> Self {
        self.check_color = style::resolve(color, Palette::Foreground);
        self
    }

    pub fn check_on_switch(mut self, color: &str) -> Self {
        self.check_on_switch = style::resolve(color, Palette::Foreground);
        self
    }

    /// Rows checked when the list opens.
    pub fn default(mut self, indices: impl IntoIterator<Item = usize>) -> Result<Self, BuildError> {
        let len = self.choices.len();
        let indices: Vec<usize> = indices.into_iter().collect();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(BuildError::DefaultOutOfRange { index, len });
        }
        self.defaults = indices;
        Ok(self)
    }

    /// Answer with [`MultiSelection::Indexed`] instead of bare labels.
    pub fn return_index(mut self, on: bool) -> Self {
        self.return_index = on;
        self
    }

    pub fn choices(&self) -> &Choices {
        &self.choices
    }

    pub fn checked(&self) -> &[bool] {
        &self.checked
    }

    pub fn graph(&self) -> Option<&DependencyGraph> {
        self.graph.as_ref()
    }

    fn keymap() -> &'static KeyMap<Check, MultiSelection> {
        static KEYMAP: OnceLock<KeyMap<Check, MultiSelection>> = OnceLock::new();
        KEYMAP.get_or_init(|| {
            KeyMap::new()
                .bind(&[SemanticKey::Space], Check::toggle)
                .bind(&[SemanticKey::ArrowUp], list::move_up)
                .bind(&[SemanticKey::ArrowDown], list::move_down)
                .bind(&[SemanticKey::Home], list::move_top)
                .bind(&[SemanticKey::End], list::move_bottom)
                .bind(&[SemanticKey::Enter], Check::accept)
                .bind(&[SemanticKey::Interrupt], list::interrupt)
        })
    }

    fn dependency_keymap() -> &'static KeyMap<Check, MultiSelection> {
        static KEYMAP: OnceLock<KeyMap<Check, MultiSelection>> = OnceLock::new();
        KEYMAP.get_or_init(|| {
            Self::keymap()
                .inherit()
                .bind(&[SemanticKey::Space], Check::toggle_propagating)
        })
    }

    fn toggle(&mut self, screen: &mut Screen<'_>) -> Step<MultiSelection> {
        let row = self.cursor;
        self.checked[row] = !self.checked[row];
        self.paint_row(screen, row)?;
        Ok(None)
    }

    fn toggle_propagating(&mut self, screen: &mut Screen<'_>) -> Step<MultiSelection> {
        let row = self.cursor;
        self.checked[row] = !self.checked[row];
        if let Some(graph) = &self.graph {
            let changed = graph.propagate(&mut self.checked, row);
            debug!(
                "Toggling {:?} changed {} other rows",
                self.choices.label(row),
                changed.len()
            );
        }
        self.refresh(screen)?;
        Ok(None)
    }

    /// Repaint every row top to bottom, ending back on the cursor row.
    fn refresh(&self, screen: &mut Screen<'_>) -> io::Result<()> {
        screen.move_up(self.cursor)?;
        for idx in 0..self.choices.len() {
            if idx > 0 {
                screen.move_down(1)?;
            }
            screen.clear_line()?;
            self.paint_row(screen, idx)?;
        }
        screen.move_up(self.choices.len() - 1 - self.cursor)
    }

    fn accept(&mut self, screen: &mut Screen<'_>) -> Step<MultiSelection> {
        screen.move_down(self.rows_below())?;
        let (labels, indices): (Vec<String>, Vec<usize>) = self
            .checked
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| (self.choices.label(i).to_string(), i))
            .unzip();
        self.cursor = 0;
        self.checked.fill(false);
        info!("Check accepted {labels:?}");
        Ok(Some(if self.return_index {
            MultiSelection::Indexed { labels, indices }
        } else {
            MultiSelection::Labels(labels)
        }))
    }

    fn apply_defaults(&mut self) {
        self.checked.fill(false);
        for &i in &self.defaults {
            self.checked[i] = true;
        }
        if let Some(graph) = &self.graph {
            for &i in &self.defaults {
                graph.check_requirements(&mut self.checked, i);
            }
        }
    }
}

impl ListBuilder for Check {
    fn look_mut(&mut self) -> &mut ListLook {
        &mut self.look
    }
}

impl SelectableList for Check {
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
        let highlighted = idx == self.cursor;
        let mark = Mark {
            glyph: &self.check,
            color: if highlighted {
                &self.check_on_switch
            } else {
                &self.check_color
            },
            shown: self.checked[idx],
        };
        self.look
            .paint(screen, &self.choices, idx, mark, highlighted)?;
        screen.line_head()
    }
}

impl Prompt for Check {
    type Output = MultiSelection;

    fn prompt(&self) -> &str {
        &self.prompt
    }

    fn launch(&mut self, term: &mut Terminal<'_>) -> Result<MultiSelection, PromptError> {
        let screen = term.screen();
        self.look.write_header(screen, &self.prompt)?;
        self.cursor = 0;
        self.apply_defaults();
        self.render_rows(screen)?;
        let keymap = if self.graph.is_some() {
            Self::dependency_keymap()
        } else {
            Self::keymap()
        };
        term.run_hidden(self, keymap)
    }

    fn rendered_rows(&self) -> usize {
        self.look.header_rows(&self.prompt) + self.choices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::ScriptedKeys;
    use SemanticKey::{ArrowDown, ArrowUp, Enter, Space};

    fn run(check: &mut Check, keys: Vec<SemanticKey>) -> (Result<MultiSelection, PromptError>, String) {
        let mut keys = ScriptedKeys::new(keys);
        let mut out = Vec::new();
        let mut term = Terminal::new(&mut keys, &mut out, 80);
        let result = check.launch(&mut term);
        drop(term);
        (result, String::from_utf8(out).unwrap())
    }

    fn food() -> Check {
        Check::new("", ["Sushi", "Ramen", "Pizza"]).unwrap()
    }

    #[test]
    fn test_toggle_two_rows() {
        let mut check = food();
        let keys = vec![Space, ArrowDown, ArrowDown, Space, Enter];
        let (result, _) = run(&mut check, keys);
        assert_eq!(
            result.unwrap(),
            MultiSelection::Labels(vec!["Sushi".into(), "Pizza".into()])
        );
        assert_eq!(check.checked(), &[false, false, false]);
        assert_eq!(check.cursor(), 0);
    }

    #[test]
    fn test_toggle_twice_unchecks() {
        let mut check = food().return_index(true);
        let (result, _) = run(&mut check, vec![ArrowDown, Space, Space, ArrowUp, Space, Enter]);
        assert_eq!(
            result.unwrap(),
            MultiSelection::Indexed {
                labels: vec!["Sushi".into()],
                indices: vec![0],
            }
        );
    }

    #[test]
    fn test_defaults_are_checked_on_launch() {
        let mut check = food().default([1]).unwrap();
        let (result, _) = run(&mut check, vec![Enter]);
        assert_eq!(result.unwrap().labels(), &["Ramen".to_string()]);
        // Defaults apply again on the next launch.
        let (result, _) = run(&mut check, vec![Space, Enter]);
        assert_eq!(
            result.unwrap().labels(),
            &["Sushi".to_string(), "Ramen".to_string()]
        );
    }

    #[test]
    fn test_default_out_of_range() {
        assert!(matches!(
            food().default([0, 3]),
            Err(BuildError::DefaultOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_plain_toggle_repaints_one_row() {
        let mut check = food();
        let (_, out) = run(&mut check, vec![Space, Enter]);
        // No refresh: the only upward move is the initial one.
        assert_eq!(out.matches("\x1b[3A").count(), 1);
        assert!(!out.contains("\x1b[2A"));
    }

    fn pizza_tree() -> Check {
        Check::with_dependencies(
            "",
            vec![
                ("Dough", vec![]),
                ("Sauce", vec![]),
                ("Pizza", vec!["Dough", "Sauce"]),
                ("Delivery", vec!["Pizza"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_checking_pulls_in_requirements() {
        let mut check = pizza_tree();
        let keys = vec![ArrowDown, ArrowDown, ArrowDown, Space, Enter];
        let (result, _) = run(&mut check, keys);
        assert_eq!(
            result.unwrap().labels(),
            &["Dough", "Sauce", "Pizza", "Delivery"].map(String::from)
        );
    }

    #[test]
    fn test_unchecking_drops_dependants() {
        let mut check = pizza_tree();
        // Check Delivery (pulls everything in), then uncheck Sauce.
        let keys = vec![ArrowDown, ArrowDown, ArrowDown, Space, ArrowUp, ArrowUp, Space, Enter];
        let (result, _) = run(&mut check, keys);
        assert_eq!(result.unwrap().labels(), &["Dough".to_string()]);
    }

    #[test]
    fn test_propagating_toggle_refreshes_whole_list() {
        let mut check = pizza_tree();
        let (_, out) = run(&mut check, vec![ArrowDown, Space, Enter]);
        // From row 1: up 1, three single steps down, then up 2.
        assert!(out.contains("\x1b[1A\x1b[2K\r"));
        assert!(out.contains("\x1b[2A"));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut check =
            Check::with_dependencies("", vec![("A", vec!["B"]), ("B", vec!["A"])]).unwrap();
        let (result, _) = run(&mut check, vec![Space, Enter]);
        assert_eq!(result.unwrap().labels(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_missing_dependency_fails_construction() {
        let err = Check::with_dependencies("", vec![("A", vec!["X"])]).unwrap_err();
        assert!(matches!(err, BuildError::MissingDependencies(pairs) if pairs == vec![("A".to_string(), "X".to_string())]));
    }
}
