//! Running several fields one after another.
//!
//! Each field starts on the row where the previous one left the cursor.
//! [`VerticalPrompt`] leaves every field on screen; [`SlidePrompt`] clears
//! each field's rows before the next one is drawn, using
//! [`Field::footprint`] to know how far up to clear.

use std::io::{self, Write};

use log::info;

use crate::core::error::{BuildError, PromptError};
use crate::term::Terminal;
use crate::term::screen::text_width;
use crate::term::style::{self, Palette};
use crate::widgets::component::{Answer, Field};

/// Question and answer pairs, in field order.
pub type Answers = Vec<(String, Answer)>;

/// Print `prompt answer` per line.
pub fn summarize(answers: &[(String, Answer)], out: &mut dyn Write) -> io::Result<()> {
    for (prompt, answer) in answers {
        writeln!(out, "{} {}", prompt.trim(), answer)?;
    }
    Ok(())
}

fn check_fields(fields: &[Box<dyn Field>]) -> Result<(), BuildError> {
    if fields.is_empty() {
        return Err(BuildError::EmptyComponents);
    }
    Ok(())
}

/// Fields stacked downwards, separated by blank rows or a separator line.
pub struct VerticalPrompt {
    fields: Vec<Box<dyn Field>>,
    spacing: usize,
    separator: Option<String>,
    separator_color: String,
    answers: Answers,
}

impl VerticalPrompt {
    pub fn new(fields: Vec<Box<dyn Field>>) -> Result<Self, BuildError> {
        check_fields(&fields)?;
        Ok(Self {
            fields,
            spacing: 1,
            separator: None,
            separator_color: Palette::Foreground.default_code(),
            answers: Vec::new(),
        })
    }

    /// Blank rows between fields when there is no separator.
    pub fn spacing(mut self, rows: usize) -> Self {
        self.spacing = rows;
        self
    }

    /// Draw `separator` repeated across the widest question after each field.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        self.separator = (!separator.is_empty()).then_some(separator);
        self
    }

    pub fn separator_color(mut self, color: &str) -> Self {
        self.separator_color = style::resolve(color, Palette::Foreground);
        self
    }

    fn separator_len(&self) -> usize {
        self.fields
            .iter()
            .map(|f| text_width(f.question()))
            .max()
            .unwrap_or(0)
    }

    pub fn launch(&mut self, term: &mut Terminal<'_>) -> Result<Answers, PromptError> {
        self.answers.clear();
        let rule = self
            .separator
            .as_ref()
            .map(|s| s.repeat(self.separator_len()));
        for field in &mut self.fields {
            let answer = field.ask(term)?;
            self.answers.push((field.question().to_string(), answer));
            let screen = term.screen();
            match &rule {
                Some(rule) => {
                    screen.styled(rule, &self.separator_color, "")?;
                    screen.newline()?;
                }
                None => screen.newlines(self.spacing)?,
            }
        }
        term.screen().flush()?;
        info!("Vertical prompt finished with {} answers", self.answers.len());
        Ok(self.answers.clone())
    }

    /// Answers of the last launch.
    pub fn answers(&self) -> &[(String, Answer)] {
        &self.answers
    }

    pub fn summarize(&self, out: &mut dyn Write) -> io::Result<()> {
        summarize(&self.answers, out)
    }
}

/// Fields shown one at a time in the same place.
pub struct SlidePrompt {
    fields: Vec<Box<dyn Field>>,
    answers: Answers,
}

impl SlidePrompt {
    pub fn new(fields: Vec<Box<dyn Field>>) -> Result<Self, BuildError> {
        check_fields(&fields)?;
        Ok(Self {
            fields,
            answers: Vec::new(),
        })
    }

    pub fn launch(&mut self, term: &mut Terminal<'_>) -> Result<Answers, PromptError> {
        self.answers.clear();
        for field in &mut self.fields {
            let answer = field.ask(term)?;
            self.answers.push((field.question().to_string(), answer));
            term.screen().clear_rows_up(field.footprint())?;
        }
        term.screen().flush()?;
        info!("Slide prompt finished with {} answers", self.answers.len());
        Ok(self.answers.clone())
    }

    pub fn answers(&self) -> &[(String, Answer)] {
        &self.answers
    }

    pub fn summarize(&self, out: &mut dyn Write) -> io::Result<()> {
        summarize(&self.answers, out)
    }
}
