//! Single-line text fields: yes/no, free text, password, numbers and dates.
//!
//! A field writes its question, reads a line with [`LineEditor`], and on an
//! unacceptable answer re-prompts in place: it moves back up to the question,
//! rewrites it, and blanks the rejected entry. The screen never scrolls on a
//! validation failure, except for `Date`, which prints help below.

use std::fmt::Write as _;
use std::io;

use chrono::NaiveDate;
use log::{info, warn};
use regex::Regex;

use crate::core::error::{BuildError, PromptError};
use crate::term::Terminal;
use crate::term::screen::{Screen, line_count, text_width};
use crate::term::style::{self, Palette, RESET};
use crate::term::wrap::{message_width, wrap_text};
use crate::widgets::component::{Number, Prompt};
use crate::widgets::line_editor::LineEditor;

/// The question line of a text field.
#[derive(Debug, Clone)]
struct Question {
    text: String,
    indent: usize,
    color: String,
}

impl Question {
    fn new(text: String) -> Result<Self, BuildError> {
        if text.is_empty() {
            return Err(BuildError::EmptyPrompt);
        }
        Ok(Self {
            text,
            indent: 0,
            color: Palette::Foreground.default_code(),
        })
    }

    /// Write the question followed by `hint`, leaving the cursor after it.
    fn write(&self, screen: &mut Screen<'_>, prefix: &str, hint: &str) -> io::Result<()> {
        screen.spaces(self.indent)?;
        screen.write(&self.color)?;
        screen.write_block(prefix)?;
        screen.write_block(&self.text)?;
        screen.write(hint)?;
        screen.write(RESET)
    }

    fn rows(&self, prefix: &str) -> usize {
        line_count(prefix) + line_count(&self.text) - 1
    }

    /// Back up from the row below the answer, rewrite the question and blank
    /// the rejected answer.
    fn retry(&self, screen: &mut Screen<'_>, prefix: &str, hint: &str, rejected: &str) -> io::Result<()> {
        screen.move_up(self.rows(prefix))?;
        screen.line_head()?;
        self.write(screen, prefix, hint)?;
        let width = text_width(rejected);
        screen.spaces(width)?;
        screen.backspace(width)
    }
}

fn spaced_hint(default: Option<&str>) -> String {
    default.map(|d| format!("[{d}]: ")).unwrap_or_default()
}

// ============================================================================
// YesNo
// ============================================================================

/// Accepts any prefix of "yes" or "no", in any case. Empty means the
/// default.
#[derive(Debug, Clone)]
pub struct YesNo {
    question: Question,
    prefix: String,
    default: bool,
    editor: LineEditor,
}

impl YesNo {
    pub fn new(prompt: impl Into<String>) -> Result<Self, BuildError> {
        Ok(Self {
            question: Question::new(prompt.into())?,
            prefix: "[y/n] ".to_string(),
            default: true,
            editor: LineEditor::new(),
        })
    }

    /// `"y"` or `"n"`, in either case.
    pub fn default(mut self, answer: &str) -> Result<Self, BuildError> {
        self.default = match answer.to_ascii_lowercase().as_str() {
            "y" => true,
            "n" => false,
            _ => {
                return Err(BuildError::InvalidDefault(format!(
                    "expected 'y' or 'n', got {answer:?}"
                )));
            }
        };
        Ok(self)
    }

    pub fn prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn indent(mut self, n: usize) -> Self {
        self.question.indent = n;
        self
    }

    pub fn prompt_color(mut self, color: &str) -> Self {
        self.question.color = style::resolve(color, Palette::Foreground);
        self
    }

    pub fn word_color(mut self, color: &str) -> Self {
        self.editor = self
            .editor
            .with_word_color(style::resolve(color, Palette::Foreground));
        self
    }

    fn hint(&self) -> &'static str {
        if self.default { "[y]: " } else { "[n]: " }
    }

    fn parse(answer: &str) -> Option<bool> {
        let answer = answer.to_lowercase();
        if "yes".starts_with(&answer) {
            Some(true)
        } else if "no".starts_with(&answer) {
            Some(false)
        } else {
            None
        }
    }
}

impl Prompt for YesNo {
    type Output = bool;

    fn prompt(&self) -> &str {
        &self.question.text
    }

    fn launch(&mut self, term: &mut Terminal<'_>) -> Result<bool, PromptError> {
        self.question.write(term.screen(), &self.prefix, self.hint())?;
        loop {
            let answer = self.editor.read_line(term)?;
            if answer.is_empty() {
                return Ok(self.default);
            }
            if let Some(yes) = Self::parse(&answer) {
                info!("YesNo answered {yes}");
                return Ok(yes);
            }
            warn!("Rejected yes/no answer {answer:?}");
            self.question
                .retry(term.screen(), &self.prefix, self.hint(), &answer)?;
        }
    }

    fn rendered_rows(&self) -> usize {
        self.question.rows(&self.prefix)
    }
}

// ============================================================================
// Input
// ============================================================================

/// Free text, optionally validated against a pattern.
#[derive(Debug, Clone)]
pub struct Input {
    question: Question,
    default: Option<String>,
    strip: bool,
    pattern: Option<Regex>,
    editor: LineEditor,
}

impl Input {
    pub fn new(prompt: impl Into<String>) -> Result<Self, BuildError> {
        Ok(Self {
            question: Question::new(prompt.into())?,
            default: None,
            strip: false,
            pattern: None,
            editor: LineEditor::new(),
        })
    }

    /// Returned on empty input, and shown as `[default]: `.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.default = (!value.is_empty()).then_some(value);
        self
    }

    /// Trim surrounding whitespace from the answer.
    pub fn strip(mut self, on: bool) -> Self {
        self.strip = on;
        self
    }

    /// Answers must match `pattern` starting at their first character. With a
    /// pattern set, an empty answer is accepted when the pattern matches it.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, BuildError> {
        self.pattern = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("^(?:{pattern})"))?)
        };
        Ok(self)
    }

    pub fn indent(mut self, n: usize) -> Self {
        self.question.indent = n;
        self
    }

    pub fn prompt_color(mut self, color: &str) -> Self {
        self.question.color = style::resolve(color, Palette::Foreground);
        self
    }

    pub fn word_color(mut self, color: &str) -> Self {
        self.editor = self
            .editor
            .with_word_color(style::resolve(color, Palette::Foreground));
        self
    }

    fn accepts(&self, answer: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(answer),
            None => !answer.is_empty(),
        }
    }
}

impl Prompt for Input {
    type Output = String;

    fn prompt(&self) -> &str {
        &self.question.text
    }

    fn launch(&mut self, term: &mut Terminal<'_>) -> Result<String, PromptError> {
        let hint = spaced_hint(self.default.as_deref());
        self.question.write(term.screen(), "", &hint)?;
        loop {
            let answer = self.editor.read_line(term)?;
            if answer.is_empty() {
                if let Some(default) = &self.default {
                    return Ok(default.clone());
                }
            }
            if self.accepts(&answer) {
                info!("Input accepted");
                return Ok(if self.strip {
                    answer.trim().to_string()
                } else {
                    answer
                });
            }
            warn!("Rejected input {answer:?}");
            self.question.retry(term.screen(), "", &hint, &answer)?;
        }
    }

    fn rendered_rows(&self) -> usize {
        self.question.rows("")
    }
}

// ============================================================================
// Password
// ============================================================================

/// Masked text entry. Spaces are not accepted.
#[derive(Debug, Clone)]
pub struct Password {
    question: Question,
    hidden: char,
    word_color: String,
}

impl Password {
    pub fn new(prompt: impl Into<String>) -> Result<Self, BuildError> {
        Ok(Self {
            question: Question::new(prompt.into())?,
            hidden: '*',
            word_color: Palette::Foreground.default_code(),
        })
    }

    /// Glyph echoed for each typed character.
    pub fn hidden(mut self, glyph: char) -> Self {
        self.hidden = glyph;
        self
    }

    pub fn indent(mut self, n: usize) -> Self {
        self.question.indent = n;
        self
    }

    pub fn prompt_color(mut self, color: &str) -> Self {
        self.question.color = style::resolve(color, Palette::Foreground);
        self
    }

    pub fn word_color(mut self, color: &str) -> Self {
        self.word_color = style::resolve(color, Palette::Foreground);
        self
    }
}

impl Prompt for Password {
    type Output = String;

    fn prompt(&self) -> &str {
        &self.question.text
    }

    fn launch(&mut self, term: &mut Terminal<'_>) -> Result<String, PromptError> {
        self.question.write(term.screen(), "", "")?;
        let mut editor = LineEditor::masked(self.hidden).with_word_color(self.word_color.clone());
        editor.read_line(term)
    }

    fn rendered_rows(&self) -> usize {
        self.question.rows("")
    }
}

// ============================================================================
// Numbers
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberKind {
    Integer,
    #[default]
    Float,
}

impl NumberKind {
    pub fn parse(self, text: &str) -> Option<Number> {
        let text = text.trim();
        match self {
            NumberKind::Integer => text.parse().ok().map(Number::Int),
            NumberKind::Float => text.parse().ok().map(Number::Float),
        }
    }
}

/// A number, re-prompting until the answer parses as the configured kind.
#[derive(Debug, Clone)]
pub struct Numbers {
    question: Question,
    kind: NumberKind,
    default: Option<Number>,
    editor: LineEditor,
}

impl Numbers {
    pub fn new(prompt: impl Into<String>) -> Result<Self, BuildError> {
        Ok(Self {
            question: Question::new(prompt.into())?,
            kind: NumberKind::default(),
            default: None,
            editor: LineEditor::new(),
        })
    }

    /// Set before [`default`](Self::default), which is parsed as this kind.
    pub fn kind(mut self, kind: NumberKind) -> Self {
        self.kind = kind;
        self
    }

    /// Value returned on empty input. Must parse as the field's kind.
    pub fn default(mut self, text: &str) -> Result<Self, BuildError> {
        let value = self.kind.parse(text).ok_or_else(|| {
            BuildError::InvalidDefault(format!("{text:?} is not a valid {:?}", self.kind))
        })?;
        self.default = Some(value);
        Ok(self)
    }

    pub fn indent(mut self, n: usize) -> Self {
        self.question.indent = n;
        self
    }

    pub fn prompt_color(mut self, color: &str) -> Self {
        self.question.color = style::resolve(color, Palette::Foreground);
        self
    }

    pub fn word_color(mut self, color: &str) -> Self {
        self.editor = self
            .editor
            .with_word_color(style::resolve(color, Palette::Foreground));
        self
    }
}

impl Prompt for Numbers {
    type Output = Number;

    fn prompt(&self) -> &str {
        &self.question.text
    }

    fn launch(&mut self, term: &mut Terminal<'_>) -> Result<Number, PromptError> {
        self.question.write(term.screen(), "", "")?;
        loop {
            let answer = self.editor.read_line(term)?;
            if answer.is_empty() {
                if let Some(default) = self.default {
                    return Ok(default);
                }
            }
            if let Some(value) = self.kind.parse(&answer) {
                info!("Numbers accepted {value}");
                return Ok(value);
            }
            warn!("Rejected number {answer:?}");
            self.question.retry(term.screen(), "", "", &answer)?;
        }
    }

    fn rendered_rows(&self) -> usize {
        self.question.rows("")
    }
}

// ============================================================================
// Date
// ============================================================================

/// Formats tried, in order, after the field's own display format.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%m-%d-%Y",
    "%Y%m%d",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %B %Y",
];

const DATE_HELP: &str = "Try a format like year-month-day, month/day/year or \
     month-name day year. For example, all of the strings below are valid \
     ways to represent the same date:";

const DATE_EXAMPLES: &str = "\"2018-5-13\" -or- \"05/13/2018\" -or- \"May 13 2018\"";

pub fn parse_date(text: &str, preferred: &str) -> Option<NaiveDate> {
    let text = text.trim();
    std::iter::once(preferred)
        .chain(DATE_FORMATS.iter().copied())
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// A date, re-asked until it parses. Each failure prints a red error and
/// help text below the field, and the question is asked again under it.
#[derive(Debug, Clone)]
pub struct Date {
    question: Question,
    default: Option<NaiveDate>,
    format: String,
    editor: LineEditor,
    /// Rows of error messages printed during the current launch.
    message_rows: usize,
}

impl Date {
    pub fn new(prompt: impl Into<String>) -> Result<Self, BuildError> {
        Ok(Self {
            question: Question::new(prompt.into())?,
            default: None,
            format: "%m/%d/%Y".to_string(),
            editor: LineEditor::new(),
            message_rows: 0,
        })
    }

    pub fn default(mut self, date: NaiveDate) -> Self {
        self.default = Some(date);
        self
    }

    /// `strftime` format used to show the default.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn indent(mut self, n: usize) -> Self {
        self.question.indent = n;
        self
    }

    pub fn word_color(mut self, color: &str) -> Self {
        self.editor = self
            .editor
            .with_word_color(style::resolve(color, Palette::Foreground));
        self
    }

    fn hint(&self) -> String {
        let shown = self.default.map(|d| {
            let mut shown = String::new();
            if write!(shown, "{}", d.format(&self.format)).is_err() {
                warn!("Bad date format {:?}, showing ISO 8601", self.format);
                return d.to_string();
            }
            shown
        });
        spaced_hint(shown.as_deref())
    }

    /// Print the parse error and help. Returns the rows written.
    fn complain(&self, screen: &mut Screen<'_>, answer: &str) -> io::Result<usize> {
        let red = style::resolve("red", Palette::Foreground);
        let error = format!("Error! '{answer}' could not be parsed as a valid date.");
        screen.styled(&error, &style::bright(&red), "")?;
        screen.newline()?;
        let help = wrap_text(DATE_HELP, message_width(screen.width()));
        for line in &help {
            screen.styled(line, &red, "")?;
            screen.newline()?;
        }
        screen.styled(DATE_EXAMPLES, &red, "")?;
        screen.newline()?;
        Ok(help.len() + 2)
    }
}

impl Prompt for Date {
    type Output = NaiveDate;

    fn prompt(&self) -> &str {
        &self.question.text
    }

    fn launch(&mut self, term: &mut Terminal<'_>) -> Result<NaiveDate, PromptError> {
        self.message_rows = 0;
        let hint = self.hint();
        loop {
            self.question.write(term.screen(), "", &hint)?;
            let answer = self.editor.read_line(term)?;
            if answer.is_empty() {
                if let Some(default) = self.default {
                    return Ok(default);
                }
                // Nothing to blank: just ask again on the same row.
                let screen = term.screen();
                screen.move_up(self.question.rows(""))?;
                screen.line_head()?;
                continue;
            }
            if let Some(date) = parse_date(&answer, &self.format) {
                info!("Date accepted {date}");
                return Ok(date);
            }
            warn!("Could not parse date {answer:?}");
            self.message_rows += self.question.rows("");
            self.message_rows += self.complain(term.screen(), &answer)?;
        }
    }

    fn rendered_rows(&self) -> usize {
        self.message_rows + self.question.rows("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::key::SemanticKey;
    use crate::term::ScriptedKeys;

    fn run<P: Prompt>(field: &mut P, keys: Vec<SemanticKey>) -> (Result<P::Output, PromptError>, String) {
        let mut keys = ScriptedKeys::new(keys);
        let mut out = Vec::new();
        let mut term = Terminal::new(&mut keys, &mut out, 80);
        let result = field.launch(&mut term);
        drop(term);
        (result, String::from_utf8(out).unwrap())
    }

    fn lines(answers: &[&str]) -> Vec<SemanticKey> {
        answers.iter().flat_map(|a| ScriptedKeys::line(a)).collect()
    }

    #[test]
    fn test_empty_prompt_rejected() {
        assert!(matches!(YesNo::new(""), Err(BuildError::EmptyPrompt)));
        assert!(matches!(Input::new(""), Err(BuildError::EmptyPrompt)));
        assert!(matches!(Numbers::new(""), Err(BuildError::EmptyPrompt)));
    }

    #[test]
    fn test_yes_no_prefixes() {
        let mut field = YesNo::new("Continue? ").unwrap();
        assert!(run(&mut field, lines(&["Ye"])).0.unwrap());
        assert!(!run(&mut field, lines(&["N"])).0.unwrap());
        assert!(run(&mut field, lines(&[""])).0.unwrap());

        let mut field = YesNo::new("Continue? ").unwrap().default("n").unwrap();
        assert!(!run(&mut field, lines(&[""])).0.unwrap());
    }

    #[test]
    fn test_yes_no_reprompts_in_place() {
        let mut field = YesNo::new("Continue? ").unwrap();
        let (result, out) = run(&mut field, lines(&["maybe", "y"]));
        assert!(result.unwrap());
        // Back up one row, rewrite the question, blank five columns.
        assert!(out.contains("\x1b[1A\r"));
        assert!(out.contains("     \u{8}\u{8}\u{8}\u{8}\u{8}"));
        assert_eq!(out.matches("[y/n] Continue? [y]: ").count(), 2);
    }

    #[test]
    fn test_yes_no_invalid_default() {
        assert!(matches!(
            YesNo::new("ok?").unwrap().default("maybe"),
            Err(BuildError::InvalidDefault(_))
        ));
    }

    #[test]
    fn test_input_default_and_strip() {
        let mut field = Input::new("Name: ").unwrap().default("anon").strip(true);
        let (result, out) = run(&mut field, lines(&[""]));
        assert_eq!(result.unwrap(), "anon");
        assert!(out.contains("Name: [anon]: "));

        let (result, _) = run(&mut field, lines(&["  bob "]));
        assert_eq!(result.unwrap(), "bob");
    }

    #[test]
    fn test_input_empty_without_default_reprompts() {
        let mut field = Input::new("Name: ").unwrap();
        let (result, _) = run(&mut field, lines(&["", "amy"]));
        assert_eq!(result.unwrap(), "amy");
    }

    #[test]
    fn test_input_pattern_anchored_at_start() {
        let mut field = Input::new("Code: ").unwrap().pattern(r"\d{3}").unwrap();
        let (result, _) = run(&mut field, lines(&["x123", "123x"]));
        assert_eq!(result.unwrap(), "123x");
    }

    #[test]
    fn test_input_pattern_decides_empty_answers() {
        let mut field = Input::new("Code: ").unwrap().pattern(r"\d*").unwrap();
        let (result, _) = run(&mut field, lines(&[""]));
        assert_eq!(result.unwrap(), "");

        let mut field = Input::new("Code: ").unwrap().pattern(r"\d+").unwrap();
        let (result, _) = run(&mut field, lines(&["", "7"]));
        assert_eq!(result.unwrap(), "7");
    }

    #[test]
    fn test_input_bad_pattern() {
        assert!(matches!(
            Input::new("Code: ").unwrap().pattern("("),
            Err(BuildError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_password_masks_input() {
        let mut field = Password::new("Password: ").unwrap().hidden('#');
        let (result, out) = run(&mut field, lines(&["se cret"]));
        assert_eq!(result.unwrap(), "secret");
        assert!(!out.contains("secret"));
        assert!(out.contains('#'));
    }

    #[test]
    fn test_numbers_integer_and_float() {
        let mut field = Numbers::new("How many? ").unwrap().kind(NumberKind::Integer);
        let (result, _) = run(&mut field, lines(&["1.5", "abc", "7"]));
        assert_eq!(result.unwrap(), Number::Int(7));

        let mut field = Numbers::new("Ratio? ").unwrap();
        let (result, _) = run(&mut field, lines(&["0.25"]));
        assert_eq!(result.unwrap(), Number::Float(0.25));
    }

    #[test]
    fn test_numbers_default() {
        let mut field = Numbers::new("How many? ")
            .unwrap()
            .kind(NumberKind::Integer)
            .default("3")
            .unwrap();
        assert_eq!(run(&mut field, lines(&[""])).0.unwrap(), Number::Int(3));
        assert!(matches!(
            Numbers::new("n").unwrap().kind(NumberKind::Integer).default("x"),
            Err(BuildError::InvalidDefault(_))
        ));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2018, 5, 13);
        assert_eq!(parse_date("2018-5-13", "%m/%d/%Y"), expected);
        assert_eq!(parse_date("05/13/2018", "%m/%d/%Y"), expected);
        assert_eq!(parse_date("May 13 2018", "%m/%d/%Y"), expected);
        assert_eq!(parse_date("13.05.2018", "%m/%d/%Y"), expected);
        assert_eq!(parse_date("someday", "%m/%d/%Y"), None);
    }

    #[test]
    fn test_date_default_shown_with_format() {
        let day = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let mut field = Date::new("When? ").unwrap().default(day).format("%Y/%m/%d");
        let (result, out) = run(&mut field, lines(&[""]));
        assert_eq!(result.unwrap(), day);
        assert!(out.contains("When? [2020/01/02]: "));
        assert_eq!(field.rendered_rows(), 1);
    }

    #[test]
    fn test_date_error_prints_help_and_counts_rows() {
        let mut field = Date::new("When? ").unwrap();
        let (result, out) = run(&mut field, lines(&["nope", "2018-05-13"]));
        assert_eq!(result.unwrap(), NaiveDate::from_ymd_opt(2018, 5, 13).unwrap());
        assert!(out.contains("Error! 'nope' could not be parsed as a valid date."));
        assert!(out.contains("\x1b[31;1m"));
        let help_rows = wrap_text(DATE_HELP, 70).len();
        // First question, error, help, examples, then the second question.
        assert_eq!(field.rendered_rows(), 1 + 1 + help_rows + 1 + 1);
    }

    #[test]
    fn test_interrupt_propagates() {
        let mut field = Input::new("Name: ").unwrap();
        let (result, out) = run(&mut field, vec![SemanticKey::Char('a'), SemanticKey::Interrupt]);
        assert!(result.unwrap_err().is_interrupt());
        assert!(out.ends_with("\r\n"));
    }

    #[test]
    fn test_multiline_prompt_rows() {
        let field = YesNo::new("Line one\nLine two? ").unwrap();
        assert_eq!(field.rendered_rows(), 2);
        let field = Input::new("\nName: ").unwrap();
        assert_eq!(field.rendered_rows(), 2);
    }
}
