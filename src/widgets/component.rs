use std::fmt;

use chrono::NaiveDate;

use crate::core::error::PromptError;
use crate::term::Terminal;

/// An interactive widget.
///
/// A widget writes its initial render, then owns the terminal until the user
/// accepts (a value) or interrupts ([`PromptError::Interrupted`]). On either
/// exit the terminal cursor sits at the start of the row just below what the
/// widget drew, so the next widget can start there.
pub trait Prompt {
    /// The value produced on accept.
    type Output: Into<Answer>;

    /// The question shown above the widget. May be empty for list widgets.
    fn prompt(&self) -> &str;

    fn launch(&mut self, term: &mut Terminal<'_>) -> Result<Self::Output, PromptError>;

    /// How many rows above the cursor belong to this widget once `launch`
    /// has returned. A sequence clears exactly this many rows.
    fn rendered_rows(&self) -> usize;
}

/// Object-safe view of a [`Prompt`], used to keep mixed widgets in one list.
pub trait Field {
    fn question(&self) -> &str;

    fn ask(&mut self, term: &mut Terminal<'_>) -> Result<Answer, PromptError>;

    /// See [`Prompt::rendered_rows`].
    fn footprint(&self) -> usize;
}

impl<P: Prompt> Field for P {
    fn question(&self) -> &str {
        self.prompt()
    }

    fn ask(&mut self, term: &mut Terminal<'_>) -> Result<Answer, PromptError> {
        self.launch(term).map(Into::into)
    }

    fn footprint(&self) -> usize {
        self.rendered_rows()
    }
}

/// Result of a single-select widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Label(String),
    /// Returned when the widget was built with `return_index(true)`.
    Indexed { label: String, index: usize },
}

impl Selection {
    pub fn label(&self) -> &str {
        match self {
            Selection::Label(label) | Selection::Indexed { label, .. } => label,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Selection::Label(_) => None,
            Selection::Indexed { index, .. } => Some(*index),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Label(label) => f.write_str(label),
            Selection::Indexed { label, index } => write!(f, "{label} ({index})"),
        }
    }
}

/// Result of a multi-select widget. Labels are in original choice order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSelection {
    Labels(Vec<String>),
    Indexed {
        labels: Vec<String>,
        indices: Vec<usize>,
    },
}

impl MultiSelection {
    pub fn labels(&self) -> &[String] {
        match self {
            MultiSelection::Labels(labels) | MultiSelection::Indexed { labels, .. } => labels,
        }
    }

    pub fn indices(&self) -> Option<&[usize]> {
        match self {
            MultiSelection::Labels(_) => None,
            MultiSelection::Indexed { indices, .. } => Some(indices),
        }
    }
}

impl fmt::Display for MultiSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.labels().join(", "))?;
        if let MultiSelection::Indexed { indices, .. } = self {
            write!(f, " {indices:?}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n}"),
        }
    }
}

/// Any widget's result, as collected by a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Text(String),
    Choice(Selection),
    Choices(MultiSelection),
    Bool(bool),
    Number(Number),
    Date(NaiveDate),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(s) => f.write_str(s),
            Answer::Choice(s) => fmt::Display::fmt(s, f),
            Answer::Choices(s) => fmt::Display::fmt(s, f),
            Answer::Bool(b) => write!(f, "{b}"),
            Answer::Number(n) => fmt::Display::fmt(n, f),
            Answer::Date(d) => fmt::Display::fmt(d, f),
        }
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Text(s)
    }
}

impl From<Selection> for Answer {
    fn from(s: Selection) -> Self {
        Answer::Choice(s)
    }
}

impl From<MultiSelection> for Answer {
    fn from(s: MultiSelection) -> Self {
        Answer::Choices(s)
    }
}

impl From<bool> for Answer {
    fn from(b: bool) -> Self {
        Answer::Bool(b)
    }
}

impl From<Number> for Answer {
    fn from(n: Number) -> Self {
        Answer::Number(n)
    }
}

impl From<NaiveDate> for Answer {
    fn from(d: NaiveDate) -> Self {
        Answer::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_accessors() {
        let plain = Selection::Label("apple".into());
        assert_eq!(plain.label(), "apple");
        assert_eq!(plain.index(), None);

        let indexed = Selection::Indexed {
            label: "banana".into(),
            index: 1,
        };
        assert_eq!(indexed.label(), "banana");
        assert_eq!(indexed.index(), Some(1));
        assert_eq!(indexed.to_string(), "banana (1)");
    }

    #[test]
    fn test_multi_selection_display() {
        let labels = MultiSelection::Labels(vec!["Sushi".into(), "Pizza".into()]);
        assert_eq!(labels.to_string(), "[Sushi, Pizza]");
        let indexed = MultiSelection::Indexed {
            labels: vec!["Sushi".into()],
            indices: vec![0],
        };
        assert_eq!(indexed.to_string(), "[Sushi] [0]");
        assert_eq!(indexed.indices(), Some(&[0][..]));
    }

    #[test]
    fn test_answer_display() {
        assert_eq!(Answer::from(true).to_string(), "true");
        assert_eq!(Answer::from(Number::Int(42)).to_string(), "42");
        assert_eq!(Answer::from(Number::Float(1.5)).to_string(), "1.5");
        let date = NaiveDate::from_ymd_opt(2018, 5, 13).unwrap();
        assert_eq!(Answer::from(date).to_string(), "2018-05-13");
    }
}
