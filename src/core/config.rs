//! # Configuration
//!
//! A form is described in TOML: a `[general]` table for how the prompts are
//! sequenced, then one `[[prompts]]` entry per widget, tagged by `kind`.
//! Override hierarchy: defaults → form file → CLI flags.
//!
//! The default form lives at `~/.rebullet/form.toml`. If missing on first
//! run, a commented example is generated so users can discover all options.
//!
//! Spacing fields are signed on purpose: a negative indent in the file is a
//! configuration error with a clear message, not a TOML type error.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::BuildError;

// ============================================================================
// Config Structs (Option<T> wherever a widget has a default)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FormConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub prompts: Vec<PromptEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub layout: Option<Layout>,
    pub spacing: Option<usize>,
    pub separator: Option<String>,
    pub separator_color: Option<String>,
    pub summary: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Prompts stack downwards and stay on screen.
    #[default]
    Vertical,
    /// Each prompt is cleared before the next one appears.
    Slide,
}

/// Look shared by the three list widgets.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListStyle {
    pub prompt_color: Option<String>,
    pub word_color: Option<String>,
    pub word_on_switch: Option<String>,
    pub background_color: Option<String>,
    pub background_on_switch: Option<String>,
    pub pad_right: Option<usize>,
    pub indent: Option<i64>,
    pub align: Option<usize>,
    pub margin: Option<i64>,
    pub shift: Option<usize>,
    #[serde(default)]
    pub return_index: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DependencyEntry {
    pub choice: String,
    #[serde(default)]
    pub requires: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptEntry {
    Bullet {
        #[serde(default)]
        prompt: String,
        choices: Vec<String>,
        bullet: Option<String>,
        bullet_color: Option<String>,
        default: Option<usize>,
        #[serde(flatten)]
        style: ListStyle,
    },
    Check {
        #[serde(default)]
        prompt: String,
        choices: Vec<String>,
        check: Option<String>,
        check_color: Option<String>,
        check_on_switch: Option<String>,
        #[serde(default)]
        default: Vec<usize>,
        #[serde(flatten)]
        style: ListStyle,
    },
    Dependencies {
        #[serde(default)]
        prompt: String,
        tree: Vec<DependencyEntry>,
        check: Option<String>,
        check_color: Option<String>,
        check_on_switch: Option<String>,
        #[serde(flatten)]
        style: ListStyle,
    },
    Scroll {
        #[serde(default)]
        prompt: String,
        choices: Vec<String>,
        pointer: Option<String>,
        up_indicator: Option<String>,
        down_indicator: Option<String>,
        pointer_color: Option<String>,
        indicator_color: Option<String>,
        height: Option<usize>,
        #[serde(flatten)]
        style: ListStyle,
    },
    YesNo {
        prompt: String,
        default: Option<String>,
        indent: Option<i64>,
        prompt_color: Option<String>,
        word_color: Option<String>,
        prompt_prefix: Option<String>,
    },
    Input {
        prompt: String,
        default: Option<String>,
        indent: Option<i64>,
        prompt_color: Option<String>,
        word_color: Option<String>,
        #[serde(default)]
        strip: bool,
        pattern: Option<String>,
    },
    Password {
        prompt: String,
        indent: Option<i64>,
        hidden: Option<char>,
        prompt_color: Option<String>,
        word_color: Option<String>,
    },
    Numbers {
        prompt: String,
        indent: Option<i64>,
        prompt_color: Option<String>,
        word_color: Option<String>,
        #[serde(default)]
        integer: bool,
        default: Option<String>,
    },
    Date {
        prompt: String,
        default: Option<chrono::NaiveDate>,
        format: Option<String>,
        indent: Option<i64>,
        word_color: Option<String>,
    },
}

impl PromptEntry {
    pub fn kind(&self) -> &'static str {
        match self {
            PromptEntry::Bullet { .. } => "bullet",
            PromptEntry::Check { .. } => "check",
            PromptEntry::Dependencies { .. } => "dependencies",
            PromptEntry::Scroll { .. } => "scroll",
            PromptEntry::YesNo { .. } => "yes_no",
            PromptEntry::Input { .. } => "input",
            PromptEntry::Password { .. } => "password",
            PromptEntry::Numbers { .. } => "numbers",
            PromptEntry::Date { .. } => "date",
        }
    }
}

/// Validate a signed spacing value read from a form file.
pub fn spacing(field: &'static str, value: Option<i64>) -> Result<usize, BuildError> {
    let value = value.unwrap_or(0);
    usize::try_from(value).map_err(|_| BuildError::NegativeSpacing { field, value })
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("prompt #{index} ({kind}): {source}")]
    Build {
        index: usize,
        kind: &'static str,
        #[source]
        source: BuildError,
    },
    #[error("no form found; an example was written to {0}")]
    Generated(PathBuf),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.rebullet/form.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".rebullet").join("form.toml"))
}

/// Load a form from an explicit path.
pub fn load_form(path: &Path) -> Result<FormConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config = parse_form(&contents)?;
    info!(
        "Loaded form with {} prompts from {}",
        config.prompts.len(),
        path.display()
    );
    Ok(config)
}

pub fn parse_form(contents: &str) -> Result<FormConfig, ConfigError> {
    let config: FormConfig = toml::from_str(contents)?;
    debug!("Form: {:?}", config);
    Ok(config)
}

/// Load the form at `~/.rebullet/form.toml`, generating an example there if
/// none exists.
pub fn load_default_form() -> Result<FormConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using the built-in example form");
        return parse_form(EXAMPLE_FORM);
    };

    if !path.exists() {
        info!("No form found, generating example at {}", path.display());
        generate_example_form(&path)?;
        return Err(ConfigError::Generated(path));
    }

    load_form(&path)
}

/// Writes the example form to `path`, creating parent directories.
pub fn generate_example_form(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, EXAMPLE_FORM)?;
    Ok(())
}

pub const EXAMPLE_FORM: &str = r#"# rebullet form
# Every prompt is a [[prompts]] table tagged by `kind`.
# Colors: black, red, green, yellow, blue, magenta, cyan, white, default,
# reverse, bright_<color>, or a literal escape code.

[general]
layout = "vertical"      # "vertical" or "slide"
spacing = 1              # blank lines between prompts (vertical only)
# separator = "-"        # draw a separator line instead of blank lines
# separator_color = "cyan"
summary = true           # print every answer at the end

[[prompts]]
kind = "bullet"
prompt = "Please choose a fruit: "
choices = ["apple", "banana", "orange", "watermelon", "strawberry"]
align = 5
margin = 2
pad_right = 5
return_index = true

[[prompts]]
kind = "check"
prompt = "What food do you like? "
choices = ["Sushi", "Ramen", "Pizza"]
check = " √"
margin = 2
check_color = "bright_red"

# [[prompts]]
# kind = "dependencies"
# prompt = "Which components? "
# tree = [
#   { choice = "server", requires = ["runtime"] },
#   { choice = "runtime" },
# ]

# [[prompts]]
# kind = "scroll"
# prompt = "How are you feeling today? "
# choices = ["happy", "sad", "bored", "tired", "excited", "calm", "anxious"]
# height = 5

[[prompts]]
kind = "yes_no"
prompt = "Are you a student? "
default = "y"
word_color = "yellow"

[[prompts]]
kind = "input"
prompt = "Who are you? "
default = "Batman"

# [[prompts]]
# kind = "password"
# prompt = "Password: "
# hidden = "*"

[[prompts]]
kind = "numbers"
prompt = "How old are you? "
integer = true

# [[prompts]]
# kind = "date"
# prompt = "When were you born? "
# default = "2000-01-01"
# format = "%m/%d/%Y"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_is_empty() {
        let config = FormConfig::default();
        assert!(config.prompts.is_empty());
        assert!(config.general.layout.is_none());
    }

    #[test]
    fn test_example_form_parses() {
        let config = parse_form(EXAMPLE_FORM).unwrap();
        assert_eq!(config.general.layout, Some(Layout::Vertical));
        assert_eq!(config.general.summary, Some(true));
        let kinds: Vec<_> = config.prompts.iter().map(PromptEntry::kind).collect();
        assert_eq!(kinds, vec!["bullet", "check", "yes_no", "input", "numbers"]);
    }

    #[test]
    fn test_flattened_list_style() {
        let toml_str = r#"
[[prompts]]
kind = "scroll"
choices = ["a", "b", "c"]
height = 2
indent = 3
return_index = true
"#;
        let config = parse_form(toml_str).unwrap();
        match &config.prompts[0] {
            PromptEntry::Scroll {
                prompt,
                height,
                style,
                ..
            } => {
                assert!(prompt.is_empty());
                assert_eq!(*height, Some(2));
                assert_eq!(style.indent, Some(3));
                assert!(style.return_index);
            }
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn test_dependency_tree_parses() {
        let toml_str = r#"
[[prompts]]
kind = "dependencies"
tree = [
  { choice = "A", requires = ["B"] },
  { choice = "B" },
]
"#;
        let config = parse_form(toml_str).unwrap();
        let PromptEntry::Dependencies { tree, .. } = &config.prompts[0] else {
            panic!("expected dependencies entry");
        };
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].requires, vec!["B"]);
        assert!(tree[1].requires.is_empty());
    }

    #[test]
    fn test_date_default_parses() {
        let toml_str = r#"
[[prompts]]
kind = "date"
prompt = "When? "
default = "2018-05-13"
"#;
        let config = parse_form(toml_str).unwrap();
        let PromptEntry::Date { default, .. } = &config.prompts[0] else {
            panic!("expected date entry");
        };
        assert_eq!(
            *default,
            chrono::NaiveDate::from_ymd_opt(2018, 5, 13)
        );
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let toml_str = r#"
[[prompts]]
kind = "slider"
prompt = "?"
"#;
        assert!(matches!(parse_form(toml_str), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_negative_spacing_is_rejected() {
        assert_eq!(spacing("indent", None).unwrap(), 0);
        assert_eq!(spacing("indent", Some(4)).unwrap(), 4);
        let err = spacing("margin", Some(-1)).unwrap_err();
        assert!(matches!(
            err,
            BuildError::NegativeSpacing {
                field: "margin",
                value: -1
            }
        ));
    }

    #[test]
    fn test_load_form_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.toml");
        fs::write(&path, "[general]\nlayout = \"slide\"\n").unwrap();
        let config = load_form(&path).unwrap();
        assert_eq!(config.general.layout, Some(Layout::Slide));
    }

    #[test]
    fn test_generate_example_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("form.toml");
        generate_example_form(&path).unwrap();
        let config = load_form(&path).unwrap();
        assert!(!config.prompts.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_form(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
