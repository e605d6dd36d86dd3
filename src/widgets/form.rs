//! Building a runnable form from a [`FormConfig`].

use std::io::{self, Write};

use crate::core::config::{ConfigError, FormConfig, Layout, ListStyle, PromptEntry, spacing};
use crate::core::error::{BuildError, PromptError};
use crate::term::Terminal;
use crate::widgets::bullet::Bullet;
use crate::widgets::check::Check;
use crate::widgets::component::Field;
use crate::widgets::list::ListBuilder;
use crate::widgets::scroll::ScrollBar;
use crate::widgets::sequence::{Answers, SlidePrompt, VerticalPrompt};
use crate::widgets::text::{Date, Input, NumberKind, Numbers, Password, YesNo};

fn styled_list<L: ListBuilder>(mut list: L, style: &ListStyle) -> Result<L, BuildError> {
    list = list
        .indent(spacing("indent", style.indent)?)
        .margin(spacing("margin", style.margin)?);
    if let Some(n) = style.pad_right {
        list = list.pad_right(n);
    }
    if let Some(n) = style.align {
        list = list.align(n);
    }
    if let Some(n) = style.shift {
        list = list.shift(n);
    }
    if let Some(c) = &style.prompt_color {
        list = list.prompt_color(c);
    }
    if let Some(c) = &style.word_color {
        list = list.word_color(c);
    }
    if let Some(c) = &style.word_on_switch {
        list = list.word_on_switch(c);
    }
    if let Some(c) = &style.background_color {
        list = list.background_color(c);
    }
    if let Some(c) = &style.background_on_switch {
        list = list.background_on_switch(c);
    }
    Ok(list)
}

fn checkbox(
    mut check: Check,
    glyph: &Option<String>,
    color: &Option<String>,
    on_switch: &Option<String>,
    style: &ListStyle,
) -> Result<Check, BuildError> {
    if let Some(g) = glyph {
        check = check.check(g.as_str());
    }
    if let Some(c) = color {
        check = check.check_color(c);
    }
    if let Some(c) = on_switch {
        check = check.check_on_switch(c);
    }
    styled_list(check.return_index(style.return_index), style)
}

/// Build the widget one `[[prompts]]` entry describes.
pub fn build_field(entry: &PromptEntry) -> Result<Box<dyn Field>, BuildError> {
    let field: Box<dyn Field> = match entry {
        PromptEntry::Bullet {
            prompt,
            choices,
            bullet,
            bullet_color,
            default,
            style,
        } => {
            let mut list = Bullet::new(prompt.as_str(), choices.iter().cloned())?
                .return_index(style.return_index);
            if let Some(g) = bullet {
                list = list.bullet(g.as_str());
            }
            if let Some(c) = bullet_color {
                list = list.bullet_color(c);
            }
            if let Some(i) = default {
                list = list.default(*i)?;
            }
            Box::new(styled_list(list, style)?)
        }
        PromptEntry::Check {
            prompt,
            choices,
            check,
            check_color,
            check_on_switch,
            default,
            style,
        } => {
            let list = Check::new(prompt.as_str(), choices.iter().cloned())?
                .default(default.iter().copied())?;
            Box::new(checkbox(list, check, check_color, check_on_switch, style)?)
        }
        PromptEntry::Dependencies {
            prompt,
            tree,
            check,
            check_color,
            check_on_switch,
            style,
        } => {
            let tree = tree
                .iter()
                .map(|d| (d.choice.clone(), d.requires.clone()));
            let list = Check::with_dependencies(prompt.as_str(), tree)?;
            Box::new(checkbox(list, check, check_color, check_on_switch, style)?)
        }
        PromptEntry::Scroll {
            prompt,
            choices,
            pointer,
            up_indicator,
            down_indicator,
            pointer_color,
            indicator_color,
            height,
            style,
        } => {
            let mut bar = ScrollBar::new(prompt.as_str(), choices.iter().cloned())?
                .return_index(style.return_index);
            if let Some(h) = height {
                bar = bar.height(*h);
            }
            if let Some(g) = pointer {
                bar = bar.pointer(g.as_str());
            }
            if let Some(g) = up_indicator {
                bar = bar.up_indicator(g.as_str());
            }
            if let Some(g) = down_indicator {
                bar = bar.down_indicator(g.as_str());
            }
            if let Some(c) = pointer_color {
                bar = bar.pointer_color(c);
            }
            if let Some(c) = indicator_color {
                bar = bar.indicator_color(c);
            }
            Box::new(styled_list(bar, style)?)
        }
        PromptEntry::YesNo {
            prompt,
            default,
            indent,
            prompt_color,
            word_color,
            prompt_prefix,
        } => {
            let mut field = YesNo::new(prompt.as_str())?.indent(spacing("indent", *indent)?);
            if let Some(d) = default {
                field = field.default(d)?;
            }
            if let Some(p) = prompt_prefix {
                field = field.prompt_prefix(p.as_str());
            }
            if let Some(c) = prompt_color {
                field = field.prompt_color(c);
            }
            if let Some(c) = word_color {
                field = field.word_color(c);
            }
            Box::new(field)
        }
        PromptEntry::Input {
            prompt,
            default,
            indent,
            prompt_color,
            word_color,
            strip,
            pattern,
        } => {
            let mut field = Input::new(prompt.as_str())?
                .indent(spacing("indent", *indent)?)
                .strip(*strip);
            if let Some(d) = default {
                field = field.default(d.as_str());
            }
            if let Some(p) = pattern {
                field = field.pattern(p)?;
            }
            if let Some(c) = prompt_color {
                field = field.prompt_color(c);
            }
            if let Some(c) = word_color {
                field = field.word_color(c);
            }
            Box::new(field)
        }
        PromptEntry::Password {
            prompt,
            indent,
            hidden,
            prompt_color,
            word_color,
        } => {
            let mut field = Password::new(prompt.as_str())?.indent(spacing("indent", *indent)?);
            if let Some(h) = hidden {
                field = field.hidden(*h);
            }
            if let Some(c) = prompt_color {
                field = field.prompt_color(c);
            }
            if let Some(c) = word_color {
                field = field.word_color(c);
            }
            Box::new(field)
        }
        PromptEntry::Numbers {
            prompt,
            indent,
            prompt_color,
            word_color,
            integer,
            default,
        } => {
            let kind = if *integer {
                NumberKind::Integer
            } else {
                NumberKind::Float
            };
            let mut field = Numbers::new(prompt.as_str())?
                .kind(kind)
                .indent(spacing("indent", *indent)?);
            if let Some(d) = default {
                field = field.default(d)?;
            }
            if let Some(c) = prompt_color {
                field = field.prompt_color(c);
            }
            if let Some(c) = word_color {
                field = field.word_color(c);
            }
            Box::new(field)
        }
        PromptEntry::Date {
            prompt,
            default,
            format,
            indent,
            word_color,
        } => {
            let mut field = Date::new(prompt.as_str())?.indent(spacing("indent", *indent)?);
            if let Some(d) = default {
                field = field.default(*d);
            }
            if let Some(f) = format {
                field = field.format(f.as_str());
            }
            if let Some(c) = word_color {
                field = field.word_color(c);
            }
            Box::new(field)
        }
    };
    Ok(field)
}

/// Build every entry in order, tagging failures with the entry's position.
pub fn build_fields(prompts: &[PromptEntry]) -> Result<Vec<Box<dyn Field>>, ConfigError> {
    prompts
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            build_field(entry).map_err(|source| ConfigError::Build {
                index,
                kind: entry.kind(),
                source,
            })
        })
        .collect()
}

enum Sequence {
    Vertical(VerticalPrompt),
    Slide(SlidePrompt),
}

/// A form file turned into widgets, ready to run.
pub struct Form {
    sequence: Sequence,
    summary: bool,
}

impl Form {
    /// `layout` overrides the one named in the file.
    pub fn from_config(config: &FormConfig, layout: Option<Layout>) -> Result<Self, ConfigError> {
        let fields = build_fields(&config.prompts)?;
        let general = &config.general;
        let wrap = |source| ConfigError::Build {
            index: 0,
            kind: "form",
            source,
        };
        let sequence = match layout.or(general.layout).unwrap_or_default() {
            Layout::Vertical => {
                let mut vertical = VerticalPrompt::new(fields).map_err(wrap)?;
                if let Some(n) = general.spacing {
                    vertical = vertical.spacing(n);
                }
                if let Some(s) = &general.separator {
                    vertical = vertical.separator(s.as_str());
                }
                if let Some(c) = &general.separator_color {
                    vertical = vertical.separator_color(c);
                }
                Sequence::Vertical(vertical)
            }
            Layout::Slide => Sequence::Slide(SlidePrompt::new(fields).map_err(wrap)?),
        };
        Ok(Self {
            sequence,
            summary: general.summary.unwrap_or(false),
        })
    }

    pub fn layout(&self) -> Layout {
        match self.sequence {
            Sequence::Vertical(_) => Layout::Vertical,
            Sequence::Slide(_) => Layout::Slide,
        }
    }

    /// Whether the form asks for a summary once it finishes.
    pub fn summary(&self) -> bool {
        self.summary
    }

    pub fn run(&mut self, term: &mut Terminal<'_>) -> Result<Answers, PromptError> {
        match &mut self.sequence {
            Sequence::Vertical(v) => v.launch(term),
            Sequence::Slide(s) => s.launch(term),
        }
    }

    pub fn summarize(&self, out: &mut dyn Write) -> io::Result<()> {
        match &self.sequence {
            Sequence::Vertical(v) => v.summarize(out),
            Sequence::Slide(s) => s.summarize(out),
        }
    }
}
