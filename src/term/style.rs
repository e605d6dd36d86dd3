//! Color names → SGR escape codes.
//!
//! Widgets treat a style as an opaque prefix string: they write it before the
//! text and [`RESET`] after. [`REVERSE`] works as either a foreground or a
//! background style.

use log::warn;

pub const RESET: &str = "\x1b[0m";
pub const REVERSE: &str = "\x1b[7m";

/// Which half of the color table a name resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Foreground,
    Background,
}

const NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

impl Palette {
    fn base(self) -> u8 {
        match self {
            Palette::Foreground => 30,
            Palette::Background => 40,
        }
    }

    /// The terminal's own default color for this palette.
    pub fn default_code(self) -> String {
        format!("\x1b[{}m", self.base() + 9)
    }

    fn named(self, name: &str) -> Option<String> {
        if name == "default" {
            return Some(self.default_code());
        }
        NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| format!("\x1b[{}m", self.base() + i as u8))
    }
}

/// Resolve a color spec: a name from the table, `default`, `reverse`,
/// `bright_<name>`, or a literal escape code passed through untouched.
/// Unknown names fall back to the palette default.
pub fn resolve(spec: &str, palette: Palette) -> String {
    let name = spec.trim().to_ascii_lowercase();
    if spec.starts_with("\x1b[") {
        return spec.to_string();
    }
    if name.is_empty() {
        return palette.default_code();
    }
    if name == "reverse" {
        return REVERSE.to_string();
    }
    if let Some(base) = name.strip_prefix("bright_") {
        return bright(&resolve(base, palette));
    }
    palette.named(&name).unwrap_or_else(|| {
        warn!("Unknown color {spec:?}, using the default");
        palette.default_code()
    })
}

/// Bold/bright variant of an SGR code: `ESC[31m` → `ESC[31;1m`.
pub fn bright(code: &str) -> String {
    match code.strip_suffix('m') {
        Some(body) if code.starts_with("\x1b[") => format!("{body};1m"),
        _ => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(resolve("red", Palette::Foreground), "\x1b[31m");
        assert_eq!(resolve("red", Palette::Background), "\x1b[41m");
        assert_eq!(resolve("White", Palette::Foreground), "\x1b[37m");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(resolve("default", Palette::Foreground), "\x1b[39m");
        assert_eq!(resolve("", Palette::Background), "\x1b[49m");
        assert_eq!(resolve("no-such-color", Palette::Background), "\x1b[49m");
    }

    #[test]
    fn test_reverse_and_literal() {
        assert_eq!(resolve("reverse", Palette::Background), REVERSE);
        assert_eq!(resolve("\x1b[38;5;208m", Palette::Foreground), "\x1b[38;5;208m");
    }

    #[test]
    fn test_bright() {
        assert_eq!(resolve("bright_cyan", Palette::Foreground), "\x1b[36;1m");
        assert_eq!(bright("\x1b[31m"), "\x1b[31;1m");
        assert_eq!(bright("plain"), "plain");
    }
}
