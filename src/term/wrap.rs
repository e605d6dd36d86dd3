//! Word wrapping for multi-line messages printed below a field.

/// Widest a help message is allowed to get, whatever the terminal width.
pub const MAX_MESSAGE_WIDTH: usize = 70;

fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Wrap `text` to at most `width` columns, one `String` per row.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, wrap_options(width))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Width for a message on a terminal `terminal_width` columns wide.
pub fn message_width(terminal_width: u16) -> usize {
    usize::from(terminal_width).clamp(1, MAX_MESSAGE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_on_spaces() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_breaks_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_message_width_is_capped() {
        assert_eq!(message_width(200), MAX_MESSAGE_WIDTH);
        assert_eq!(message_width(40), 40);
        assert_eq!(message_width(0), 1);
    }
}
