//! Input sanitization for text that reaches the composer from outside the
//! keyboard path (bracketed paste, dropped files).

/// Normalize pasted text so it cannot corrupt the terminal layout.
///
/// Tabs become four spaces, `\r\n` and lone `\r` become `\n`, and all other
/// control characters are dropped.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => {
                chars.next_if_eq(&'\n');
                sanitized.push('\n');
            }
            '\n' => sanitized.push('\n'),
            c if c.is_control() => {}
            c => sanitized.push(c),
        }
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(sanitize_text_input("hello world"), "hello world");
    }

    #[test]
    fn tabs_and_carriage_returns_are_normalized() {
        assert_eq!(sanitize_text_input("a\tb\rc"), "a    b\nc");
        assert_eq!(sanitize_text_input("x\r\ny"), "x\ny");
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(sanitize_text_input("be\x07ll\x00"), "bell");
    }
}
