use pulldown_cmark::CodeBlockKind;
use ratatui::text::{Line, Span};

use crate::ui::theme::Theme;

/// How a code fragment is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Inline,
    Block,
}

/// Classify a code fragment: it is a block when it carries a language tag or
/// spans more than one line, and inline otherwise.
pub fn classify_code(language: Option<&str>, content: &str) -> CodeKind {
    let tagged = language.is_some_and(|lang| !lang.trim().is_empty());
    if tagged || content.contains('\n') {
        CodeKind::Block
    } else {
        CodeKind::Inline
    }
}

pub(super) fn language_hint(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Indented => None,
        CodeBlockKind::Fenced(info) => info
            .split_ascii_whitespace()
            .next()
            .map(|lang| lang.to_string()),
    }
}

fn plain_code_lines(code: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut style = theme.md_codeblock_text_style;
    if let Some(bg) = theme.md_codeblock_bg_color() {
        style = style.bg(bg);
    }
    code.lines()
        .map(|line| Line::from(Span::styled(line.replace('\t', "    "), style)))
        .collect()
}

/// Lines for a code block, highlighted when `syntax_enabled` and a grammar is
/// available.
pub(super) fn code_block_lines(
    language: Option<&str>,
    code: &str,
    theme: &Theme,
    syntax_enabled: bool,
) -> Vec<Line<'static>> {
    let code = code.strip_suffix('\n').unwrap_or(code);
    if syntax_enabled {
        if let Some(lines) =
            crate::utils::syntax::highlight_code_block(language.unwrap_or(""), code, theme)
        {
            return lines;
        }
    }
    plain_code_lines(code, theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::CowStr;

    #[test]
    fn language_tag_makes_a_block() {
        assert_eq!(classify_code(Some("rust"), "let x = 1;"), CodeKind::Block);
    }

    #[test]
    fn newline_makes_a_block() {
        assert_eq!(classify_code(None, "a\nb"), CodeKind::Block);
    }

    #[test]
    fn single_line_without_tag_is_inline() {
        assert_eq!(classify_code(None, "x + 1"), CodeKind::Inline);
        assert_eq!(classify_code(Some("  "), "x + 1"), CodeKind::Inline);
    }

    #[test]
    fn fenced_info_string_yields_first_word() {
        let kind = CodeBlockKind::Fenced(CowStr::from("python title=demo"));
        assert_eq!(language_hint(&kind).as_deref(), Some("python"));
        assert_eq!(language_hint(&CodeBlockKind::Indented), None);
    }

    #[test]
    fn plain_block_uses_codeblock_background() {
        let theme = Theme::dark_default();
        let lines = code_block_lines(None, "a\tb\nc\n", &theme, false);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "a    b");
        assert_eq!(lines[0].spans[0].style.bg, theme.md_codeblock_bg_color());
    }
}
