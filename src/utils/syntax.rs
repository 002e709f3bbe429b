//! Syntax highlighting for fenced code blocks in model answers.

use std::sync::OnceLock;

use ratatui::style::{Color as TuiColor, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::ui::theme::Theme;

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn is_dark_background(c: &TuiColor) -> bool {
    match c {
        TuiColor::Rgb(r, g, b) => {
            let br = 0.2126 * (*r as f32) + 0.7152 * (*g as f32) + 0.0722 * (*b as f32);
            br < 128.0
        }
        TuiColor::White => false,
        _ => true,
    }
}

fn normalize_lang_hint(s: &str) -> String {
    let t = s.trim().to_ascii_lowercase();
    match t.as_str() {
        "py" | "python" => "python".into(),
        "bash" | "sh" | "zsh" | "shell" | "console" => "bash".into(),
        "js" | "javascript" | "jsx" => "javascript".into(),
        "ts" | "tsx" | "typescript" => "typescript".into(),
        "yml" | "yaml" => "yaml".into(),
        "rs" | "rust" => "rust".into(),
        "c" | "h" => "c".into(),
        "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "c++" => "cpp".into(),
        "kt" | "kotlin" => "kotlin".into(),
        other => other.into(),
    }
}

/// Code blocks always sit on the block background, so the syntect theme is
/// chosen against that color rather than the frame background.
pub(crate) fn pick_syntect_theme_name(theme: &Theme) -> &'static str {
    let bg = theme.md_codeblock_bg_color().unwrap_or(theme.background_color);
    if is_dark_background(&bg) {
        "base16-ocean.dark"
    } else {
        "InspiredGitHub"
    }
}

/// Highlight `code` as `lang_hint`. Returns `None` when no syntect theme is
/// available or highlighting fails, in which case callers render plain text.
pub fn highlight_code_block(
    lang_hint: &str,
    code: &str,
    theme: &Theme,
) -> Option<Vec<Line<'static>>> {
    let ps = syntax_set();
    let syn_theme = theme_set().themes.get(pick_syntect_theme_name(theme))?;

    let lang = normalize_lang_hint(lang_hint);
    let syntax = ps
        .find_syntax_by_token(&lang)
        .unwrap_or_else(|| ps.find_syntax_plain_text());

    let mut highlighter = HighlightLines::new(syntax, syn_theme);
    let bg = theme.md_codeblock_bg_color();

    let mut out = Vec::new();
    for line in LinesWithEndings::from(code) {
        let ranges = highlighter.highlight_line(line, ps).ok()?;
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .filter_map(|(style, text)| {
                let frag = text.trim_end_matches('\n');
                if frag.is_empty() {
                    return None;
                }
                let fg = style.foreground;
                let mut st = Style::default().fg(TuiColor::Rgb(fg.r, fg.g, fg.b));
                if let Some(bg) = bg {
                    st = st.bg(bg);
                }
                Some(Span::styled(frag.replace('\t', "    "), st))
            })
            .collect();
        out.push(Line::from(spans));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lang_hint_maps_common_aliases() {
        assert_eq!(normalize_lang_hint("py"), "python");
        assert_eq!(normalize_lang_hint("JS"), "javascript");
        assert_eq!(normalize_lang_hint("yml"), "yaml");
        assert_eq!(normalize_lang_hint("rs"), "rust");
        assert_eq!(normalize_lang_hint("elixir"), "elixir");
    }

    #[test]
    fn dark_background_heuristic_basic() {
        assert!(is_dark_background(&TuiColor::Black));
        assert!(!is_dark_background(&TuiColor::White));
        assert!(is_dark_background(&TuiColor::Rgb(30, 41, 59)));
        assert!(!is_dark_background(&TuiColor::Rgb(240, 240, 240)));
    }

    #[test]
    fn highlights_one_line_per_source_line() {
        let theme = Theme::dark_default();
        let code = "fn main() {\n    println!(\"hi\");\n}\n";
        let lines = highlight_code_block("rust", code, &theme).expect("default themes are bundled");
        assert_eq!(lines.len(), 3);
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first, "fn main() {");
        assert!(lines[0]
            .spans
            .iter()
            .all(|span| span.style.bg == theme.md_codeblock_bg_color()));
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        let theme = Theme::light();
        let lines = highlight_code_block("not-a-language", "plain\n", &theme).unwrap();
        assert_eq!(lines.len(), 1);
    }
}
