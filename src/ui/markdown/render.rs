use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::code::{classify_code, code_block_lines, language_hint, CodeKind};
use super::table::TableBuilder;
use crate::ui::theme::Theme;

const QUOTE_PREFIX: &str = "│ ";
const MAX_RULE_WIDTH: usize = 48;

#[derive(Clone, Copy, Debug)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

#[derive(Debug)]
struct ListState {
    kind: ListKind,
    marker_width: usize,
}

#[derive(Debug)]
struct CodeBuffer {
    language: Option<String>,
    text: String,
}

#[derive(Debug)]
struct LinkState {
    url: String,
    text: String,
}

/// Render model markdown into styled, unwrapped lines.
///
/// `width` is only used to size horizontal rules and tables; wrapping of
/// prose happens later in [`crate::ui::wrap`].
pub fn render_markdown(
    text: &str,
    theme: &Theme,
    syntax_enabled: bool,
    width: usize,
) -> Vec<Line<'static>> {
    MarkdownRenderer::new(theme, syntax_enabled, width).render(text)
}

struct MarkdownRenderer<'a> {
    theme: &'a Theme,
    syntax_enabled: bool,
    width: usize,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListState>,
    pending_marker: Option<String>,
    quote_depth: usize,
    code_block: Option<CodeBuffer>,
    links: Vec<LinkState>,
    table: Option<TableBuilder>,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(theme: &'a Theme, syntax_enabled: bool, width: usize) -> Self {
        Self {
            theme,
            syntax_enabled,
            width: width.max(1),
            lines: Vec::new(),
            current: Vec::new(),
            style_stack: Vec::new(),
            list_stack: Vec::new(),
            pending_marker: None,
            quote_depth: 0,
            code_block: None,
            links: Vec::new(),
            table: None,
        }
    }

    fn style(&self) -> Style {
        self.style_stack
            .last()
            .copied()
            .unwrap_or(self.theme.model_text_style)
    }

    fn push_modified(&mut self, modifier: Modifier) {
        let style = self.style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    /// Quote bars and list indentation that open every rendered line.
    fn line_prefix(&mut self) -> Vec<Span<'static>> {
        let mut prefix = Vec::new();
        for _ in 0..self.quote_depth {
            prefix.push(Span::styled(QUOTE_PREFIX, self.theme.md_quote_style));
        }
        if let Some((last, parents)) = self.list_stack.split_last() {
            let indent: usize = parents.iter().map(|l| l.marker_width).sum();
            if indent > 0 {
                prefix.push(Span::raw(" ".repeat(indent)));
            }
            match self.pending_marker.take() {
                Some(marker) => {
                    prefix.push(Span::styled(marker, self.theme.md_list_marker_style))
                }
                None => prefix.push(Span::raw(" ".repeat(last.marker_width))),
            }
        }
        prefix
    }

    fn prefix_width(&self) -> usize {
        let quotes = self.quote_depth * UnicodeWidthStr::width(QUOTE_PREFIX);
        let lists: usize = self.list_stack.iter().map(|l| l.marker_width).sum();
        quotes + lists
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.current.is_empty() {
            self.current = self.line_prefix();
        }
        self.current.push(span);
    }

    fn push_text(&mut self, text: &str) {
        if let Some(link) = self.links.last_mut() {
            link.text.push_str(text);
        }
        if let Some(table) = self.table.as_mut() {
            table.push_text(text);
            return;
        }
        let style = self.style();
        self.push_span(Span::styled(text.to_string(), style));
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(Line::from(spans));
        }
    }

    fn push_blank_line(&mut self) {
        self.flush_line();
        let last_is_blank = self.lines.last().is_none_or(|l| l.spans.is_empty());
        if !last_is_blank {
            self.lines.push(Line::default());
        }
    }

    fn push_block_lines(&mut self, block: Vec<Line<'static>>) {
        self.flush_line();
        for line in block {
            let mut spans = self.line_prefix();
            spans.extend(line.spans);
            self.lines.push(Line::from(spans));
        }
    }

    fn end_block(&mut self) {
        if self.list_stack.is_empty() {
            self.push_blank_line();
        } else {
            self.flush_line();
        }
    }

    fn start_item(&mut self) {
        self.flush_line();
        let Some(list) = self.list_stack.last_mut() else {
            return;
        };
        let marker = match &mut list.kind {
            ListKind::Unordered => "• ".to_string(),
            ListKind::Ordered(n) => {
                let marker = format!("{n}. ");
                *n += 1;
                marker
            }
        };
        list.marker_width = UnicodeWidthStr::width(marker.as_str());
        self.pending_marker = Some(marker);
    }

    fn finish_code_block(&mut self) {
        let Some(CodeBuffer { language, text }) = self.code_block.take() else {
            return;
        };
        match classify_code(language.as_deref(), &text) {
            CodeKind::Block => {
                let lines =
                    code_block_lines(language.as_deref(), &text, self.theme, self.syntax_enabled);
                self.push_block_lines(lines);
                self.end_block();
            }
            CodeKind::Inline => {
                if !text.trim().is_empty() {
                    let span = Span::styled(text, self.theme.md_inline_code_style);
                    self.push_span(span);
                    self.end_block();
                }
            }
        }
    }

    fn finish_link(&mut self) {
        self.style_stack.pop();
        let Some(link) = self.links.pop() else {
            return;
        };
        if !link.url.is_empty() && link.text.trim() != link.url {
            let suffix = format!(" ({})", link.url);
            if let Some(table) = self.table.as_mut() {
                table.push_text(&suffix);
            } else {
                let style = self.theme.md_link_style.add_modifier(Modifier::DIM);
                self.push_span(Span::styled(suffix, style));
            }
        }
    }

    fn push_rule(&mut self) {
        self.flush_line();
        let available = self.width.saturating_sub(self.prefix_width()).max(1);
        let rule = "─".repeat(available.min(MAX_RULE_WIDTH));
        self.push_span(Span::styled(rule, self.theme.md_rule_style));
        self.push_blank_line();
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.flush_line();
                let mut style = self.theme.md_heading_style;
                if level == HeadingLevel::H1 {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                self.style_stack.push(style);
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth += 1;
                self.style_stack.push(self.theme.md_quote_style);
            }
            Tag::List(start) => {
                self.flush_line();
                let kind = match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Unordered,
                };
                self.list_stack.push(ListState {
                    kind,
                    marker_width: 0,
                });
            }
            Tag::Item => self.start_item(),
            Tag::CodeBlock(kind) => {
                self.flush_line();
                self.code_block = Some(CodeBuffer {
                    language: language_hint(&kind),
                    text: String::new(),
                });
            }
            Tag::Emphasis => self.push_modified(Modifier::ITALIC),
            Tag::Strong => self.push_modified(Modifier::BOLD),
            Tag::Strikethrough => self.push_modified(Modifier::CROSSED_OUT),
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.style_stack.push(self.theme.md_link_style);
                self.links.push(LinkState {
                    url: dest_url.to_string(),
                    text: String::new(),
                });
            }
            Tag::Table(_) => {
                self.flush_line();
                self.table = Some(TableBuilder::new());
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.start_cell();
                }
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.end_block(),
            TagEnd::Heading(_) => {
                self.style_stack.pop();
                self.push_blank_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.style_stack.pop();
                if self.quote_depth == 0 {
                    self.push_blank_line();
                }
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.list_stack.pop();
                self.pending_marker = None;
                if self.list_stack.is_empty() {
                    self.push_blank_line();
                }
            }
            TagEnd::Item => {
                // An item with no content still shows its marker.
                if self.pending_marker.is_some() {
                    self.current = self.line_prefix();
                }
                self.flush_line();
            }
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.style_stack.pop();
            }
            TagEnd::Link | TagEnd::Image => self.finish_link(),
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    let width = self.width.saturating_sub(self.prefix_width());
                    let lines = table.finish(self.theme, width);
                    self.push_block_lines(lines);
                    self.end_block();
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.end_header();
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.end_cell();
                }
            }
            _ => {}
        }
    }

    fn render(mut self, text: &str) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_MATH);

        for event in Parser::new_ext(text, options) {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) => match self.code_block.as_mut() {
                    Some(code) => code.text.push_str(&text),
                    None => self.push_text(&text),
                },
                Event::Code(code) => match classify_code(None, &code) {
                    CodeKind::Inline => {
                        if let Some(table) = self.table.as_mut() {
                            table.push_text(&code);
                        } else {
                            let style = self.theme.md_inline_code_style;
                            self.push_span(Span::styled(code.to_string(), style));
                        }
                    }
                    CodeKind::Block => {
                        let lines = code_block_lines(None, &code, self.theme, self.syntax_enabled);
                        self.push_block_lines(lines);
                    }
                },
                Event::InlineMath(math) | Event::DisplayMath(math) => {
                    let span = Span::styled(math.to_string(), self.theme.md_inline_code_style);
                    self.push_span(span);
                }
                Event::SoftBreak | Event::HardBreak => {
                    if self.table.is_some() {
                        self.push_text(" ");
                    } else {
                        self.flush_line();
                    }
                }
                Event::Rule => self.push_rule(),
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.push_span(Span::styled(marker, self.theme.md_list_marker_style));
                }
                Event::InlineHtml(html) => {
                    if matches!(html.trim(), "<br>" | "<br/>" | "<br />") {
                        self.flush_line();
                    }
                }
                Event::FootnoteReference(label) => {
                    let span = Span::styled(format!("[{label}]"), self.theme.md_link_style);
                    self.push_span(span);
                }
                Event::Html(_) => {}
            }
        }

        self.flush_line();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> Vec<String> {
        render_markdown(text, &Theme::dark_default(), false, 40)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        assert_eq!(render("one\n\ntwo"), vec!["one", "", "two"]);
    }

    #[test]
    fn emphasis_and_strong_carry_modifiers() {
        let theme = Theme::dark_default();
        let lines = render_markdown("a *b* **c**", &theme, false, 40);
        let spans = &lines[0].spans;
        let b = spans.iter().find(|s| s.content == "b").unwrap();
        let c = spans.iter().find(|s| s.content == "c").unwrap();
        assert!(b.style.add_modifier.contains(Modifier::ITALIC));
        assert!(c.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn inline_code_uses_inline_style() {
        let theme = Theme::dark_default();
        let lines = render_markdown("run `cargo test` now", &theme, false, 40);
        let code = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "cargo test")
            .unwrap();
        assert_eq!(code.style, theme.md_inline_code_style);
    }

    #[test]
    fn fenced_block_with_language_renders_as_block() {
        let theme = Theme::dark_default();
        let lines = render_markdown("```python\nprint(1)\n```", &theme, false, 40);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].content, "print(1)");
        assert_eq!(lines[0].spans[0].style.bg, theme.md_codeblock_bg_color());
    }

    #[test]
    fn untagged_fence_is_still_a_block() {
        let theme = Theme::dark_default();
        let lines = render_markdown("```\nls\n```", &theme, false, 40);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].content, "ls");
        assert_eq!(lines[0].spans[0].style.bg, theme.md_codeblock_bg_color());
    }

    #[test]
    fn empty_fence_renders_nothing() {
        assert!(render("```\n```").is_empty());
    }

    #[test]
    fn lists_get_markers_and_nested_indent() {
        assert_eq!(
            render("- one\n- two\n  - inner\n\n1. first\n2. second"),
            vec!["• one", "• two", "  • inner", "", "1. first", "2. second"]
        );
    }

    #[test]
    fn blockquotes_are_barred() {
        assert_eq!(render("> quoted"), vec!["│ quoted"]);
    }

    #[test]
    fn links_show_their_target() {
        assert_eq!(
            render("see [docs](https://example.test)"),
            vec!["see docs (https://example.test)"]
        );
        assert_eq!(
            render("<https://example.test>"),
            vec!["https://example.test"]
        );
    }

    #[test]
    fn rules_are_clamped_to_width() {
        let lines = render("a\n\n---\n\nb");
        assert_eq!(lines[2], "─".repeat(40));
    }

    #[test]
    fn tables_render_as_columns() {
        let lines = render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(lines, vec!["a │ b", "──┼──", "1 │ 2"]);
    }

    #[test]
    fn task_list_markers_are_kept() {
        assert_eq!(render("- [x] done"), vec!["• [x] done"]);
    }
}
