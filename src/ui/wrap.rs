//! Word wrapping for styled lines.
//!
//! The transcript is wrapped up front instead of through `Paragraph::wrap`, so
//! the renderer knows the exact number of visual rows and can clamp the scroll
//! offset against it. Words that span several styled spans (for example
//! `**bold**,`) stay together; words wider than the viewport are split by
//! display width.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug)]
struct Unit {
    pieces: Vec<(String, Style)>,
    width: usize,
    blank: bool,
}

fn units(line: &Line<'_>) -> Vec<Unit> {
    let mut out: Vec<Unit> = Vec::new();
    for span in &line.spans {
        let mut buf = String::new();
        let mut buf_blank: Option<bool> = None;
        for ch in span.content.chars() {
            let blank = ch.is_whitespace();
            if buf_blank.is_some_and(|b| b != blank) {
                push_piece(&mut out, std::mem::take(&mut buf), span.style, !blank);
            }
            buf.push(ch);
            buf_blank = Some(blank);
        }
        if let Some(blank) = buf_blank {
            push_piece(&mut out, buf, span.style, blank);
        }
    }
    out
}

fn push_piece(out: &mut Vec<Unit>, text: String, style: Style, blank: bool) {
    let width = UnicodeWidthStr::width(text.as_str());
    match out.last_mut() {
        Some(unit) if unit.blank == blank => {
            unit.width += width;
            unit.pieces.push((text, style));
        }
        _ => out.push(Unit {
            pieces: vec![(text, style)],
            width,
            blank,
        }),
    }
}

#[derive(Default)]
struct LineBuilder {
    spans: Vec<Span<'static>>,
    width: usize,
}

impl LineBuilder {
    fn push_str(&mut self, text: &str, style: Style, width: usize) {
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push_str(text),
            _ => self.spans.push(Span::styled(text.to_string(), style)),
        }
        self.width += width;
    }

    fn push_unit(&mut self, unit: &Unit) {
        for (text, style) in &unit.pieces {
            self.push_str(text, *style, UnicodeWidthStr::width(text.as_str()));
        }
    }

    fn finish(&mut self, template: &Line<'_>) -> Line<'static> {
        let spans = std::mem::take(&mut self.spans);
        self.width = 0;
        Line {
            spans,
            style: template.style,
            alignment: template.alignment,
        }
    }
}

/// Wrap one line to `max_width` columns. Always yields at least one line.
pub fn wrap_line(line: &Line<'_>, max_width: usize) -> Vec<Line<'static>> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = LineBuilder::default();

    for unit in units(line) {
        if current.width + unit.width <= max_width {
            current.push_unit(&unit);
            continue;
        }
        if unit.blank {
            // Whitespace at a break point is dropped.
            lines.push(current.finish(line));
            continue;
        }
        if current.width > 0 {
            lines.push(current.finish(line));
        }
        if unit.width <= max_width {
            current.push_unit(&unit);
            continue;
        }
        let mut utf8 = [0u8; 4];
        for (text, style) in &unit.pieces {
            for ch in text.chars() {
                let cw = ch.width().unwrap_or(0);
                if current.width + cw > max_width && current.width > 0 {
                    lines.push(current.finish(line));
                }
                current.push_str(ch.encode_utf8(&mut utf8), *style, cw);
            }
        }
    }

    lines.push(current.finish(line));
    lines
}

/// Wrap every line in `lines`, preserving order.
pub fn wrap_lines(lines: &[Line<'_>], max_width: usize) -> Vec<Line<'static>> {
    lines
        .iter()
        .flat_map(|line| wrap_line(line, max_width))
        .collect()
}
