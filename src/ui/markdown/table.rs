use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::Theme;

const COLUMN_SEPARATOR: &str = " │ ";
const MIN_COLUMN_WIDTH: usize = 3;

/// Collects markdown table events and lays the cells out in aligned columns.
///
/// pulldown-cmark emits the header cells directly inside `TableHead` and body
/// cells inside `TableRow`, so rows are committed on either end event.
#[derive(Debug, Default)]
pub(super) struct TableBuilder {
    rows: Vec<Vec<String>>,
    header_rows: usize,
    current_row: Vec<String>,
    current_cell: String,
}

impl TableBuilder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn end_header(&mut self) {
        self.commit_row();
        self.header_rows = self.rows.len();
    }

    pub(super) fn end_row(&mut self) {
        self.commit_row();
    }

    pub(super) fn start_cell(&mut self) {
        self.current_cell.clear();
    }

    pub(super) fn end_cell(&mut self) {
        let cell = std::mem::take(&mut self.current_cell);
        self.current_row.push(cell.trim().to_string());
    }

    pub(super) fn push_text(&mut self, text: &str) {
        self.current_cell.push_str(text);
    }

    fn commit_row(&mut self) {
        if !self.current_row.is_empty() {
            self.rows.push(std::mem::take(&mut self.current_row));
        }
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(UnicodeWidthStr::width(cell.as_str()));
            }
        }

        let separators = columns.saturating_sub(1) * UnicodeWidthStr::width(COLUMN_SEPARATOR);
        let budget = max_width.saturating_sub(separators);
        // Shrink the widest column until the table fits or every column is at the floor.
        while widths.iter().sum::<usize>() > budget {
            let Some((idx, widest)) = widths
                .iter()
                .copied()
                .enumerate()
                .max_by_key(|(_, w)| *w)
            else {
                break;
            };
            if widest <= MIN_COLUMN_WIDTH {
                break;
            }
            widths[idx] = widest - 1;
        }
        widths
    }

    /// Render the table into lines no wider than `max_width` where possible.
    /// Overlong cells are truncated with an ellipsis.
    pub(super) fn finish(self, theme: &Theme, max_width: usize) -> Vec<Line<'static>> {
        let widths = self.column_widths(max_width);
        let header_style = theme.model_text_style.add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();

        for (row_idx, row) in self.rows.iter().enumerate() {
            let style = if row_idx < self.header_rows {
                header_style
            } else {
                theme.model_text_style
            };
            let mut spans = Vec::new();
            for (col, width) in widths.iter().enumerate() {
                if col > 0 {
                    spans.push(Span::styled(COLUMN_SEPARATOR, theme.md_rule_style));
                }
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                spans.push(Span::styled(fit_cell(cell, *width), style));
            }
            lines.push(Line::from(spans));

            if row_idx + 1 == self.header_rows {
                let rule = widths
                    .iter()
                    .map(|w| "─".repeat(*w))
                    .collect::<Vec<_>>()
                    .join("─┼─");
                lines.push(Line::from(Span::styled(rule, theme.md_rule_style)));
            }
        }
        lines
    }
}

fn fit_cell(cell: &str, width: usize) -> String {
    let cell_width = UnicodeWidthStr::width(cell);
    if cell_width <= width {
        return format!("{cell}{}", " ".repeat(width - cell_width));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in cell.chars() {
        let cw = UnicodeWidthStr::width(ch.encode_utf8(&mut [0; 4]));
        if used + cw + 1 > width {
            break;
        }
        out.push(ch);
        used += cw;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
