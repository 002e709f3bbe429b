//! Transcript layout: turns messages into wrapped, styled rows.
//!
//! Messages never change once appended, so each message's rows are cached by
//! id and only rebuilt when the width or the rendering flags change.

use std::collections::HashMap;

use ratatui::text::{Line, Span};

use crate::core::app::App;
use crate::core::message::{Message, Role};
use crate::ui::markdown::render_markdown;
use crate::ui::theme::Theme;
use crate::ui::wrap::wrap_lines;
use crate::utils::image::human_size;

pub const USER_LABEL: &str = "You";
pub const MODEL_LABEL: &str = "Spark";
const ERROR_MARKER: &str = "⚠ ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenderKey {
    width: u16,
    markdown: bool,
    syntax: bool,
}

#[derive(Debug, Default)]
pub struct TranscriptCache {
    key: Option<RenderKey>,
    entries: HashMap<String, Vec<Line<'static>>>,
}

impl TranscriptCache {
    fn prepare(&mut self, key: RenderKey) {
        if self.key != Some(key) {
            self.entries.clear();
            self.key = Some(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn header_line(message: &Message, theme: &Theme) -> Line<'static> {
    let (label, style) = match message.role {
        Role::User => (USER_LABEL, theme.user_label_style),
        Role::Model => (MODEL_LABEL, theme.model_label_style),
    };
    let mut spans = vec![Span::styled(label, style)];
    let time = message.time_label();
    if !time.is_empty() {
        spans.push(Span::styled(format!(" · {time}"), theme.timestamp_style));
    }
    Line::from(spans)
}

fn literal_lines(text: &str, style: ratatui::style::Style) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|line| Line::from(Span::styled(line.replace('\t', "    "), style)))
        .collect()
}

/// Rows for one message, before wrapping.
pub fn message_lines(
    message: &Message,
    theme: &Theme,
    markdown_enabled: bool,
    syntax_enabled: bool,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![header_line(message, theme)];

    if let Some(attachment) = &message.attachment {
        let badge = format!(
            "[image: {}, {}]",
            attachment.mime_type,
            human_size(attachment.byte_len())
        );
        lines.push(Line::from(Span::styled(badge, theme.attachment_style)));
    }

    match message.role {
        Role::User => {
            if !message.text.is_empty() {
                lines.extend(literal_lines(&message.text, theme.user_text_style));
            }
        }
        Role::Model if message.is_error => {
            lines.push(Line::from(vec![
                Span::styled(ERROR_MARKER, theme.error_text_style),
                Span::styled(message.text.clone(), theme.error_text_style),
            ]));
        }
        Role::Model if markdown_enabled => {
            lines.extend(render_markdown(
                &message.text,
                theme,
                syntax_enabled,
                width,
            ));
        }
        Role::Model => lines.extend(literal_lines(&message.text, theme.model_text_style)),
    }

    lines.push(Line::default());
    lines
}

/// The row shown under the last message while a turn is in flight.
pub fn loading_line(app: &App) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{} ", app.pulse.symbol()), app.theme.model_label_style),
        Span::styled(format!("{MODEL_LABEL} is thinking…"), app.theme.loading_style),
    ])
}

/// All transcript rows wrapped to `width`, including the loading row.
pub fn build_transcript_lines(app: &mut App, width: u16) -> Vec<Line<'static>> {
    let key = RenderKey {
        width,
        markdown: app.markdown_enabled,
        syntax: app.syntax_enabled,
    };
    app.render_cache.prepare(key);

    let wrap_width = usize::from(width.max(1));
    let mut out = Vec::new();
    for message in app.conversation.messages() {
        let rows = app
            .render_cache
            .entries
            .entry(message.id.clone())
            .or_insert_with(|| {
                let lines = message_lines(
                    message,
                    &app.theme,
                    app.markdown_enabled,
                    app.syntax_enabled,
                    wrap_width,
                );
                wrap_lines(&lines, wrap_width)
            });
        out.extend(rows.iter().cloned());
    }

    if app.is_loading() {
        out.extend(wrap_lines(&[loading_line(app)], wrap_width));
    }
    out
}
