use ratatui::{
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::app::App;
use crate::ui::transcript::build_transcript_lines;
use crate::ui::wrap::wrap_line;

pub const APP_TITLE: &str = "Gemini Spark";
pub const TAGLINE: &str = "Simple. Fast. Multimodal.";
pub const EMPTY_STATE_TITLE: &str = "How can I help you today?";
pub const EMPTY_STATE_HINT: &str =
    "I can explain complex topics, analyze images, write code, or just chat.";
pub const FOOTER_DISCLAIMER: &str =
    "Gemini may display inaccurate info, including about people, so double-check its responses.";
const INPUT_PLACEHOLDER: &str = "Ask Gemini...";
const INPUT_HINTS: &str = " Enter send · Alt+Enter newline · Ctrl+O attach · Ctrl+C quit ";
const MAX_INPUT_LINES: u16 = 6;
const HEADER_HEIGHT: u16 = 3;

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(Block::default().style(app.theme.base_style()), area);

    let preview_height = u16::from(app.composer.pending_attachment().is_some());
    let input_height = input_area_height(app);

    let [header, transcript, preview, input, footer] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(1),
        Constraint::Length(preview_height),
        Constraint::Length(input_height),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(f, app, header);
    render_transcript(f, app, transcript);
    if preview_height > 0 {
        render_attachment_preview(f, app, preview);
    }
    render_input(f, app, input);
    f.render_widget(
        Paragraph::new(FOOTER_DISCLAIMER)
            .style(app.theme.footer_style)
            .alignment(Alignment::Center),
        footer,
    );

    if app.attach_prompt.is_some() {
        render_attach_prompt(f, app, area);
    }
    if app.alert.is_some() {
        render_alert(f, app, area);
    }
}

fn input_area_height(app: &App) -> u16 {
    let lines = u16::try_from(app.composer.draft_line_count()).unwrap_or(MAX_INPUT_LINES);
    lines.clamp(1, MAX_INPUT_LINES) + 2
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(app.theme.md_rule_style);
    let inner = block.inner(area).inner(Margin::new(1, 0));
    f.render_widget(block, area);

    let lines = vec![
        Line::from(vec![
            Span::styled("✦ ", app.theme.title_style),
            Span::styled(APP_TITLE, app.theme.title_style),
        ]),
        Line::from(Span::styled(
            format!("Powered by {}", app.model),
            app.theme.subtitle_style,
        )),
    ];
    f.render_widget(Paragraph::new(lines), inner);

    let title_width = APP_TITLE.len() + 2;
    if usize::from(inner.width) > title_width + TAGLINE.len() + 2 {
        f.render_widget(
            Paragraph::new(TAGLINE)
                .style(app.theme.tagline_style)
                .alignment(Alignment::Right),
            Rect { height: 1, ..inner },
        );
    }
}

fn render_empty_state(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("✦", app.theme.title_style)),
        Line::default(),
        Line::from(Span::styled(EMPTY_STATE_TITLE, app.theme.empty_state_title_style)),
        Line::from(Span::styled(EMPTY_STATE_HINT, app.theme.empty_state_text_style)),
    ];
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    let centered = Rect {
        y: top,
        height: area.height.saturating_sub(top - area.y),
        ..area
    };
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        centered,
    );
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let area = area.inner(Margin::new(1, 0));
    if app.messages().is_empty() && !app.is_loading() {
        app.transcript.update_bounds(0, area.height);
        render_empty_state(f, app, area);
        return;
    }

    // Rows are pre-wrapped so the scroll bounds match what is drawn.
    let lines = build_transcript_lines(app, area.width);
    app.transcript.update_bounds(lines.len(), area.height);
    let paragraph = Paragraph::new(lines).scroll((app.transcript.scroll_offset, 0));
    f.render_widget(paragraph, area);
}

fn render_attachment_preview(f: &mut Frame, app: &App, area: Rect) {
    let Some(pending) = app.composer.pending_attachment() else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(format!(" 📎 {}", pending.preview_label()), app.theme.attachment_style),
        Span::styled("  Ctrl+X to remove", app.theme.timestamp_style),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame, app: &mut App, area: Rect) {
    let loading = app.is_loading();
    let overlay_open = app.attach_prompt.is_some() || app.alert.is_some();
    let border_style = if loading {
        app.theme.input_disabled_style
    } else {
        app.theme.input_border_style
    };
    let title = if loading {
        " Waiting for Spark… "
    } else {
        " Message "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(title, app.theme.input_title_style))
        .title_bottom(
            Line::from(Span::styled(INPUT_HINTS, app.theme.input_title_style)).right_aligned(),
        );

    let cursor_style = if overlay_open {
        app.theme.input_text_style
    } else {
        app.theme.input_cursor_style
    };
    let theme = app.theme.clone();
    let textarea = app.composer.textarea_mut();
    textarea.set_block(block);
    textarea.set_style(theme.input_text_style);
    textarea.set_cursor_style(cursor_style);
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text(INPUT_PLACEHOLDER);
    textarea.set_placeholder_style(theme.timestamp_style);

    f.render_widget(app.composer.textarea(), area);
}

/// Rect of `width` x `height` centered in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4)).max(1);
    let height = height.min(area.height.saturating_sub(2)).max(1);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_attach_prompt(f: &mut Frame, app: &mut App, area: Rect) {
    let popup = centered_rect(72, 3, area);
    f.render_widget(Clear, popup);

    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(
            " Attach image: path or data URI (Enter to confirm, Esc to cancel) ",
            theme.input_title_style,
        ));
    let text_style = theme.input_text_style;
    let cursor_style = theme.input_cursor_style;

    if let Some(prompt) = app.attach_prompt.as_mut() {
        prompt.textarea.set_block(block);
        prompt.textarea.set_style(text_style);
        prompt.textarea.set_cursor_style(cursor_style);
        prompt.textarea.set_cursor_line_style(Style::default());
        f.render_widget(&prompt.textarea, popup);
    }
}

fn render_alert(f: &mut Frame, app: &App, area: Rect) {
    let Some(text) = app.alert.as_deref() else {
        return;
    };
    let width = 60u16.min(area.width.saturating_sub(4)).max(10);
    let inner_width = usize::from(width.saturating_sub(4));
    let body_rows = wrap_line(&Line::from(text), inner_width).len() as u16;
    let popup = centered_rect(width, body_rows + 4, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.alert_border_style)
        .title(Span::styled(" Attachment ", app.theme.error_text_style));
    let lines = vec![
        Line::from(Span::styled(text.to_string(), app.theme.model_text_style)),
        Line::default(),
        Line::from(Span::styled("Enter or Esc to dismiss", app.theme.timestamp_style)),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .style(app.theme.base_style()),
        popup,
    );
}
