//! Key and mouse routing.
//!
//! Overlays take input first: the alert popup swallows everything but its
//! dismiss keys, then the attachment prompt. Transcript navigation keys are
//! checked next, and anything left goes to the composer.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use tui_textarea::Input as TAInput;

use crate::core::app::App;
use crate::core::conversation::TurnRequest;

const WHEEL_STEP: u16 = 3;

fn is_ctrl(key: &KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(ch)
}

/// Apply one key press. Returns the turn to dispatch when the key sent a
/// message.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<TurnRequest> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_ctrl(&key, 'c') {
        app.request_exit();
        return None;
    }

    if app.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_alert();
        }
        return None;
    }

    if app.attach_prompt.is_some() {
        match key.code {
            KeyCode::Enter => {
                app.confirm_attach_prompt();
            }
            KeyCode::Esc => app.cancel_attach_prompt(),
            _ => {
                if let Some(prompt) = app.attach_prompt.as_mut() {
                    prompt.textarea.input(TAInput::from(key));
                }
            }
        }
        return None;
    }

    if is_ctrl(&key, 'o') {
        app.open_attach_prompt();
        return None;
    }
    if is_ctrl(&key, 'x') {
        app.clear_attachment();
        return None;
    }

    let draft_empty = app.composer.draft_text().is_empty();
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::PageUp => app.transcript.page_up(),
        KeyCode::PageDown => app.transcript.page_down(),
        KeyCode::Up if draft_empty => app.transcript.scroll_up(1),
        KeyCode::Down if draft_empty => app.transcript.scroll_down(1),
        KeyCode::Home if draft_empty || ctrl => app.transcript.scroll_to_top(),
        KeyCode::End if draft_empty || ctrl => app.transcript.scroll_to_bottom(),
        KeyCode::Esc => {}
        _ => return app.handle_composer_key(key),
    }
    None
}

pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.transcript.scroll_up(WHEEL_STEP),
        MouseEventKind::ScrollDown => app.transcript.scroll_down(WHEEL_STEP),
        _ => {}
    }
}
