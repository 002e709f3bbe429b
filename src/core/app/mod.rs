//! Application state for one chat session.
//!
//! [`App`] is owned by the event loop and lent to the renderer each frame.
//! It ties the conversation controller to the composer and keeps the view
//! state (scroll position, alert popup, attachment prompt) that only the
//! terminal UI cares about.

use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, warn};

use crate::core::composer::{Composer, ComposerEvent};
use crate::core::config::Config;
use crate::core::conversation::{ConversationController, TurnRequest};
use crate::core::gateway::GatewayError;
use crate::core::message::{Attachment, Message};
use crate::ui::theme::Theme;
use crate::ui::transcript::TranscriptCache;

pub mod ui_state;

pub use ui_state::{AttachPrompt, Pulse, TranscriptView};

/// Display settings resolved from config and command-line flags.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub model: String,
    pub theme: Theme,
    pub markdown_enabled: bool,
    pub syntax_enabled: bool,
}

impl AppSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model().to_string(),
            theme: Theme::from_name(config.theme_name()),
            markdown_enabled: config.markdown_enabled(),
            syntax_enabled: config.syntax_enabled(),
        }
    }
}

pub struct App {
    pub conversation: ConversationController,
    pub composer: Composer,
    pub transcript: TranscriptView,
    pub theme: Theme,
    pub model: String,
    pub markdown_enabled: bool,
    pub syntax_enabled: bool,
    /// Blocking popup text; input is swallowed until it is dismissed.
    pub alert: Option<String>,
    pub attach_prompt: Option<AttachPrompt>,
    pub pulse: Pulse,
    pub exit_requested: bool,
    pub(crate) render_cache: TranscriptCache,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            conversation: ConversationController::new(),
            composer: Composer::new(),
            transcript: TranscriptView::default(),
            theme: settings.theme,
            model: settings.model,
            markdown_enabled: settings.markdown_enabled,
            syntax_enabled: settings.syntax_enabled,
            alert: None,
            attach_prompt: None,
            pulse: Pulse::default(),
            exit_requested: false,
            render_cache: TranscriptCache::default(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn is_loading(&self) -> bool {
        self.conversation.is_loading()
    }

    /// Feed a key to the composer. Returns the turn to dispatch when the key
    /// committed a send.
    pub fn handle_composer_key(&mut self, key: KeyEvent) -> Option<TurnRequest> {
        match self.composer.handle_key(key, self.is_loading()) {
            ComposerEvent::Send { text, attachment } => Some(self.submit(text, attachment)),
            ComposerEvent::Refused => {
                debug!(loading = self.is_loading(), "Send refused");
                None
            }
            ComposerEvent::Edited => None,
        }
    }

    /// Send the current draft, if the composer allows it.
    pub fn send(&mut self) -> Option<TurnRequest> {
        let (text, attachment) = self.composer.send(self.is_loading())?;
        Some(self.submit(text, attachment))
    }

    fn submit(&mut self, text: String, attachment: Option<Attachment>) -> TurnRequest {
        let request = self.conversation.submit_user_message(text, attachment);
        self.pulse.restart();
        self.transcript.follow();
        request
    }

    /// Apply a gateway outcome. Returns `false` when the outcome was stale.
    pub fn complete_turn(&mut self, turn_id: u64, result: Result<String, GatewayError>) -> bool {
        self.conversation.complete_turn(turn_id, result).is_some()
    }

    pub fn open_attach_prompt(&mut self) {
        if self.attach_prompt.is_none() {
            self.attach_prompt = Some(AttachPrompt::new());
        }
    }

    pub fn cancel_attach_prompt(&mut self) {
        self.attach_prompt = None;
    }

    /// Close the prompt and try to attach what was typed. A blank prompt just
    /// closes.
    pub fn confirm_attach_prompt(&mut self) -> bool {
        let Some(prompt) = self.attach_prompt.take() else {
            return false;
        };
        let value = prompt.value();
        if value.trim().is_empty() {
            return false;
        }
        self.select_attachment(&value)
    }

    /// Attach an image for the next send. Failures raise the alert popup and
    /// leave the current attachment in place.
    pub fn select_attachment(&mut self, source: &str) -> bool {
        match self.composer.select_attachment(source) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "Attachment rejected");
                self.alert = Some(err.to_string());
                false
            }
        }
    }

    pub fn clear_attachment(&mut self) {
        self.composer.clear_attachment();
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Route bracketed paste to the prompt when it is open, otherwise to the
    /// draft.
    pub fn paste(&mut self, text: &str) {
        match self.attach_prompt.as_mut() {
            Some(prompt) => {
                let single_line = text.replace(['\r', '\n'], "");
                prompt.textarea.insert_str(single_line);
            }
            None => self.composer.paste(text),
        }
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}
