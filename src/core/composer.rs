//! The composer: draft text plus at most one pending image.
//!
//! Key handling follows the chat convention of the rest of the UI: a bare
//! `Enter` sends, `Alt+Enter` or `Shift+Enter` inserts a newline, and
//! everything else is forwarded to the text area.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;
use tui_textarea::{Input as TAInput, TextArea};

use crate::core::message::Attachment;
use crate::utils::image::{human_size, is_image_mime, mime_from_path, parse_data_uri};
use crate::utils::input::sanitize_text_input;

#[derive(Debug)]
pub enum AttachmentError {
    /// The selected file is not declared as an image.
    InvalidAttachment {
        name: String,
        mime_type: Option<String>,
    },

    /// The file could not be read.
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::InvalidAttachment { name, mime_type } => match mime_type {
                Some(mime) => write!(f, "{name} is {mime}, please choose an image file."),
                None => write!(f, "{name} is not a recognised image, please choose an image file."),
            },
            AttachmentError::Read { path, source } => {
                write!(f, "Could not read {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for AttachmentError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AttachmentError::Read { source, .. } => Some(source),
            AttachmentError::InvalidAttachment { .. } => None,
        }
    }
}

/// An image chosen for the next send, not yet encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub name: String,
    pub mime_type: String,
    bytes: Vec<u8>,
}

impl PendingAttachment {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Preview line shown above the input box.
    pub fn preview_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.mime_type, human_size(self.len()))
    }

    fn encode(&self) -> Attachment {
        Attachment::from_bytes(self.mime_type.clone(), &self.bytes)
    }
}

/// Result of feeding one key to the composer.
#[derive(Debug, PartialEq)]
pub enum ComposerEvent {
    /// The user committed a turn.
    Send {
        text: String,
        attachment: Option<Attachment>,
    },
    /// Commit was pressed but there is nothing to send, or a turn is in flight.
    Refused,
    Edited,
}

pub struct Composer {
    textarea: TextArea<'static>,
    pending: Option<PendingAttachment>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
            pending: None,
        }
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn draft_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn draft_line_count(&self) -> usize {
        self.textarea.lines().len()
    }

    pub fn is_draft_blank(&self) -> bool {
        self.textarea.lines().iter().all(|line| line.trim().is_empty())
    }

    pub fn pending_attachment(&self) -> Option<&PendingAttachment> {
        self.pending.as_ref()
    }

    /// Store an image for the next send, replacing any previous one.
    ///
    /// `source` is a file path (optionally quoted, as terminals paste
    /// dropped files) or a `data:image/...;base64,` URI. On error the
    /// pending attachment is left untouched.
    pub fn select_attachment(
        &mut self,
        source: &str,
    ) -> Result<&PendingAttachment, AttachmentError> {
        let source = source.trim().trim_matches(|c| c == '"' || c == '\'');

        let pending = if source.starts_with("data:") {
            load_data_uri(source)?
        } else {
            load_image_file(Path::new(source))?
        };

        debug!(
            name = %pending.name,
            mime = %pending.mime_type,
            bytes = pending.len(),
            "Attachment selected"
        );
        Ok(&*self.pending.insert(pending))
    }

    pub fn clear_attachment(&mut self) {
        self.pending = None;
    }

    pub fn can_send(&self, is_loading: bool) -> bool {
        !is_loading && (!self.is_draft_blank() || self.pending.is_some())
    }

    /// Take the draft and pending image for submission.
    ///
    /// Returns `None` without touching the draft when there is nothing to
    /// send or a turn is already in flight.
    pub fn send(&mut self, is_loading: bool) -> Option<(String, Option<Attachment>)> {
        if !self.can_send(is_loading) {
            return None;
        }

        let text = self.draft_text();
        let attachment = self.pending.take().map(|pending| pending.encode());
        self.textarea = TextArea::default();
        Some((text, attachment))
    }

    pub fn insert_newline(&mut self) {
        self.textarea.insert_newline();
    }

    /// Insert pasted text at the cursor.
    pub fn paste(&mut self, text: &str) {
        self.textarea.insert_str(sanitize_text_input(text));
    }

    pub fn handle_key(&mut self, key: KeyEvent, is_loading: bool) -> ComposerEvent {
        if key.code == KeyCode::Enter {
            if key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) {
                self.insert_newline();
                return ComposerEvent::Edited;
            }
            return match self.send(is_loading) {
                Some((text, attachment)) => ComposerEvent::Send { text, attachment },
                None => ComposerEvent::Refused,
            };
        }

        self.textarea.input(TAInput::from(key));
        ComposerEvent::Edited
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_image_file(path: &Path) -> Result<PendingAttachment, AttachmentError> {
    let name = display_name(path);
    let mime_type = match mime_from_path(path) {
        Some(mime) if is_image_mime(&mime) => mime,
        other => return Err(AttachmentError::InvalidAttachment { name, mime_type: other }),
    };

    let bytes = std::fs::read(path).map_err(|source| AttachmentError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(PendingAttachment {
        name,
        mime_type,
        bytes,
    })
}

fn load_data_uri(uri: &str) -> Result<PendingAttachment, AttachmentError> {
    const NAME: &str = "pasted image";

    let invalid = |mime_type: Option<String>| AttachmentError::InvalidAttachment {
        name: NAME.to_string(),
        mime_type,
    };

    let attachment = parse_data_uri(uri).ok_or_else(|| invalid(None))?;
    if !is_image_mime(&attachment.mime_type) {
        return Err(invalid(Some(attachment.mime_type)));
    }
    let bytes = base64::prelude::BASE64_STANDARD
        .decode(&attachment.data)
        .map_err(|_| invalid(Some(attachment.mime_type.clone())))?;

    Ok(PendingAttachment {
        name: NAME.to_string(),
        mime_type: attachment.mime_type,
        bytes,
    })
}
