use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::utils::image::format_data_uri;

/// Fallback shown in place of a model answer when a turn fails.
pub const TURN_ERROR_TEXT: &str = "I'm sorry, I encountered an error processing your request. \
Please check your connection or API key and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// An image bound to a user turn, carried as base64 text without a
/// `data:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub mime_type: String,
    pub data: String,
}

impl Attachment {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::prelude::BASE64_STANDARD.encode(bytes),
        }
    }

    /// `data:<mime>;base64,<data>`, the display form of the image.
    ///
    /// The wire form is [`data`](Self::data) without the prefix. The
    /// terminal transcript shows a badge instead of the picture, so this is
    /// for consumers that can render inline images.
    pub fn data_uri(&self) -> String {
        format_data_uri(&self.mime_type, &self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::prelude::BASE64_STANDARD.decode(&self.data)
    }

    /// Size of the decoded payload, computed from the encoded length.
    pub fn byte_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    fn new(role: Role, text: String, attachment: Option<Attachment>, is_error: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text,
            timestamp: chrono::Utc::now().timestamp_millis(),
            attachment,
            is_error,
        }
    }

    pub fn user(text: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self::new(Role::User, text.into(), attachment, false)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text.into(), None, false)
    }

    pub fn model_error() -> Self {
        Self::new(Role::Model, TURN_ERROR_TEXT.to_string(), None, true)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Local wall-clock time as `HH:MM`.
    pub fn time_label(&self) -> String {
        use chrono::{Local, TimeZone};

        match Local.timestamp_millis_opt(self.timestamp).single() {
            Some(time) => time.format("%H:%M").to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_assign_fresh_ids() {
        let first = Message::user("Hello", None);
        let second = Message::user("Hello", None);
        assert_ne!(first.id, second.id);
        assert!(first.timestamp > 0);
    }

    #[test]
    fn model_error_carries_fixed_text() {
        let message = Message::model_error();
        assert_eq!(message.role, Role::Model);
        assert!(message.is_error);
        assert_eq!(message.text, TURN_ERROR_TEXT);
    }

    #[test]
    fn attachment_round_trips_through_data_uri() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let attachment = Attachment::from_bytes("image/jpeg", &bytes);

        let uri = attachment.data_uri();
        assert!(uri.starts_with("data:image/jpeg;base64,"));

        let parsed = crate::utils::image::parse_data_uri(&uri).expect("valid data uri");
        assert_eq!(parsed.mime_type, "image/jpeg");
        assert_eq!(parsed.decode().unwrap(), bytes);
    }

    #[test]
    fn byte_len_accounts_for_padding() {
        for len in 0..8 {
            let bytes = vec![7u8; len];
            assert_eq!(Attachment::from_bytes("image/png", &bytes).byte_len(), len);
        }
    }

    #[test]
    fn serialises_with_camel_case_fields() {
        let mut message = Message::user("hi", Some(Attachment::from_bytes("image/png", b"x")));
        message.id = "fixed".into();
        message.timestamp = 1;
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["attachment"]["mimeType"], "image/png");
        assert_eq!(json["isError"], false);
    }
}
