//! Conversation state: the ordered message list and the single
//! request-in-flight flag.
//!
//! The controller never talks to the network itself. [`submit_user_message`]
//! records the user turn and hands back a [`TurnRequest`]; whoever runs the
//! gateway reports the outcome through [`complete_turn`].
//!
//! [`submit_user_message`]: ConversationController::submit_user_message
//! [`complete_turn`]: ConversationController::complete_turn

use tracing::{error, info, warn};

use crate::core::gateway::{GatewayError, ModelGateway};
use crate::core::message::{Attachment, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingResponse,
}

/// Work order for one gateway call.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRequest {
    pub turn_id: u64,
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl TurnRequest {
    pub async fn execute(&self, gateway: &ModelGateway) -> Result<String, GatewayError> {
        gateway.generate(&self.text, self.attachment.as_ref()).await
    }
}

#[derive(Debug, Default)]
pub struct ConversationController {
    messages: Vec<Message>,
    in_flight: Option<u64>,
    next_turn_id: u64,
}

impl ConversationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn state(&self) -> TurnState {
        if self.is_loading() {
            TurnState::AwaitingResponse
        } else {
            TurnState::Idle
        }
    }

    /// Append the user turn and enter `AwaitingResponse`.
    ///
    /// Callers gate on [`is_loading`](Self::is_loading); the composer never
    /// emits a second send while a turn is outstanding.
    pub fn submit_user_message(
        &mut self,
        text: String,
        attachment: Option<Attachment>,
    ) -> TurnRequest {
        self.next_turn_id += 1;
        let turn_id = self.next_turn_id;

        self.messages.push(Message::user(text.clone(), attachment.clone()));
        self.in_flight = Some(turn_id);

        info!(
            turn_id,
            has_image = attachment.is_some(),
            "Submitted user message"
        );

        TurnRequest {
            turn_id,
            text,
            attachment,
        }
    }

    /// Record the outcome of a turn and return to `Idle`.
    ///
    /// Failures of any kind become one generic error entry; the detail only
    /// goes to the diagnostic log. Outcomes for a turn that is not in flight
    /// are dropped.
    pub fn complete_turn(
        &mut self,
        turn_id: u64,
        result: Result<String, GatewayError>,
    ) -> Option<&Message> {
        if self.in_flight != Some(turn_id) {
            warn!(turn_id, in_flight = ?self.in_flight, "Dropping outcome for inactive turn");
            return None;
        }

        let message = match result {
            Ok(text) => {
                info!(turn_id, answer_len = text.len(), "Model answered");
                Message::model(text)
            }
            Err(err) => {
                error!(turn_id, error = %err, "Turn failed");
                Message::model_error()
            }
        };

        self.messages.push(message);
        self.in_flight = None;
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gateway::TransportError;
    use crate::core::message::{Role, TURN_ERROR_TEXT};

    fn roles(controller: &ConversationController) -> Vec<Role> {
        controller.messages().iter().map(|m| m.role).collect()
    }

    #[test]
    fn submit_appends_user_message_and_sets_loading() {
        let mut controller = ConversationController::new();
        let request = controller.submit_user_message("Hello".into(), None);

        assert_eq!(request.text, "Hello");
        assert_eq!(controller.state(), TurnState::AwaitingResponse);
        assert_eq!(controller.messages().len(), 1);
        assert!(controller.messages()[0].is_user());
    }

    #[test]
    fn success_appends_model_message_and_clears_loading() {
        let mut controller = ConversationController::new();
        let request = controller.submit_user_message("Hello".into(), None);

        let reply = controller
            .complete_turn(request.turn_id, Ok("Hi there!".into()))
            .cloned()
            .expect("turn is in flight");

        assert_eq!(reply.role, Role::Model);
        assert_eq!(reply.text, "Hi there!");
        assert!(!reply.is_error);
        assert_eq!(controller.state(), TurnState::Idle);
    }

    #[test]
    fn failure_appends_generic_error() {
        let mut controller = ConversationController::new();
        let request = controller.submit_user_message("Hello".into(), None);

        controller.complete_turn(
            request.turn_id,
            Err(GatewayError::Transport(TransportError::MissingApiKey)),
        );

        let last = controller.messages().last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.text, TURN_ERROR_TEXT);
        assert!(!controller.is_loading());
    }

    #[test]
    fn turns_alternate_user_and_model() {
        let mut controller = ConversationController::new();
        let turns = [
            ("one", Ok("1".to_string())),
            ("two", Err(GatewayError::EmptyResponse)),
            ("three", Ok("3".to_string())),
        ];
        for (prompt, answer) in turns {
            let request = controller.submit_user_message(prompt.into(), None);
            controller.complete_turn(request.turn_id, answer);
        }

        assert_eq!(
            roles(&controller),
            vec![Role::User, Role::Model, Role::User, Role::Model, Role::User, Role::Model]
        );
        assert!(controller.messages()[3].is_error);
    }

    #[test]
    fn stale_outcomes_are_ignored() {
        let mut controller = ConversationController::new();
        let first = controller.submit_user_message("one".into(), None);
        controller.complete_turn(first.turn_id, Ok("1".into()));

        assert!(controller
            .complete_turn(first.turn_id, Ok("again".into()))
            .is_none());
        assert_eq!(controller.messages().len(), 2);
    }

    #[test]
    fn user_attachment_is_kept_verbatim() {
        let mut controller = ConversationController::new();
        let attachment = Attachment::from_bytes("image/jpeg", b"\xff\xd8\xff");
        let request = controller.submit_user_message(String::new(), Some(attachment.clone()));

        assert_eq!(request.attachment.as_ref(), Some(&attachment));
        assert_eq!(controller.messages()[0].attachment.as_ref(), Some(&attachment));
    }
}
