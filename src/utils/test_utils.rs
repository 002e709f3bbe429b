use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{GenerateContentRequest, GenerateContentResponse};
use crate::core::app::{App, AppSettings};
use crate::core::gateway::{ModelBackend, ModelGateway, TransportError, DEFAULT_MODEL};
use crate::ui::theme::Theme;

/// Canned answer for [`ScriptedBackend`].
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Text(&'static str),
    Empty,
    Fail,
}

/// In-memory backend that records every request it receives.
pub struct ScriptedBackend {
    reply: Reply,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedBackend {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.reply {
            Reply::Text(text) => Ok(serde_json::from_value(serde_json::json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
            }))
            .unwrap()),
            Reply::Empty => Ok(GenerateContentResponse::default()),
            Reply::Fail => Err(TransportError::Status {
                status: 503,
                summary: "backend unavailable".into(),
            }),
        }
    }
}

pub fn scripted_gateway(reply: Reply) -> (Arc<ScriptedBackend>, ModelGateway) {
    let backend = ScriptedBackend::new(reply);
    let gateway = ModelGateway::new(backend.clone(), DEFAULT_MODEL);
    (backend, gateway)
}

pub fn create_test_app() -> App {
    App::new(AppSettings {
        model: DEFAULT_MODEL.to_string(),
        theme: Theme::dark_default(),
        markdown_enabled: true,
        syntax_enabled: false,
    })
}
