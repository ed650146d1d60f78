//! Ephemeral per-call request value.

use serde::{Deserialize, Serialize};

use super::message::{Message, ResponseFormat};

/// A logical call against a configured feature.
///
/// Only `feature_code` is required. Explicit fields here override feature
/// defaults during settings resolution (see [`crate::config`]). Content can
/// be supplied either as full chat `messages` or as a bare `prompt`; a bare
/// prompt is sent as a single user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    pub feature_code: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl CallRequest {
    pub fn new(feature_code: impl Into<String>) -> Self {
        Self {
            feature_code: feature_code.into(),
            messages: Vec::new(),
            prompt: None,
            model: None,
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Materialize the message list: explicit messages win, otherwise the
    /// bare prompt becomes a single user message.
    pub(crate) fn effective_messages(&self) -> Vec<Message> {
        if !self.messages.is_empty() {
            return self.messages.clone();
        }
        match &self.prompt {
            Some(p) => vec![Message::user(p.clone())],
            None => Vec::new(),
        }
    }
}
