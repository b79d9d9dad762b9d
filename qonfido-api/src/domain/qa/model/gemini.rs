//! Gemini answer model using the genai crate.

use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};

use crate::domain::qa::traits::{AnswerModel, QaError, Result};

/// Default Gemini chat model.
pub const GEMINI_CHAT_MODEL: &str = "gemini-2.5-flash";
const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// [`AnswerModel`] backed by Google's Gemini chat API.
///
/// The genai client reads `GEMINI_API_KEY` from the environment.
#[derive(Clone)]
pub struct GeminiAnswerModel {
    client: genai::Client,
    model: String,
    options: ChatOptions,
}

impl GeminiAnswerModel {
    /// Creates a model, failing if no API key is configured.
    pub fn new(model: impl Into<String>, temperature: f64) -> Result<Self> {
        if std::env::var(API_KEY_VAR).map_or(true, |key| key.trim().is_empty()) {
            return Err(QaError::Configuration(format!(
                "{} not found in environment",
                API_KEY_VAR
            )));
        }

        Ok(Self {
            client: genai::Client::default(),
            model: model.into(),
            options: ChatOptions::default().with_temperature(temperature),
        })
    }

    #[allow(dead_code)]
    pub fn with_defaults() -> Result<Self> {
        Self::new(GEMINI_CHAT_MODEL, 0.0)
    }
}

#[async_trait]
impl AnswerModel for GeminiAnswerModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        let response = self
            .client
            .exec_chat(self.model.as_str(), request, Some(&self.options))
            .await
            .map_err(|e| QaError::Synthesis(e.to_string()))?;

        response
            .first_text()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_owned)
            .ok_or_else(|| QaError::Synthesis("No text in model response".into()))
    }
}
