//! Client for the Gemini `generateContent` API.
//!
//! Two call shapes: [`Gemini::generate_grounded`] for free-form text
//! with Google Maps grounding enabled, and [`Gemini::generate_json`]
//! for responses constrained to a JSON schema. Grounded output is
//! free-form by nature; [`util`] has the helpers that dig structured
//! payloads back out of it.

mod client;
pub mod error;
pub mod types;
pub mod util;

pub use error::{GeminiError, Result};

use client::GeminiHttp;
use types::{GenerateContentRequest, GenerationConfig, Tool};

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> GeminiHttp {
        let client = GeminiHttp::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Free-form generation grounded against live Google Maps data.
    /// Returns the full response text; callers parse what they need.
    pub async fn generate_grounded(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<String> {
        let request = GenerateContentRequest::new(user_prompt)
            .system(system_prompt)
            .tool(Tool::google_maps());

        let response = self.client().generate(&self.model, &request).await?;
        response.text().ok_or(GeminiError::EmptyResponse)
    }

    /// Generation constrained to JSON matching `schema`
    /// (`responseMimeType: application/json`). Grounding tools cannot
    /// be combined with a response schema, so this is ungrounded.
    pub async fn generate_json(
        &self,
        user_prompt: impl Into<String>,
        schema: serde_json::Value,
    ) -> Result<String> {
        let request =
            GenerateContentRequest::new(user_prompt).generation_config(GenerationConfig::json(schema));

        let response = self.client().generate(&self.model, &request).await?;
        response.text().ok_or(GeminiError::EmptyResponse)
    }
}
