// SPDX-License-Identifier: MIT

//! Text generation client - the contract the blog workflow relies on
//!
//! Two kinds of calls are offered:
//! - `generate` returns free-form text
//! - `generate_json` returns a JSON object constrained by a schema
//!
//! `generate_structured::<T>()` layers typed decoding on top of
//! `generate_json`. A response that does not fit `T` fails with
//! [`ModelError::StructuredOutput`], distinct from transport failures.

use crate::adk::error::{BlogsmithError, ModelError};
use crate::adk::model::{Content, GenerationConfig, Model};
use crate::adk::output::extract_json_object;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// A statically declared result type for structured generation.
pub trait StructuredOutput: DeserializeOwned + Send + 'static {
    /// Name used in prompts, logs and errors
    const NAME: &'static str;

    /// JSON Schema describing the expected object
    fn schema() -> &'static Value;
}

/// Client for a text-generation service
#[async_trait]
pub trait TextGenerationClient: Send + Sync {
    /// Generate free-form text for the prompt
    async fn generate(&self, prompt: &str) -> Result<String, BlogsmithError>;

    /// Generate a JSON object conforming to `schema`
    async fn generate_json(
        &self,
        prompt: &str,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value, BlogsmithError>;
}

impl dyn TextGenerationClient {
    /// Generate and decode a value of a statically declared result type
    pub async fn generate_structured<T: StructuredOutput>(
        &self,
        prompt: &str,
    ) -> Result<T, BlogsmithError> {
        let value = self.generate_json(prompt, T::NAME, T::schema()).await?;
        serde_json::from_value(value).map_err(|e| {
            ModelError::StructuredOutput {
                schema: T::NAME.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// [`TextGenerationClient`] backed by a chat [`Model`]
pub struct ModelClient {
    model: Arc<dyn Model>,
    config: GenerationConfig,
}

impl ModelClient {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self {
            model,
            config: GenerationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl TextGenerationClient for ModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, BlogsmithError> {
        let history = [Content::user(prompt)];
        let response = self
            .model
            .generate_content(&history, Some(&self.config))
            .await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse.into());
        }
        Ok(text)
    }

    async fn generate_json(
        &self,
        prompt: &str,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value, BlogsmithError> {
        let history = [Content::user(prompt)];
        let config = self.config.with_response_schema(schema.clone());
        let response = self.model.generate_content(&history, Some(&config)).await?;

        let text = response.text();
        log::debug!(
            "{} structured response for {}: {}",
            self.model.provider(),
            schema_name,
            text
        );

        extract_json_object(&text).ok_or_else(|| {
            ModelError::StructuredOutput {
                schema: schema_name.to_string(),
                message: "response did not contain a JSON object".to_string(),
            }
            .into()
        })
    }
}
