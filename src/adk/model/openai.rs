// SPDX-License-Identifier: MIT

//! OpenAI-compatible Model - chat completions API implementation
//!
//! Works against any endpoint that speaks the OpenAI chat completions
//! protocol. The defaults target Groq's hosted Llama models.

use super::{Content, GenerationConfig, Model, Part};
use crate::adk::error::{BlogsmithError, ModelError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// OpenAI-compatible chat model implementation
pub struct OpenAIModel {
    client: Client,
    provider: String,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl OpenAIModel {
    /// Create a new model against the default Groq endpoint
    ///
    /// Requires `GROQ_API_KEY` environment variable to be set.
    pub fn new(model_name: String) -> Result<Self, BlogsmithError> {
        Self::with_endpoint("groq", model_name, DEFAULT_BASE_URL, DEFAULT_API_KEY_ENV)
    }

    /// Create a model against a custom OpenAI-compatible endpoint, reading
    /// the API key from `api_key_env`.
    pub fn with_endpoint(
        provider: impl Into<String>,
        model_name: String,
        base_url: impl Into<String>,
        api_key_env: &str,
    ) -> Result<Self, BlogsmithError> {
        let api_key = env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::ApiKeyMissing(api_key_env.to_string()))?;

        Ok(Self {
            client: Client::new(),
            provider: provider.into(),
            api_key,
            model_name,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Convert internal Content to OpenAI message format
    fn content_to_openai_message(content: &Content) -> serde_json::Value {
        let role = match content.role.as_str() {
            "system" => "system",
            "user" => "user",
            "model" => "assistant",
            other => other,
        };

        let text_content: String = content
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Thinking(_) => None,
            })
            .collect();

        json!({
            "role": role,
            "content": text_content
        })
    }

    /// Build the request body for a chat completion
    fn build_request_body(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = history
            .iter()
            .map(Self::content_to_openai_message)
            .collect();

        if let Some(schema) = config.and_then(|c| c.response_schema.as_ref()) {
            // JSON mode only guarantees syntax, so the schema travels in the prompt
            messages.insert(
                0,
                json!({
                    "role": "system",
                    "content": format!(
                        "Respond ONLY with a single JSON object that validates against this JSON Schema. \
                         Do not add any other text.\n{}",
                        schema
                    )
                }),
            );
        }

        let mut body = json!({
            "model": self.model_name,
            "messages": messages
        });

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                body["temperature"] = json!(temp);
            }
            if let Some(max_tokens) = cfg.max_output_tokens {
                body["max_tokens"] = json!(max_tokens);
            }
            if let Some(top_p) = cfg.top_p {
                body["top_p"] = json!(top_p);
            }
            if cfg.response_schema.is_some() {
                body["response_format"] = json!({ "type": "json_object" });
            }
        }

        body
    }

    /// Parse OpenAI response into Content
    fn parse_openai_response(response: &serde_json::Value) -> Result<Content, BlogsmithError> {
        let choice = response["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| ModelError::InvalidResponse("no choices in response".to_string()))?;

        let message = &choice["message"];
        let mut parts = Vec::new();

        if let Some(reasoning) = message["reasoning"].as_str() {
            if !reasoning.is_empty() {
                parts.push(Part::Thinking(reasoning.to_string()));
            }
        }

        if let Some(content) = message["content"].as_str() {
            if !content.is_empty() {
                parts.push(Part::Text(content.to_string()));
            }
        }

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }
}

#[async_trait]
impl Model for OpenAIModel {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, BlogsmithError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(history, config);

        log::debug!(
            "{} request body: {}",
            self.provider,
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await?;
            return Err(BlogsmithError::api(
                self.provider.clone(),
                format!("{}: {}", status, text),
            ));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        log::debug!("{} response: {}", self.provider, resp_json);

        Self::parse_openai_response(&resp_json)
    }
}
