// SPDX-License-Identifier: MIT

//! Typed error handling for blogsmith-rs
//!
//! Errors fall into two classes at the request boundary: client errors
//! (bad input, rejected before the workflow starts) and service errors
//! (the text-generation backend failed or timed out). Translation sub-call
//! failures never reach this type's callers; they are absorbed as fallbacks.

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for blogsmith-rs
#[derive(Debug, Error)]
pub enum BlogsmithError {
    /// API errors from the text-generation provider
    #[error("API error from {provider}: {message}")]
    Api { provider: String, message: String },

    /// Invalid request payload (missing topic, bad usecase, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generation call exceeded the caller-supplied timeout
    #[error("{step} timed out after {after:?}")]
    Timeout { step: String, after: Duration },

    /// Workflow-specific errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Model/LLM-specific errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Generic error wrapper for compatibility
    #[error("{0}")]
    Other(String),
}

/// Workflow-specific errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Content generation requires a title produced by the title step
    #[error("Cannot generate content: blog title is missing")]
    MissingTitle,

    /// The graph finished without producing blog content
    #[error("Workflow finished without blog content")]
    MissingContent,

    /// Unknown graph build mode
    #[error("Unknown usecase: {0} (expected 'topic' or 'language')")]
    UnknownUsecase(String),
}

/// Model/LLM-specific errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// API key not configured
    #[error("API key not configured: {0} is not set")]
    ApiKeyMissing(String),

    /// Invalid response from model
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    /// The model returned no text at all
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Structured output did not match the requested schema
    #[error("Structured output for '{schema}' rejected: {message}")]
    StructuredOutput { schema: String, message: String },
}

impl BlogsmithError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a timeout error for the named step
    pub fn timeout(step: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            step: step.into(),
            after,
        }
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// True when the caller sent a bad request rather than the backend failing
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::Workflow(WorkflowError::UnknownUsecase(_))
        )
    }

    /// HTTP-style status class: 400 for client errors, 503 otherwise
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            503
        }
    }
}

impl From<&str> for BlogsmithError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for BlogsmithError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}
