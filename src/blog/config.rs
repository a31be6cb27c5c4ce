// SPDX-License-Identifier: MIT

//! Application configuration
//!
//! Configuration is read from an optional YAML file; every field has a
//! default so an empty file (or no file) is valid. A few environment
//! variables override the file for quick experiments.

use crate::adk::error::BlogsmithError;
use crate::adk::model::openai::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::adk::model::GenerationConfig;
use crate::blog::language::{default_languages, Language, LanguageRegistry};
use crate::blog::workflow::graph::Usecase;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelSettings,
    pub workflow: WorkflowSettings,
    /// Translation targets; replaces the built-in list when present
    pub languages: Vec<Language>,
    /// Directory generated posts are written to
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            workflow: WorkflowSettings::default(),
            languages: default_languages(),
            output_dir: PathBuf::from("blogs"),
        }
    }
}

impl AppConfig {
    pub fn language_registry(&self) -> LanguageRegistry {
        LanguageRegistry::new(self.languages.iter().cloned())
    }

    /// Apply `BLOGSMITH_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(model) = env::var("BLOGSMITH_MODEL") {
            self.model.model_name = model;
        }
        if let Ok(base_url) = env::var("BLOGSMITH_BASE_URL") {
            self.model.base_url = base_url;
        }
        if let Ok(dir) = env::var("BLOGSMITH_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
    }

    /// Reject values the workflow cannot run with
    pub fn validate(&self) -> Result<(), BlogsmithError> {
        if self.model.model_name.trim().is_empty() {
            return Err(BlogsmithError::config("model.model_name must not be empty"));
        }
        if self.workflow.target_words == 0 {
            return Err(BlogsmithError::config(
                "workflow.target_words must be greater than zero",
            ));
        }
        if self.workflow.call_timeout_secs == 0 {
            return Err(BlogsmithError::config(
                "workflow.call_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Text-generation provider settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelSettings {
    pub provider: String,
    pub model_name: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl ModelSettings {
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            ..Default::default()
        }
    }
}

/// Workflow behaviour settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowSettings {
    pub usecase: Usecase,
    /// Approximate length of the generated post
    pub target_words: u32,
    /// Upper bound for each generation call
    pub call_timeout_secs: u64,
    /// Paragraph translations in flight at once (1 = sequential)
    pub translation_concurrency: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            usecase: Usecase::Language,
            target_words: 500,
            call_timeout_secs: 60,
            translation_concurrency: 4,
        }
    }
}

impl WorkflowSettings {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// Loads [`AppConfig`] from YAML files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<AppConfig, BlogsmithError> {
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn parse_yaml(content: &str) -> Result<AppConfig, BlogsmithError> {
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
