// SPDX-License-Identifier: MIT

//! Workflow state and the patch-merge rule
//!
//! Each step reads the state and returns a [`StatePatch`]. The graph folds
//! patches into the state with [`WorkflowState::apply`]: a patch overwrites
//! exactly the fields it carries and leaves every other field alone. The
//! topic and the target language are fixed at construction.

use crate::adk::error::BlogsmithError;
use crate::blog::language::normalize_language;
use serde::{Deserialize, Serialize};

/// The finished blog record handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub title: String,
    pub content: String,
}

/// State threaded through the blog workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowState {
    topic: String,
    target_language: Option<String>,
    title: Option<String>,
    content: Option<String>,
}

impl WorkflowState {
    /// Create the initial state for a request.
    ///
    /// Fails with [`BlogsmithError::InvalidRequest`] when the topic is blank.
    /// The language is normalized; a blank language means no translation.
    pub fn new(topic: &str, target_language: Option<&str>) -> Result<Self, BlogsmithError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(BlogsmithError::invalid_request(
                "Topic is required to generate a blog.",
            ));
        }

        let target_language = target_language
            .map(normalize_language)
            .filter(|l| !l.is_empty());

        Ok(Self {
            topic: topic.to_string(),
            target_language,
            title: None,
            content: None,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn target_language(&self) -> Option<&str> {
        self.target_language.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// The blog record once both title and content exist
    pub fn blog(&self) -> Option<Blog> {
        match (&self.title, &self.content) {
            (Some(title), Some(content)) => Some(Blog {
                title: title.clone(),
                content: content.clone(),
            }),
            _ => None,
        }
    }

    /// Copy of this state with the target language cleared
    pub fn without_language(mut self) -> Self {
        self.target_language = None;
        self
    }

    /// Merge a patch into the state
    pub fn apply(mut self, patch: StatePatch) -> Self {
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(content) = patch.content {
            self.content = Some(content);
        }
        self
    }
}

/// Partial update produced by a step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl StatePatch {
    /// A patch that changes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}
