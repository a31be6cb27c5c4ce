// SPDX-License-Identifier: MIT

use super::Step;
use crate::adk::client::TextGenerationClient;
use crate::adk::error::{BlogsmithError, WorkflowError};
use crate::blog::workflow::context::RunContext;
use crate::blog::workflow::state::{StatePatch, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

fn content_prompt(topic: &str, title: &str, target_words: u32) -> String {
    format!(
        "You are an expert blog writer. Use Markdown formatting.\n\
         Write a blog post of about {target_words} words on the topic: {topic}.\n\
         The post is titled \"{title}\"; do not repeat the title as a heading.\n\
         Give the topic a detailed, clearly structured breakdown with section headings.\n\
         Separate paragraphs with a blank line."
    )
}

/// Generates the Markdown body for an already-titled post.
///
/// Requires the title step to have run: a missing title is fatal.
pub struct ContentStep {
    client: Arc<dyn TextGenerationClient>,
    target_words: u32,
}

impl ContentStep {
    pub fn new(client: Arc<dyn TextGenerationClient>, target_words: u32) -> Self {
        Self {
            client,
            target_words,
        }
    }
}

#[async_trait]
impl Step for ContentStep {
    fn name(&self) -> &str {
        "content"
    }

    async fn run(
        &self,
        state: &WorkflowState,
        ctx: &RunContext,
    ) -> Result<StatePatch, BlogsmithError> {
        let topic = state.topic();
        if topic.trim().is_empty() {
            return Ok(StatePatch::empty());
        }
        let title = state.title().ok_or(WorkflowError::MissingTitle)?;

        log::info!("[run {}] Generating content for topic: {}", ctx.run_id(), topic);
        let prompt = content_prompt(topic, title, self.target_words);
        let content = ctx
            .bounded(self.name(), self.client.generate(&prompt))
            .await?;

        log::info!(
            "[run {}] Generated content ({} chars)",
            ctx.run_id(),
            content.len()
        );
        Ok(StatePatch::content(content.trim()))
    }
}
