// SPDX-License-Identifier: MIT

use super::Step;
use crate::adk::client::TextGenerationClient;
use crate::adk::error::{BlogsmithError, ModelError};
use crate::blog::workflow::context::RunContext;
use crate::blog::workflow::state::{StatePatch, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

const QUOTES: &[char] = &['"', '\'', '`', '“', '”', '‘', '’', '«', '»'];

/// Strip surrounding whitespace and quote characters from a generated title
pub fn clean_title(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || QUOTES.contains(&c))
        .to_string()
}

fn title_prompt(topic: &str) -> String {
    format!(
        "You are an expert blog content writer. Generate one blog title for the topic: {topic}.\n\
         The title must be creative and SEO friendly.\n\
         Reply with the title text only: no quotation marks, no Markdown, no explanation."
    )
}

/// Generates the blog title from the topic
pub struct TitleStep {
    client: Arc<dyn TextGenerationClient>,
}

impl TitleStep {
    pub fn new(client: Arc<dyn TextGenerationClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Step for TitleStep {
    fn name(&self) -> &str {
        "title"
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

        log::info!("[run {}] Generating title for topic: {}", ctx.run_id(), topic);
        let raw = ctx
            .bounded(self.name(), self.client.generate(&title_prompt(topic)))
            .await?;

        let title = clean_title(&raw);
        if title.is_empty() {
            return Err(ModelError::InvalidResponse(format!(
                "title was empty after cleanup (raw: {:?})",
                raw
            ))
            .into());
        }

        log::info!("[run {}] Generated title: {}", ctx.run_id(), title);
        Ok(StatePatch::title(title))
    }
}
