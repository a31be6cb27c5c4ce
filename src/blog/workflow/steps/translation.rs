// SPDX-License-Identifier: MIT

//! Translation step - paragraph-level translation with per-unit fallback
//!
//! The title and every paragraph are translated by independent structured
//! generation calls. A failed call (error, timeout, schema mismatch, blank
//! result) never fails the step: that unit keeps its original text.
//! Paragraph calls may run concurrently; results are placed by index so the
//! output keeps the input's paragraph order and count.

use super::title::clean_title;
use super::Step;
use crate::adk::client::{StructuredOutput, TextGenerationClient};
use crate::adk::error::BlogsmithError;
use crate::blog::language::Language;
use crate::blog::workflow::context::{FallbackUnit, RunContext, WorkflowEvent};
use crate::blog::workflow::state::{StatePatch, WorkflowState};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Structured result of a title translation
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TitleResult {
    /// The translated title
    pub title: String,
}

/// Structured result of a paragraph translation
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ParagraphResult {
    /// The translated paragraph, Markdown preserved
    pub content: String,
}

static TITLE_RESULT_SCHEMA: Lazy<Value> =
    Lazy::new(|| serde_json::to_value(schema_for!(TitleResult)).unwrap_or_default());

static PARAGRAPH_RESULT_SCHEMA: Lazy<Value> =
    Lazy::new(|| serde_json::to_value(schema_for!(ParagraphResult)).unwrap_or_default());

impl StructuredOutput for TitleResult {
    const NAME: &'static str = "TitleResult";

    fn schema() -> &'static Value {
        &TITLE_RESULT_SCHEMA
    }
}

impl StructuredOutput for ParagraphResult {
    const NAME: &'static str = "ParagraphResult";

    fn schema() -> &'static Value {
        &PARAGRAPH_RESULT_SCHEMA
    }
}

/// Split Markdown content into trimmed, non-empty paragraphs.
///
/// Any line that is empty after trimming ends a paragraph, so whitespace-only
/// separator lines and CRLF line endings split the same way as `"\n\n"`.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in content.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            lines.push(line);
            continue;
        }
        let paragraph = lines.join("\n");
        let paragraph = paragraph.trim();
        if !paragraph.is_empty() {
            paragraphs.push(paragraph.to_string());
        }
        lines.clear();
    }
    paragraphs
}

pub fn join_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// Normalize a translated paragraph to a single unit: blank lines inside it
/// would change the paragraph count on reassembly.
fn as_single_paragraph(text: &str) -> Option<String> {
    let unit = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let unit = unit.trim();
    if unit.is_empty() {
        None
    } else {
        Some(unit.to_string())
    }
}

fn title_translation_prompt(language: &str, title: &str) -> String {
    format!(
        "Translate the following blog title into {language}.\n\
         - Keep the meaning and tone; adapt idioms for {language} readers.\n\
         - Return ONLY a JSON object with exactly one field: \"title\".\n\n\
         TITLE:\n{title}"
    )
}

fn paragraph_translation_prompt(language: &str, paragraph: &str) -> String {
    format!(
        "Translate the following Markdown paragraph into {language}.\n\
         - Maintain the original tone and style.\n\
         - Preserve all Markdown formatting (headings, lists, emphasis, links, code).\n\
         - Adapt cultural references and idioms to be appropriate for {language}.\n\
         - Do not add or remove content.\n\
         - Return ONLY a JSON object with exactly one field: \"content\".\n\n\
         PARAGRAPH:\n{paragraph}"
    )
}

/// Translates the blog into one target language
pub struct TranslationStep {
    client: Arc<dyn TextGenerationClient>,
    language: Language,
    concurrency: usize,
    name: String,
}

impl TranslationStep {
    pub fn new(client: Arc<dyn TextGenerationClient>, language: Language, concurrency: usize) -> Self {
        let name = format!("translate_{}", language.code);
        Self {
            client,
            language,
            concurrency: concurrency.max(1),
            name,
        }
    }

    fn fall_back(&self, ctx: &RunContext, unit: FallbackUnit, reason: String) {
        log::warn!(
            "[run {}] {:?} translation to {} failed, keeping original: {}",
            ctx.run_id(),
            unit,
            self.language.code,
            reason
        );
        ctx.emit(WorkflowEvent::TranslationFallback { unit, reason });
    }

    /// Translate the title, or return it unchanged on any failure
    async fn translate_title(&self, title: &str, ctx: &RunContext) -> String {
        let prompt = title_translation_prompt(self.language.prompt_name(), title);
        let call = self.client.generate_structured::<TitleResult>(&prompt);

        match ctx.bounded("title translation", call).await {
            Ok(result) => {
                let translated = clean_title(&result.title);
                if translated.is_empty() {
                    self.fall_back(ctx, FallbackUnit::Title, "empty translation".to_string());
                    title.to_string()
                } else {
                    translated
                }
            }
            Err(e) => {
                self.fall_back(ctx, FallbackUnit::Title, e.to_string());
                title.to_string()
            }
        }
    }

    /// Translate one paragraph, or return it unchanged on any failure
    async fn translate_paragraph(
        &self,
        index: usize,
        paragraph: String,
        ctx: &RunContext,
    ) -> (usize, String) {
        let prompt = paragraph_translation_prompt(self.language.prompt_name(), &paragraph);
        let call = self.client.generate_structured::<ParagraphResult>(&prompt);
        let unit = FallbackUnit::Paragraph { index };

        let text = match ctx.bounded("paragraph translation", call).await {
            Ok(result) => match as_single_paragraph(&result.content) {
                Some(translated) => translated,
                None => {
                    self.fall_back(ctx, unit, "empty translation".to_string());
                    paragraph
                }
            },
            Err(e) => {
                self.fall_back(ctx, unit, e.to_string());
                paragraph
            }
        };
        (index, text)
    }

    async fn translate_content(&self, content: &str, ctx: &RunContext) -> String {
        let paragraphs = split_paragraphs(content);
        log::info!(
            "[run {}] Translating {} paragraphs into {} ({} at a time)",
            ctx.run_id(),
            paragraphs.len(),
            self.language.code,
            self.concurrency
        );

        let pending: Vec<_> = paragraphs
            .iter()
            .enumerate()
            .map(|(index, paragraph)| self.translate_paragraph(index, paragraph.clone(), ctx))
            .collect();

        let mut translated: Vec<Option<String>> = vec![None; paragraphs.len()];
        let mut finished = stream::iter(pending).buffer_unordered(self.concurrency);
        while let Some((index, text)) = finished.next().await {
            translated[index] = Some(text);
        }

        let units: Vec<String> = translated
            .into_iter()
            .zip(paragraphs)
            .map(|(text, original)| text.unwrap_or(original))
            .collect();
        join_paragraphs(&units)
    }
}

#[async_trait]
impl Step for TranslationStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(
        &self,
        state: &WorkflowState,
        ctx: &RunContext,
    ) -> Result<StatePatch, BlogsmithError> {
        let Some(content) = state.content().filter(|c| !c.trim().is_empty()) else {
            log::warn!(
                "[run {}] No blog content available for translation",
                ctx.run_id()
            );
            ctx.emit(WorkflowEvent::TranslationSkipped {
                reason: "no blog content".to_string(),
            });
            return Ok(StatePatch::empty());
        };

        let title = match state.title() {
            Some(title) if !title.trim().is_empty() => Some(self.translate_title(title, ctx).await),
            _ => None,
        };
        let content = self.translate_content(content, ctx).await;

        log::info!(
            "[run {}] Translation into {} finished",
            ctx.run_id(),
            self.language.code
        );
        Ok(StatePatch {
            title,
            content: Some(content),
        })
    }
}
