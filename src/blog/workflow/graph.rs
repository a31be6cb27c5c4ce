// SPDX-License-Identifier: MIT

//! Blog workflow graph
//!
//! Title -> Content -> RouteDecision -> (Translate(lang) | End)
//!
//! The graph is an explicit state machine over [`Node`]. It holds only
//! immutable configuration and a shared client, so one graph can serve many
//! concurrent runs; per-run data lives in [`WorkflowState`] and [`RunContext`].

use super::context::{RunContext, WorkflowEvent};
use super::state::{Blog, WorkflowState};
use super::steps::{ContentStep, Route, RouteDecisionStep, Step, TitleStep, TranslationStep};
use crate::adk::client::TextGenerationClient;
use crate::adk::error::{BlogsmithError, WorkflowError};
use crate::blog::config::{AppConfig, WorkflowSettings};
use crate::blog::language::{Language, LanguageRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Graph variant selected at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usecase {
    /// Generate only; any requested language is ignored
    Topic,
    /// Generate, then translate when the language is supported
    Language,
}

impl FromStr for Usecase {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "topic" => Ok(Usecase::Topic),
            "language" => Ok(Usecase::Language),
            other => Err(WorkflowError::UnknownUsecase(other.to_string())),
        }
    }
}

impl fmt::Display for Usecase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Usecase::Topic => write!(f, "topic"),
            Usecase::Language => write!(f, "language"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Title,
    Content,
    RouteDecision,
    Translate(Language),
    End,
}

/// Executes the blog workflow
pub struct BlogGraph {
    usecase: Usecase,
    call_timeout: Duration,
    title: TitleStep,
    content: ContentStep,
    router: RouteDecisionStep,
    translators: HashMap<String, TranslationStep>,
}

impl BlogGraph {
    pub fn new(
        client: Arc<dyn TextGenerationClient>,
        registry: LanguageRegistry,
        settings: &WorkflowSettings,
    ) -> Self {
        let translators = registry
            .iter()
            .map(|language| {
                let step = TranslationStep::new(
                    client.clone(),
                    language.clone(),
                    settings.translation_concurrency,
                );
                (language.code.clone(), step)
            })
            .collect();

        Self {
            usecase: settings.usecase,
            call_timeout: settings.call_timeout(),
            title: TitleStep::new(client.clone()),
            content: ContentStep::new(client, settings.target_words),
            router: RouteDecisionStep::new(registry),
            translators,
        }
    }

    /// Build the graph described by an application config
    pub fn from_config(client: Arc<dyn TextGenerationClient>, config: &AppConfig) -> Self {
        Self::new(client, config.language_registry(), &config.workflow)
    }

    pub fn with_usecase(mut self, usecase: Usecase) -> Self {
        self.usecase = usecase;
        self
    }

    pub fn usecase(&self) -> Usecase {
        self.usecase
    }

    pub fn registry(&self) -> &LanguageRegistry {
        self.router.registry()
    }

    /// Fresh context carrying this graph's call timeout
    pub fn new_context(&self) -> RunContext {
        RunContext::new(self.call_timeout)
    }

    /// Generate a blog for `topic`, translated when `target_language` is supported
    pub async fn run(
        &self,
        topic: &str,
        target_language: Option<&str>,
    ) -> Result<Blog, BlogsmithError> {
        let state = WorkflowState::new(topic, target_language)?;
        let state = self.run_with_context(state, &self.new_context()).await?;
        state
            .blog()
            .ok_or_else(|| WorkflowError::MissingContent.into())
    }

    /// Drive the state machine from `Title` to `End`
    pub async fn run_with_context(
        &self,
        state: WorkflowState,
        ctx: &RunContext,
    ) -> Result<WorkflowState, BlogsmithError> {
        let mut state = match self.usecase {
            Usecase::Topic => state.without_language(),
            Usecase::Language => state,
        };
        log::info!(
            "[run {}] Starting {} workflow for topic: {}",
            ctx.run_id(),
            self.usecase,
            state.topic()
        );

        let mut node = Node::Title;
        loop {
            node = match node {
                Node::Title => {
                    state = self.run_step(&self.title, state, ctx).await?;
                    Node::Content
                }
                Node::Content => {
                    state = self.run_step(&self.content, state, ctx).await?;
                    match self.usecase {
                        Usecase::Topic => Node::End,
                        Usecase::Language => Node::RouteDecision,
                    }
                }
                Node::RouteDecision => {
                    let route = self.router.decide(&state);
                    log::info!("[run {}] Route selected: {}", ctx.run_id(), route.label());
                    ctx.emit(WorkflowEvent::RouteSelected {
                        route: route.label().to_string(),
                    });
                    match route {
                        Route::Translate(language) => Node::Translate(language),
                        Route::End => Node::End,
                    }
                }
                Node::Translate(language) => {
                    match self.translators.get(&language.code) {
                        Some(step) => state = self.run_step(step, state, ctx).await?,
                        None => log::warn!(
                            "[run {}] No translator registered for {}",
                            ctx.run_id(),
                            language.code
                        ),
                    }
                    Node::End
                }
                Node::End => break,
            };
        }

        log::info!("[run {}] Workflow finished", ctx.run_id());
        Ok(state)
    }

    async fn run_step(
        &self,
        step: &dyn Step,
        state: WorkflowState,
        ctx: &RunContext,
    ) -> Result<WorkflowState, BlogsmithError> {
        let name = step.name().to_string();
        ctx.emit(WorkflowEvent::StepStarted { step: name.clone() });

        let patch = step.run(&state, ctx).await.map_err(|e| {
            log::error!("[run {}] Step {} failed: {}", ctx.run_id(), name, e);
            e
        })?;

        ctx.emit(WorkflowEvent::StepCompleted { step: name });
        Ok(state.apply(patch))
    }
}
