// SPDX-License-Identifier: MIT

//! Workflow steps
//!
//! - `TitleStep` - generate the blog title
//! - `ContentStep` - generate the Markdown body
//! - `RouteDecisionStep` - pick translation or termination (no generation)
//! - `TranslationStep` - translate title and paragraphs with per-unit fallback

mod content;
mod route;
mod title;
mod translation;

pub use content::ContentStep;
pub use route::{decide_route, Route, RouteDecisionStep, DEFAULT_LANGUAGE};
pub use title::{clean_title, TitleStep};
pub use translation::{join_paragraphs, split_paragraphs, ParagraphResult, TitleResult, TranslationStep};

use crate::adk::error::BlogsmithError;
use crate::blog::workflow::context::RunContext;
use crate::blog::workflow::state::{StatePatch, WorkflowState};
use async_trait::async_trait;

/// A named transformation producing a partial state update
#[async_trait]
pub trait Step: Send + Sync {
    /// Returns the step name used in logs and events
    fn name(&self) -> &str;

    /// Read the state and return the fields to update
    async fn run(
        &self,
        state: &WorkflowState,
        ctx: &RunContext,
    ) -> Result<StatePatch, BlogsmithError>;
}
