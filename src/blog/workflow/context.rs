// SPDX-License-Identifier: MIT

//! Per-run context passed to every step
//!
//! Carries the run id used to tag log lines, the timeout applied to each
//! generation call, and an optional channel for structured workflow events.

use crate::adk::error::BlogsmithError;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Which translation unit fell back to its original text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackUnit {
    Title,
    Paragraph { index: usize },
}

/// Structured diagnostics emitted while the graph runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    StepStarted { step: String },
    StepCompleted { step: String },
    RouteSelected { route: String },
    TranslationSkipped { reason: String },
    TranslationFallback { unit: FallbackUnit, reason: String },
}

#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: Uuid,
    call_timeout: Duration,
    events: Option<mpsc::Sender<WorkflowEvent>>,
}

impl RunContext {
    pub fn new(call_timeout: Duration) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            call_timeout,
            events: None,
        }
    }

    /// Attach a channel that receives [`WorkflowEvent`]s
    pub fn with_events(mut self, tx: mpsc::Sender<WorkflowEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Send an event without ever blocking the workflow
    pub fn emit(&self, event: WorkflowEvent) {
        log::debug!("[run {}] event: {:?}", self.run_id, event);
        if let Some(tx) = &self.events {
            if let Err(e) = tx.try_send(event) {
                log::debug!("[run {}] dropped workflow event: {}", self.run_id, e);
            }
        }
    }

    /// Run a generation call under the context's timeout
    pub async fn bounded<T, F>(&self, step: &str, call: F) -> Result<T, BlogsmithError>
    where
        F: Future<Output = Result<T, BlogsmithError>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                log::error!(
                    "[run {}] {} call exceeded {:?}",
                    self.run_id,
                    step,
                    self.call_timeout
                );
                Err(BlogsmithError::timeout(step, self.call_timeout))
            }
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_TIMEOUT)
    }
}
