// SPDX-License-Identifier: MIT

//! Blog generation workflow: state, per-run context, steps and the graph

pub mod context;
pub mod graph;
pub mod state;
pub mod steps;

pub use context::{FallbackUnit, RunContext, WorkflowEvent};
pub use graph::{BlogGraph, Usecase};
pub use state::{Blog, StatePatch, WorkflowState};
pub use steps::{Route, Step};
