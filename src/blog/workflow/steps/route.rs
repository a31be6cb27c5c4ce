// SPDX-License-Identifier: MIT

use crate::blog::language::{Language, LanguageRegistry};
use crate::blog::workflow::state::WorkflowState;

/// Language assumed when the request names none
pub const DEFAULT_LANGUAGE: &str = "english";

/// Outcome of the routing decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Translate the post into a registered language
    Translate(Language),
    /// Finish with the untranslated post
    End,
}

impl Route {
    /// Route label: the language code, or "end"
    pub fn label(&self) -> &str {
        match self {
            Route::Translate(language) => &language.code,
            Route::End => "end",
        }
    }
}

/// Route for the state's target language.
///
/// An absent language is "english" and never translates, even if a
/// configuration registers english as a target.
pub fn decide_route(state: &WorkflowState, registry: &LanguageRegistry) -> Route {
    let Some(language) = state.target_language() else {
        log::debug!("No target language, assuming {}", DEFAULT_LANGUAGE);
        return Route::End;
    };

    match registry.resolve(language) {
        Some(language) => Route::Translate(language.clone()),
        None => Route::End,
    }
}

/// Pure routing decision over the target language. Makes no generation call.
#[derive(Debug, Clone)]
pub struct RouteDecisionStep {
    registry: LanguageRegistry,
}

impl RouteDecisionStep {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn decide(&self, state: &WorkflowState) -> Route {
        decide_route(state, &self.registry)
    }
}
