// SPDX-License-Identifier: MIT

//! Registry of translation target languages

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalize a user-supplied language name: trimmed and lower-cased.
pub fn normalize_language(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A supported translation target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    /// Normalized lookup key and route label (e.g. "hindi")
    pub code: String,
    /// Name used in prompts (e.g. "Hindi")
    #[serde(default)]
    pub display_name: String,
}

impl Language {
    pub fn new(code: &str, display_name: &str) -> Self {
        Self {
            code: normalize_language(code),
            display_name: display_name.trim().to_string(),
        }
    }

    /// Name to put in prompts; falls back to the code
    pub fn prompt_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.code
        } else {
            &self.display_name
        }
    }
}

/// Languages the workflow can translate into.
///
/// Insertion order is kept for listing; lookups go through an index.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    index: HashMap<String, usize>,
}

impl LanguageRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            languages: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn new(languages: impl IntoIterator<Item = Language>) -> Self {
        let mut registry = Self::empty();
        for language in languages {
            registry.register(language);
        }
        registry
    }

    /// Add a language; re-registering a code replaces its display name
    pub fn register(&mut self, language: Language) {
        let language = Language::new(&language.code, &language.display_name);
        if language.code.is_empty() {
            log::warn!("Ignoring language with empty code");
            return;
        }

        match self.index.get(&language.code) {
            Some(&i) => self.languages[i] = language,
            None => {
                self.index
                    .insert(language.code.clone(), self.languages.len());
                self.languages.push(language);
            }
        }
    }

    /// Look up a language by user input, normalizing it first
    pub fn resolve(&self, raw: &str) -> Option<&Language> {
        self.index
            .get(&normalize_language(raw))
            .map(|&i| &self.languages[i])
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.resolve(raw).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new(default_languages())
    }
}

/// Languages supported out of the box
pub fn default_languages() -> Vec<Language> {
    vec![Language::new("hindi", "Hindi"), Language::new("french", "French")]
}
