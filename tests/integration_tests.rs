//! Integration tests for the blog workflow
//!
//! These tests drive the full graph against scripted mock clients.

use async_trait::async_trait;
use blogsmith_rs::adk::client::{ModelClient, TextGenerationClient};
use blogsmith_rs::adk::error::{BlogsmithError, ModelError, WorkflowError};
use blogsmith_rs::adk::model::{Content, GenerationConfig, Model, Part};
use blogsmith_rs::blog::config::{AppConfig, ConfigLoader, WorkflowSettings};
use blogsmith_rs::blog::language::{Language, LanguageRegistry};
use blogsmith_rs::blog::workflow::steps::{split_paragraphs, RouteDecisionStep};
use blogsmith_rs::blog::workflow::{
    BlogGraph, FallbackUnit, RunContext, Usecase, WorkflowEvent, WorkflowState,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Mock Components
// ============================================================================

const SOLAR_CONTENT: &str = "## Why solar\n\nSunlight is free.\n\n## How it works\n\nPanels convert light.\n\n## Outlook\n\nCosts keep falling.";

/// Scripted text-generation client.
///
/// Free-form calls return the scripted title or content. Structured calls
/// "translate" by tagging the source text with the language named in the
/// prompt, unless the source text matches one of the failure markers.
struct ScriptedClient {
    title: String,
    content: String,
    fail_on: Vec<String>,
    delay: Option<Duration>,
    free_calls: AtomicUsize,
    structured: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            fail_on: Vec::new(),
            delay: None,
            free_calls: AtomicUsize::new(0),
            structured: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, marker: &str) -> Self {
        self.fail_on.push(marker.to_string());
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn structured_calls(&self) -> Vec<String> {
        self.structured.lock().unwrap().clone()
    }
}

fn source_of(prompt: &str) -> &str {
    prompt
        .rsplit_once(":\n")
        .map(|(_, text)| text)
        .unwrap_or(prompt)
}

fn language_of(prompt: &str) -> &str {
    if prompt.contains("into Hindi") {
        "hi"
    } else if prompt.contains("into French") {
        "fr"
    } else {
        "xx"
    }
}

#[async_trait]
impl TextGenerationClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String, BlogsmithError> {
        self.free_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if prompt.contains("SEO friendly") {
            Ok(self.title.clone())
        } else {
            Ok(self.content.clone())
        }
    }

    async fn generate_json(
        &self,
        prompt: &str,
        schema_name: &str,
        _schema: &Value,
    ) -> Result<Value, BlogsmithError> {
        self.structured.lock().unwrap().push(schema_name.to_string());
        let source = source_of(prompt);
        if self.fail_on.iter().any(|marker| source.contains(marker.as_str())) {
            return Err(BlogsmithError::api("scripted", "forced failure"));
        }

        let translated = format!("[{}] {}", language_of(prompt), source);
        match schema_name {
            "TitleResult" => Ok(json!({ "title": translated })),
            _ => Ok(json!({ "content": translated })),
        }
    }
}

/// Mock model that returns predefined responses in order
struct MockModel {
    responses: Vec<String>,
    response_index: AtomicUsize,
}

impl MockModel {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|s| s.to_string()).collect(),
            response_index: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Model for MockModel {
    fn provider(&self) -> &str {
        "mock"
    }

    async fn generate_content(
        &self,
        _history: &[Content],
        _config: Option<&GenerationConfig>,
    ) -> Result<Content, BlogsmithError> {
        let idx = self.response_index.fetch_add(1, Ordering::SeqCst);
        let text = self
            .responses
            .get(idx)
            .cloned()
            .unwrap_or_else(|| "Max responses reached".to_string());
        Ok(Content {
            role: "model".to_string(),
            parts: vec![Part::Text(text)],
        })
    }
}

fn graph_for(client: Arc<ScriptedClient>) -> BlogGraph {
    BlogGraph::new(
        client,
        LanguageRegistry::default(),
        &WorkflowSettings::default(),
    )
}

fn solar_client() -> ScriptedClient {
    ScriptedClient::new("Harnessing the Sun", SOLAR_CONTENT)
}

// ============================================================================
// Generation without translation
// ============================================================================

#[tokio::test]
async fn test_run_without_language_makes_no_translation_calls() {
    let client = Arc::new(solar_client());
    let blog = graph_for(client.clone())
        .run("Solar Energy", None)
        .await
        .unwrap();

    assert_eq!(blog.title, "Harnessing the Sun");
    assert_eq!(blog.content, SOLAR_CONTENT);
    assert_eq!(client.free_calls.load(Ordering::SeqCst), 2);
    assert!(client.structured_calls().is_empty());
}

#[tokio::test]
async fn test_unsupported_languages_end_without_translation() {
    for language in [Some("spanish"), Some(""), Some("english"), None] {
        let client = Arc::new(solar_client());
        let blog = graph_for(client.clone())
            .run("Solar Energy", language)
            .await
            .unwrap();

        assert_eq!(blog.content, SOLAR_CONTENT, "language {:?}", language);
        assert!(client.structured_calls().is_empty(), "language {:?}", language);
    }
}

#[tokio::test]
async fn test_route_labels() {
    let router = RouteDecisionStep::new(LanguageRegistry::default());
    let label = |language: Option<&str>| {
        let state = WorkflowState::new("Solar Energy", language).unwrap();
        router.decide(&state).label().to_string()
    };

    assert_eq!(label(Some("hindi")), "hindi");
    assert_eq!(label(Some(" French ")), "french");
    assert_eq!(label(Some("spanish")), "end");
    assert_eq!(label(Some("")), "end");
    assert_eq!(label(None), "end");
    assert_eq!(label(Some("hindi")), label(Some("hindi")));
}

// ============================================================================
// Translation
// ============================================================================

#[tokio::test]
async fn test_translation_preserves_paragraph_count() {
    for (language, tag) in [("hindi", "[hi]"), ("french", "[fr]")] {
        let client = Arc::new(solar_client());
        let blog = graph_for(client.clone())
            .run("Solar Energy", Some(language))
            .await
            .unwrap();

        let original = split_paragraphs(SOLAR_CONTENT);
        let translated = split_paragraphs(&blog.content);
        assert_eq!(translated.len(), original.len());
        assert!(translated.iter().all(|p| p.starts_with(tag)));
        assert_eq!(blog.title, format!("{} Harnessing the Sun", tag));

        // one title call plus one call per paragraph
        assert_eq!(client.structured_calls().len(), 1 + original.len());
    }
}

#[tokio::test]
async fn test_title_failure_keeps_original_title() {
    let client = Arc::new(solar_client().failing_on("Harnessing the Sun"));
    let blog = graph_for(client)
        .run("Solar Energy", Some("hindi"))
        .await
        .unwrap();

    assert_eq!(blog.title, "Harnessing the Sun");
    assert!(split_paragraphs(&blog.content)
        .iter()
        .all(|p| p.starts_with("[hi]")));
}

#[tokio::test]
async fn test_one_failed_paragraph_of_n() {
    let client = Arc::new(solar_client().failing_on("Panels convert light."));
    let blog = graph_for(client)
        .run("Solar Energy", Some("french"))
        .await
        .unwrap();

    let original = split_paragraphs(SOLAR_CONTENT);
    let paragraphs = split_paragraphs(&blog.content);
    assert_eq!(paragraphs.len(), original.len());

    let untouched: Vec<usize> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.starts_with("[fr]"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(untouched, vec![3]);
    assert_eq!(paragraphs[3], original[3]);
    for i in [0, 1, 2, 4, 5] {
        assert_eq!(paragraphs[i], format!("[fr] {}", original[i]));
    }
}

#[tokio::test]
async fn test_solar_energy_second_paragraph_fails() {
    let content = "Sunlight is free.\n\nPanels convert light.\n\nCosts keep falling.";
    let client = Arc::new(
        ScriptedClient::new("Harnessing the Sun", content).failing_on("Panels convert light."),
    );
    let graph = graph_for(client);
    let (tx, mut rx) = mpsc::channel(64);
    let ctx = graph.new_context().with_events(tx);

    let state = WorkflowState::new("Solar Energy", Some("hindi")).unwrap();
    let state = graph.run_with_context(state, &ctx).await.unwrap();
    drop(ctx);

    assert_eq!(state.title(), Some("[hi] Harnessing the Sun"));
    assert_eq!(
        state.content(),
        Some("[hi] Sunlight is free.\n\nPanels convert light.\n\n[hi] Costs keep falling.")
    );

    let mut fallbacks = Vec::new();
    while let Some(event) = rx.recv().await {
        if let WorkflowEvent::TranslationFallback { unit, .. } = event {
            fallbacks.push(unit);
        }
    }
    assert_eq!(fallbacks, vec![FallbackUnit::Paragraph { index: 1 }]);
}

#[tokio::test]
async fn test_blank_line_variants_keep_paragraph_count() {
    let content = "Sunlight is free.\r\n\r\nPanels convert light.\n   \nCosts keep falling.";
    let client = Arc::new(ScriptedClient::new("Harnessing the Sun", content));
    let blog = graph_for(client.clone())
        .run("Solar Energy", Some("french"))
        .await
        .unwrap();

    assert_eq!(
        split_paragraphs(&blog.content),
        vec![
            "[fr] Sunlight is free.",
            "[fr] Panels convert light.",
            "[fr] Costs keep falling."
        ]
    );
    assert_eq!(client.structured_calls().len(), 4);
}

#[tokio::test]
async fn test_configured_language_is_routed() {
    let yaml = r#"
languages:
  - code: spanish
    display_name: Spanish
"#;
    let config = ConfigLoader::parse_yaml(yaml).unwrap();
    let client = Arc::new(ScriptedClient::new("Sol", "Uno.\n\nDos."));
    let graph = BlogGraph::from_config(client.clone(), &config);

    let blog = graph.run("Solar Energy", Some("Spanish")).await.unwrap();
    assert_eq!(split_paragraphs(&blog.content).len(), 2);
    assert_eq!(client.structured_calls().len(), 3);

    // hindi is no longer registered
    let client = Arc::new(ScriptedClient::new("Sol", "Uno.\n\nDos."));
    let graph = BlogGraph::from_config(client.clone(), &config);
    graph.run("Solar Energy", Some("hindi")).await.unwrap();
    assert!(client.structured_calls().is_empty());
}

// ============================================================================
// Usecases, errors and timeouts
// ============================================================================

#[tokio::test]
async fn test_topic_usecase_never_translates() {
    let client = Arc::new(solar_client());
    let graph = graph_for(client.clone()).with_usecase(Usecase::Topic);

    let blog = graph.run("Solar Energy", Some("hindi")).await.unwrap();
    assert_eq!(blog.content, SOLAR_CONTENT);
    assert!(client.structured_calls().is_empty());
}

#[tokio::test]
async fn test_blank_topic_is_client_error() {
    let client = Arc::new(solar_client());
    let err = graph_for(client.clone()).run("   ", None).await.unwrap_err();

    assert!(matches!(err, BlogsmithError::InvalidRequest(_)));
    assert_eq!(err.status_code(), 400);
    assert_eq!(client.free_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_usecase_is_client_error() {
    let err: BlogsmithError = "poetry".parse::<Usecase>().unwrap_err().into();
    assert!(matches!(
        err,
        BlogsmithError::Workflow(WorkflowError::UnknownUsecase(_))
    ));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_title_timeout_is_fatal() {
    let client = Arc::new(solar_client().with_delay(Duration::from_millis(200)));
    let graph = graph_for(client);
    let ctx = RunContext::new(Duration::from_millis(20));

    let state = WorkflowState::new("Solar Energy", Some("hindi")).unwrap();
    let err = graph.run_with_context(state, &ctx).await.unwrap_err();
    assert!(matches!(err, BlogsmithError::Timeout { ref step, .. } if step == "title"));
    assert_eq!(err.status_code(), 503);
}

#[tokio::test]
async fn test_backend_failure_in_content_is_fatal() {
    let model = Arc::new(MockModel::new(&["Harnessing the Sun", "   "]));
    let client = Arc::new(ModelClient::new(model));
    let graph = BlogGraph::from_config(client, &AppConfig::default());

    let err = graph.run("Solar Energy", None).await.unwrap_err();
    assert!(matches!(err, BlogsmithError::Model(ModelError::EmptyResponse)));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn test_model_client_end_to_end() {
    let model = Arc::new(MockModel::new(&[
        "\"Harnessing the Sun\"",
        "Sunlight is free.\n\nPanels convert light.",
        r#"{"title": "सूर्य का उपयोग"}"#,
        r#"{"content": "सूर्य का प्रकाश मुफ़्त है।"}"#,
        "not json at all",
    ]));
    let client = Arc::new(ModelClient::new(model));
    let mut settings = WorkflowSettings::default();
    settings.translation_concurrency = 1;
    let graph = BlogGraph::new(client, LanguageRegistry::default(), &settings);

    let blog = graph.run("Solar Energy", Some("hindi")).await.unwrap();
    assert_eq!(blog.title, "सूर्य का उपयोग");
    assert_eq!(
        blog.content,
        "सूर्य का प्रकाश मुफ़्त है।\n\nPanels convert light."
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_graph_is_shared_across_concurrent_runs() {
    let client = Arc::new(solar_client());
    let graph = Arc::new(graph_for(client.clone()));

    let handles: Vec<_> = ["hindi", "french", "spanish"]
        .into_iter()
        .map(|language| {
            let graph = graph.clone();
            tokio::spawn(async move { graph.run("Solar Energy", Some(language)).await })
        })
        .collect();

    let mut titles = Vec::new();
    for handle in handles {
        titles.push(handle.await.unwrap().unwrap().title);
    }
    assert_eq!(
        titles,
        vec![
            "[hi] Harnessing the Sun",
            "[fr] Harnessing the Sun",
            "Harnessing the Sun"
        ]
    );
}

#[tokio::test]
async fn test_custom_registry_with_language_value() {
    let registry = LanguageRegistry::new([Language::new("German", "German")]);
    let client = Arc::new(ScriptedClient::new("Sonne", "Eins.\n\nZwei."));
    let graph = BlogGraph::new(client.clone(), registry, &WorkflowSettings::default());

    let blog = graph.run("Solar Energy", Some("german")).await.unwrap();
    assert_eq!(blog.title, "[xx] Sonne");
    assert_eq!(blog.content, "[xx] Eins.\n\n[xx] Zwei.");
}
