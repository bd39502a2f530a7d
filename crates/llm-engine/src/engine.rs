//! Generation engine: owns the configured backend (if any) and provides the
//! template-level API used by the workflow steps.

use crate::backends::gemini::GeminiGenerator;
use crate::parsers;
use crate::templates::{PromptEngine, PromptTemplate};
use campaign_core::config::LlmConfig;
use campaign_core::generation::{GenerationError, TextGenerator};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Built once at start-up and shared read-only by every request.
#[derive(Clone)]
pub struct GenerationEngine {
    backend: Option<Arc<dyn TextGenerator>>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl GenerationEngine {
    /// Build from configuration. Without an API key the engine is created in
    /// stub mode and every call returns [`GenerationError::Unavailable`].
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        let engine = match config.api_key() {
            Some(key) => {
                info!(model = %config.model, "Gemini integration enabled");
                Self::new(Arc::new(GeminiGenerator::new(config, key)?))
            }
            None => {
                warn!("No generation API key configured, using fallback responses");
                Self::unavailable()
            }
        };
        Ok(engine.with_retries(config.max_retries, Duration::from_millis(config.retry_backoff_ms)))
    }

    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self {
            backend: Some(backend),
            max_retries: 0,
            retry_backoff: Duration::ZERO,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            backend: None,
            max_retries: 0,
            retry_backoff: Duration::ZERO,
        }
    }

    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn provider_name(&self) -> &str {
        self.backend
            .as_ref()
            .map(|b| b.provider_name())
            .unwrap_or("none")
    }

    /// Render `template` and complete it, retrying transient failures.
    pub async fn invoke(
        &self,
        template: &PromptTemplate,
        variables: &[(&str, &str)],
    ) -> Result<String, GenerationError> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            GenerationError::Unavailable("no generation API key configured".to_string())
        })?;
        let prompt = PromptEngine::builtin()?.render(template, variables)?;

        let mut attempt = 0;
        loop {
            metrics::counter!("generation.calls", "template" => template.name).increment(1);
            let start = std::time::Instant::now();

            match backend.complete(&prompt).await {
                Ok(text) => {
                    metrics::histogram!("generation.latency_ms", "template" => template.name)
                        .record(start.elapsed().as_millis() as f64);
                    debug!(template = template.name, chars = text.len(), "Generation completed");
                    return Ok(text);
                }
                Err(e) => {
                    metrics::counter!("generation.failures", "template" => template.name)
                        .increment(1);
                    if attempt >= self.max_retries || !e.is_transient() {
                        return Err(e);
                    }
                    attempt += 1;
                    warn!(
                        template = template.name,
                        attempt,
                        error = %e,
                        "Generation failed, retrying"
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
            }
        }
    }

    /// Like [`invoke`](Self::invoke), parsing the answer as a delimited list.
    pub async fn invoke_list(
        &self,
        template: &PromptTemplate,
        variables: &[(&str, &str)],
    ) -> Result<Vec<String>, GenerationError> {
        let raw = self.invoke(template, variables).await?;
        Ok(parsers::parse_list(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ECHO: PromptTemplate = PromptTemplate::new("echo", "say {{ word }}");

    /// Fails `failures` times with `error`, then echoes the prompt.
    struct FlakyGenerator {
        calls: AtomicUsize,
        failures: usize,
        error: GenerationError,
    }

    #[async_trait]
    impl TextGenerator for FlakyGenerator {
        async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(self.error.clone())
            } else {
                Ok(prompt.to_string())
            }
        }

        fn provider_name(&self) -> &str {
            "flaky"
        }
    }

    fn flaky(failures: usize, error: GenerationError) -> Arc<FlakyGenerator> {
        Arc::new(FlakyGenerator {
            calls: AtomicUsize::new(0),
            failures,
            error,
        })
    }

    #[tokio::test]
    async fn unavailable_engine_reports_unavailable() {
        let engine = GenerationEngine::unavailable();
        assert!(!engine.is_available());
        assert_eq!(engine.provider_name(), "none");

        let err = engine.invoke(&ECHO, &[("word", "hi")]).await.unwrap_err();
        assert!(matches!(err, GenerationError::Unavailable(_)));
    }

    #[test]
    fn config_selects_backend() {
        let stub = GenerationEngine::from_config(&LlmConfig::default()).unwrap();
        assert!(!stub.is_available());

        let config = LlmConfig {
            api_key: Some("test-key".to_string()),
            ..LlmConfig::default()
        };
        let live = GenerationEngine::from_config(&config).unwrap();
        assert_eq!(live.provider_name(), "gemini");
    }

    #[tokio::test]
    async fn missing_template_variable_never_reaches_backend() {
        let backend = flaky(0, GenerationError::Http("x".into()));
        let engine = GenerationEngine::new(backend.clone());
        let err = engine.invoke(&ECHO, &[]).await.unwrap_err();
        assert!(matches!(err, GenerationError::Template(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn renders_and_completes() {
        let engine = GenerationEngine::new(flaky(0, GenerationError::Http("x".into())));
        let text = engine.invoke(&ECHO, &[("word", "hi")]).await.unwrap();
        assert_eq!(text, "say hi");
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let backend = flaky(2, GenerationError::Http("reset".into()));
        let engine = GenerationEngine::new(backend.clone()).with_retries(2, Duration::ZERO);

        let text = engine.invoke(&ECHO, &[("word", "again")]).await.unwrap();
        assert_eq!(text, "say again");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let backend = flaky(
            5,
            GenerationError::Api {
                status: 400,
                message: "bad request".into(),
            },
        );
        let engine = GenerationEngine::new(backend.clone()).with_retries(3, Duration::ZERO);

        assert!(engine.invoke(&ECHO, &[("word", "x")]).await.is_err());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn list_variant_parses_items() {
        let list = PromptTemplate::new("list", "{{ items }}");
        let engine = GenerationEngine::new(flaky(0, GenerationError::Http("x".into())));
        let items = engine
            .invoke_list(&list, &[("items", "Runners, Cyclists,\nSwimmers")])
            .await
            .unwrap();
        assert_eq!(items, vec!["Runners", "Cyclists", "Swimmers"]);
    }
}
