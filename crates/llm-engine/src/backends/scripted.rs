//! Scripted backend.
//!
//! Answers every prompt with a caller-supplied function instead of a remote
//! model, so the workflow can run offline with deterministic output.

use async_trait::async_trait;
use campaign_core::generation::{GenerationError, TextGenerator};
use std::sync::atomic::{AtomicUsize, Ordering};

type Script = dyn Fn(&str) -> Result<String, GenerationError> + Send + Sync;

pub struct ScriptedGenerator {
    script: Box<Script>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&str) -> Result<String, GenerationError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answer with `text`.
    pub fn constant(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Always fail with `error`.
    pub fn failing(error: GenerationError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    /// Number of prompts answered so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.script)(prompt)
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}
