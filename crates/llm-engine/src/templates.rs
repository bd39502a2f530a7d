//! Tera-backed prompt rendering.

use campaign_core::generation::GenerationError;
use std::error::Error as _;
use std::sync::LazyLock;
use tera::{Context, Tera};

use crate::prompts;

/// A named prompt with `{{ variable }}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub body: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, body: &'static str) -> Self {
        Self { name, body }
    }
}

static BUILTIN: LazyLock<Result<PromptEngine, GenerationError>> =
    LazyLock::new(|| PromptEngine::with_templates(&prompts::ALL));

/// Prompt templates compiled once. Rendering is strict: a variable the
/// template uses but the caller did not supply is an error.
pub struct PromptEngine {
    tera: Tera,
}

impl Default for PromptEngine {
    fn default() -> Self {
        let mut tera = Tera::default();
        // Prompts are plain text, never HTML-escaped.
        tera.autoescape_on(Vec::new());
        Self { tera }
    }
}

impl PromptEngine {
    pub fn with_templates(templates: &[PromptTemplate]) -> Result<Self, GenerationError> {
        let mut engine = Self::default();
        for template in templates {
            engine.add_template(template)?;
        }
        Ok(engine)
    }

    /// The engine holding every workflow prompt.
    pub fn builtin() -> Result<&'static PromptEngine, GenerationError> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Register a template, replacing any previous one with the same name.
    pub fn add_template(&mut self, template: &PromptTemplate) -> Result<(), GenerationError> {
        self.tera
            .add_raw_template(template.name, template.body)
            .map_err(|e| template_error(template.name, &e))
    }

    /// Render `template` with `variables`. Unregistered templates are
    /// compiled for this call only.
    pub fn render(
        &self,
        template: &PromptTemplate,
        variables: &[(&str, &str)],
    ) -> Result<String, GenerationError> {
        let mut context = Context::new();
        for (name, value) in variables {
            context.insert(*name, value);
        }

        let registered = self
            .tera
            .get_template_names()
            .any(|name| name == template.name);
        let rendered = if registered {
            self.tera.render(template.name, &context)
        } else {
            Tera::one_off(template.body, &context, false)
        };
        rendered.map_err(|e| template_error(template.name, &e))
    }
}

/// Tera keeps the useful detail (which variable, which line) in the source
/// chain, so flatten it into the message.
fn template_error(name: &str, error: &tera::Error) -> GenerationError {
    let mut message = format!("template '{name}': {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    GenerationError::Template(message)
}
