//! Email content writer.
//!
//! Many email clients drop `<style>` blocks and linked stylesheets, so email
//! HTML is held to an inline-styles-only contract: whatever the model returns
//! is passed through [`inline_styles_only`] before it leaves this module.

use campaign_core::generation::GenerationError;
use campaign_core::types::{Channel, ContentPiece};
use campaign_llm::{parsers, prompts, GenerationEngine};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("style block pattern")
});
// An opening <style> with no closing tag swallows the rest of the document.
static UNCLOSED_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*$").expect("unclosed style pattern"));
static STYLESHEET_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link\b[^>]*\bstylesheet\b[^>]*>"#).expect("stylesheet link pattern")
});
static STYLE_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)@import\s+[^;]+;"#).expect("import pattern"));

/// Strip every non-inline style mechanism from `html`. Inline `style=`
/// attributes are kept.
///
/// Removing one construct can splice its neighbours into a new one (for
/// example `<sty<link rel="stylesheet">le>`), so passes repeat until the
/// output stops changing. Every productive pass shortens the string.
pub fn inline_styles_only(html: &str) -> String {
    let mut current = html.to_string();
    loop {
        let without_blocks = STYLE_BLOCK.replace_all(&current, "");
        let without_unclosed = UNCLOSED_STYLE.replace_all(&without_blocks, "");
        let without_links = STYLESHEET_LINK.replace_all(&without_unclosed, "");
        let without_imports = STYLE_IMPORT.replace_all(&without_links, "");
        if without_imports.len() == current.len() {
            return current.trim().to_string();
        }
        current = without_imports.into_owned();
    }
}

/// Fixed artifact used when no generation backend is configured.
pub fn stub_email(intent_brief: &str, segment: &str) -> ContentPiece {
    ContentPiece {
        segment: segment.to_string(),
        channel: Channel::Email,
        html: format!(
            "<div style=\"font-family:Arial,sans-serif;padding:16px;border:1px dashed #999;\">\
             <p style=\"color:#b00;font-weight:bold;margin:0 0 8px;\">STUB EMAIL (generation unavailable)</p>\
             <h2 style=\"margin:0 0 8px;\">{}</h2>\
             <p style=\"margin:0;\">For: {}</p></div>",
            escape_html(intent_brief),
            escape_html(segment)
        ),
        css: String::new(),
    }
}

/// Escape text for interpolation into generated HTML.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub struct EmailWriter {
    engine: GenerationEngine,
}

impl EmailWriter {
    pub fn new(engine: GenerationEngine) -> Self {
        Self { engine }
    }

    /// Write the email for one segment.
    ///
    /// Returns the stub artifact when the backend is unavailable; a failed
    /// call is returned as an error for the caller to isolate.
    pub async fn write(
        &self,
        intent_brief: &str,
        segment: &str,
    ) -> Result<ContentPiece, GenerationError> {
        if !self.engine.is_available() {
            debug!(segment, "Generation unavailable, using stub email");
            return Ok(stub_email(intent_brief, segment));
        }

        let raw = self
            .engine
            .invoke(
                &prompts::EMAIL,
                &[("intent_brief", intent_brief), ("audience_segment", segment)],
            )
            .await?;

        let unfenced = parsers::strip_code_fences(&raw);
        let html = inline_styles_only(&unfenced);
        if html.len() != unfenced.trim().len() {
            warn!(segment, "Removed non-inline styles from generated email");
            metrics::counter!("channels.email.styles_stripped").increment(1);
        }
        if html.is_empty() {
            return Err(GenerationError::EmptyResponse(
                "email body was empty after sanitizing".to_string(),
            ));
        }

        Ok(ContentPiece {
            segment: segment.to_string(),
            channel: Channel::Email,
            html,
            css: String::new(),
        })
    }
}
