//! Display banner writer. Banners may carry a separate stylesheet, which is
//! lifted out of the generated HTML into [`ContentPiece::css`].

use campaign_core::generation::GenerationError;
use campaign_core::types::{Channel, ContentPiece};
use campaign_llm::{parsers, prompts, GenerationEngine};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::email::escape_html;

static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>").expect("style block pattern")
});

/// Split generated banner markup into `(html, css)`.
pub fn split_styles(markup: &str) -> (String, String) {
    let css = STYLE_BLOCK
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let html = STYLE_BLOCK.replace_all(markup, "").trim().to_string();
    (html, css)
}

/// Fixed artifact used when no generation backend is configured.
pub fn stub_banner(intent_brief: &str, segment: &str) -> ContentPiece {
    ContentPiece {
        segment: segment.to_string(),
        channel: Channel::Banner,
        html: format!(
            "<div class=\"banner banner--stub\"><span class=\"banner__flag\">STUB BANNER \
             (generation unavailable)</span><h2>{}</h2><p>For: {}</p></div>",
            escape_html(intent_brief),
            escape_html(segment)
        ),
        css: ".banner--stub { border: 1px dashed #999; padding: 16px; font-family: Arial, sans-serif; }\n\
              .banner__flag { color: #b00; font-weight: bold; }"
            .to_string(),
    }
}

pub struct BannerWriter {
    engine: GenerationEngine,
}

impl BannerWriter {
    pub fn new(engine: GenerationEngine) -> Self {
        Self { engine }
    }

    /// Write the banner for one segment; stub when the backend is unavailable.
    pub async fn write(
        &self,
        intent_brief: &str,
        segment: &str,
    ) -> Result<ContentPiece, GenerationError> {
        if !self.engine.is_available() {
            debug!(segment, "Generation unavailable, using stub banner");
            return Ok(stub_banner(intent_brief, segment));
        }

        let raw = self
            .engine
            .invoke(
                &prompts::BANNER,
                &[("intent_brief", intent_brief), ("audience_segment", segment)],
            )
            .await?;

        let (html, css) = split_styles(&parsers::strip_code_fences(&raw));
        if html.is_empty() {
            return Err(GenerationError::EmptyResponse(
                "banner markup was empty".to_string(),
            ));
        }

        Ok(ContentPiece {
            segment: segment.to_string(),
            channel: Channel::Banner,
            html,
            css,
        })
    }
}
