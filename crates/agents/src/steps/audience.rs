//! generate_audience: derives audience segments from the brief, optionally
//! grounded in observed customer data.

use campaign_cdp::{GroundingContext, GroundingService};
use campaign_llm::{prompts, GenerationEngine};
use tracing::{debug, info, warn};

/// Segments used when the model is unavailable or returns nothing usable.
pub const FALLBACK_SEGMENTS: [&str; 3] = [
    "Tech-savvy millennials",
    "Small business owners",
    "Remote workers",
];

pub fn fallback_segments() -> Vec<String> {
    FALLBACK_SEGMENTS.iter().map(|s| s.to_string()).collect()
}

pub struct AudienceStep {
    engine: GenerationEngine,
    grounding: Option<GroundingService>,
    max_segments: usize,
}

impl AudienceStep {
    pub fn new(
        engine: GenerationEngine,
        grounding: Option<GroundingService>,
        max_segments: usize,
    ) -> Self {
        Self {
            engine,
            grounding,
            max_segments,
        }
    }

    /// Produce the segment list. Never fails and never returns an empty list.
    pub async fn run(&self, intent_brief: &str) -> Vec<String> {
        if !self.engine.is_available() {
            debug!("Generation unavailable, using fallback audience");
            return self.fallback("unavailable");
        }

        let context = match &self.grounding {
            Some(service) => service.fetch_context().await,
            None => GroundingContext::unavailable("grounding disabled"),
        };

        let result = match context.data() {
            Some(data) => {
                info!(table = %data.table, "Generating grounded audience segments");
                let schema = data.schema_summary();
                let products = data.products.join(", ");
                let locations = data.locations.join(", ");
                let behaviors = data.behaviors.join(", ");
                self.engine
                    .invoke_list(
                        &prompts::GROUNDED_AUDIENCE,
                        &[
                            ("intent_brief", intent_brief),
                            ("table", data.table.as_str()),
                            ("schema", schema.as_str()),
                            ("products", products.as_str()),
                            ("locations", locations.as_str()),
                            ("behaviors", behaviors.as_str()),
                        ],
                    )
                    .await
            }
            None => {
                if let GroundingContext::Unavailable { reason } = &context {
                    debug!(reason = %reason, "Generating ungrounded audience segments");
                }
                self.engine
                    .invoke_list(&prompts::AUDIENCE, &[("intent_brief", intent_brief)])
                    .await
            }
        };

        match result {
            Ok(mut segments) if !segments.is_empty() => {
                segments.truncate(self.max_segments);
                info!(count = segments.len(), "Audience segments generated");
                segments
            }
            Ok(_) => {
                warn!("Model returned no audience segments, using fallback");
                self.fallback("empty")
            }
            Err(e) => {
                warn!(error = %e, "Audience generation failed, using fallback");
                self.fallback("call_failed")
            }
        }
    }

    fn fallback(&self, reason: &'static str) -> Vec<String> {
        metrics::counter!("workflow.fallbacks", "site" => "audience", "reason" => reason)
            .increment(1);
        let mut segments = fallback_segments();
        segments.truncate(self.max_segments);
        segments
    }
}
