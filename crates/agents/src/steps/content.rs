//! generate_content: one content piece per pending audience segment.

use campaign_channels::email::escape_html;
use campaign_channels::{BannerWriter, ChannelRouter, EmailWriter};
use campaign_core::generation::GenerationError;
use campaign_core::types::{CampaignState, Channel, ContentPiece};
use campaign_llm::GenerationEngine;
use tracing::{info, warn};

pub struct ContentStep {
    /// `None` sends every segment to `default_channel`.
    router: Option<ChannelRouter>,
    default_channel: Channel,
    email: EmailWriter,
    banner: BannerWriter,
}

impl ContentStep {
    pub fn new(engine: GenerationEngine, channel_routing: bool, default_channel: Channel) -> Self {
        Self {
            router: channel_routing.then(|| ChannelRouter::new(engine.clone())),
            default_channel,
            email: EmailWriter::new(engine.clone()),
            banner: BannerWriter::new(engine),
        }
    }

    /// Generate content for every segment that has none yet, in segment
    /// order. A failed segment gets a placeholder piece so the others still
    /// complete and the content list stays aligned with the segments.
    pub async fn run(&self, state: &CampaignState) -> Vec<ContentPiece> {
        let pending = state.pending_segments();
        let mut pieces = Vec::with_capacity(pending.len());

        for segment in pending {
            let channel = self.channel_for(&state.intent_brief, segment).await;
            let piece = match self.write(channel, &state.intent_brief, segment).await {
                Ok(piece) => piece,
                Err(e) => {
                    warn!(segment = %segment, channel = %channel, error = %e, "Content generation failed");
                    metrics::counter!("workflow.content_failures", "channel" => channel.as_str())
                        .increment(1);
                    error_piece(segment, channel, &e)
                }
            };
            pieces.push(piece);
        }

        info!(count = pieces.len(), "Content generated");
        pieces
    }

    async fn channel_for(&self, intent_brief: &str, segment: &str) -> Channel {
        match &self.router {
            Some(router) => router.route(intent_brief, segment).await,
            None => self.default_channel,
        }
    }

    async fn write(
        &self,
        channel: Channel,
        intent_brief: &str,
        segment: &str,
    ) -> Result<ContentPiece, GenerationError> {
        match channel {
            Channel::Email => self.email.write(intent_brief, segment).await,
            Channel::Banner => self.banner.write(intent_brief, segment).await,
        }
    }
}

/// Error text comes from the backend, so it is escaped like any other
/// untrusted value placed into HTML.
fn error_piece(segment: &str, channel: Channel, error: &GenerationError) -> ContentPiece {
    ContentPiece {
        segment: segment.to_string(),
        channel,
        html: format!(
            "Error generating content for this segment: {}",
            escape_html(&error.to_string())
        ),
        css: String::new(),
    }
}
