//! Channel routing: classifies an audience segment as email or banner.

use campaign_core::types::Channel;
use campaign_llm::{prompts, GenerationEngine};
use tracing::{debug, warn};

/// Map a raw classification answer onto a channel.
///
/// Anything that mentions "email" (after trimming and lower-casing) routes to
/// email; every other answer, including an empty one, routes to banner.
pub fn channel_from_response(raw: &str) -> Channel {
    if raw.trim().to_lowercase().contains("email") {
        Channel::Email
    } else {
        Channel::Banner
    }
}

pub struct ChannelRouter {
    engine: GenerationEngine,
}

impl ChannelRouter {
    pub fn new(engine: GenerationEngine) -> Self {
        Self { engine }
    }

    /// Classify one segment. Never fails: an unavailable backend or a failed
    /// call routes to banner.
    pub async fn route(&self, intent_brief: &str, segment: &str) -> Channel {
        let answer = self
            .engine
            .invoke(
                &prompts::CHANNEL,
                &[("intent_brief", intent_brief), ("audience_segment", segment)],
            )
            .await;

        let channel = match answer {
            Ok(raw) => {
                let channel = channel_from_response(&raw);
                debug!(segment, answer = %raw.trim(), channel = %channel, "Channel classified");
                channel
            }
            Err(e) => {
                warn!(segment, error = %e, "Channel classification failed, defaulting to banner");
                Channel::Banner
            }
        };
        metrics::counter!("channels.routed", "channel" => channel.as_str()).increment(1);
        channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::generation::GenerationError;
    use campaign_llm::ScriptedGenerator;
    use std::sync::Arc;

    #[test]
    fn email_substring_routes_to_email() {
        assert_eq!(channel_from_response("Email please"), Channel::Email);
        assert_eq!(channel_from_response("  EMAIL\n"), Channel::Email);
        assert_eq!(channel_from_response("I'd pick an e-mail... no, email"), Channel::Email);
    }

    #[test]
    fn anything_else_routes_to_banner() {
        assert_eq!(channel_from_response("something else"), Channel::Banner);
        assert_eq!(channel_from_response("banner"), Channel::Banner);
        assert_eq!(channel_from_response(""), Channel::Banner);
    }

    #[tokio::test]
    async fn routes_with_model_answer() {
        let router = ChannelRouter::new(GenerationEngine::new(Arc::new(
            ScriptedGenerator::constant("email"),
        )));
        assert_eq!(router.route("Launch", "Newsletter subscribers").await, Channel::Email);
    }

    #[tokio::test]
    async fn failures_default_to_banner() {
        let router = ChannelRouter::new(GenerationEngine::new(Arc::new(
            ScriptedGenerator::failing(GenerationError::Http("timeout".into())),
        )));
        assert_eq!(router.route("Launch", "Commuters").await, Channel::Banner);

        let stub = ChannelRouter::new(GenerationEngine::unavailable());
        assert_eq!(stub.route("Launch", "Commuters").await, Channel::Banner);
    }
}
