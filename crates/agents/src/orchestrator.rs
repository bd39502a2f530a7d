//! Orchestrator: decides which step runs next.
//!
//! The fixed priority policy in [`decide_deterministic`] is the ground truth.
//! In LLM mode the model is asked first, but its answer is only used when it
//! parses to a known decision that agrees with the policy; otherwise the
//! policy result is used. This keeps the loop bounded no matter what the
//! model says.

use campaign_core::config::DecisionMode;
use campaign_core::types::{CampaignState, Decision, StepName};
use campaign_llm::{parsers, prompts, GenerationEngine};
use tracing::{debug, warn};

/// Priority policy, first match wins:
/// no segments → audience; missing content → content; no review → review;
/// otherwise complete.
pub fn decide_deterministic(state: &CampaignState) -> Decision {
    if state.audience_segments.is_empty() {
        Decision::Run(StepName::GenerateAudience)
    } else if state.content.len() < state.audience_segments.len() {
        Decision::Run(StepName::GenerateContent)
    } else if state.review_task.is_none() {
        Decision::Run(StepName::CreateReviewTask)
    } else {
        Decision::Complete
    }
}

/// Project a free-text model answer onto a decision. Unknown answers are `None`.
pub fn parse_decision(raw: &str) -> Option<Decision> {
    match parsers::normalize_token(raw).as_str() {
        "generate_audience" => Some(Decision::Run(StepName::GenerateAudience)),
        "generate_content" | "generate_content_for_segments" => {
            Some(Decision::Run(StepName::GenerateContent))
        }
        "create_review" | "create_review_task" => Some(Decision::Run(StepName::CreateReviewTask)),
        "complete" => Some(Decision::Complete),
        _ => None,
    }
}

pub struct Orchestrator {
    mode: DecisionMode,
    engine: GenerationEngine,
}

impl Orchestrator {
    pub fn new(mode: DecisionMode, engine: GenerationEngine) -> Self {
        Self { mode, engine }
    }

    pub async fn decide(&self, state: &CampaignState) -> Decision {
        let policy = decide_deterministic(state);
        if self.mode == DecisionMode::Deterministic || !self.engine.is_available() {
            return policy;
        }

        let fallback_reason = match self.ask_model(state).await {
            Ok(raw) => match parse_decision(&raw) {
                Some(decision) if decision == policy => {
                    debug!(decision = %decision, "Model decision accepted");
                    return decision;
                }
                Some(decision) => {
                    warn!(
                        model = %decision,
                        policy = %policy,
                        "Model decision disagrees with workflow progress, using policy"
                    );
                    "disagreement"
                }
                None => {
                    warn!(answer = %raw.trim(), "Unrecognized orchestration answer, using policy");
                    "unrecognized"
                }
            },
            Err(e) => {
                warn!(error = %e, "Orchestration call failed, using policy");
                "call_failed"
            }
        };

        metrics::counter!("workflow.fallbacks", "site" => "orchestrator", "reason" => fallback_reason)
            .increment(1);
        policy
    }

    async fn ask_model(
        &self,
        state: &CampaignState,
    ) -> Result<String, campaign_core::GenerationError> {
        let segments = serde_json::to_string(&state.audience_segments)
            .unwrap_or_else(|_| state.audience_segments.join(", "));
        let content = format!(
            "{} (content for {} of {} segments)",
            !state.content.is_empty(),
            state.content.len(),
            state.audience_segments.len()
        );
        let review = state.review_task.is_some().to_string();

        self.engine
            .invoke(
                &prompts::ORCHESTRATOR,
                &[
                    ("intent_brief", state.intent_brief.as_str()),
                    ("audience_segments", segments.as_str()),
                    ("has_content", content.as_str()),
                    ("has_review", review.as_str()),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::generation::GenerationError;
    use campaign_core::types::{Channel, ContentPiece, ReviewStatus, ReviewTask};
    use campaign_llm::ScriptedGenerator;
    use chrono::Utc;
    use std::sync::Arc;

    fn piece(segment: &str) -> ContentPiece {
        ContentPiece {
            segment: segment.to_string(),
            channel: Channel::Email,
            html: "<p>copy</p>".to_string(),
            css: String::new(),
        }
    }

    fn state_with(segments: usize, content: usize, review: bool) -> CampaignState {
        let mut state = CampaignState::new("Launch a new fitness tracker");
        state.audience_segments = (0..segments).map(|i| format!("Segment {i}")).collect();
        state.content = (0..content).map(|i| piece(&format!("Segment {i}"))).collect();
        if review {
            state.review_task = Some(ReviewTask {
                id: "TASK-00000000".to_string(),
                title: "Review".to_string(),
                details: "details".to_string(),
                status: ReviewStatus::Pending,
                created_at: Utc::now(),
            });
        }
        state
    }

    fn llm_orchestrator(answer: &str) -> Orchestrator {
        Orchestrator::new(
            DecisionMode::Llm,
            GenerationEngine::new(Arc::new(ScriptedGenerator::constant(answer))),
        )
    }

    #[test]
    fn empty_segments_generate_audience() {
        assert_eq!(
            decide_deterministic(&state_with(0, 0, false)),
            Decision::Run(StepName::GenerateAudience)
        );
        // Content or a review without segments still means audience first.
        assert_eq!(
            decide_deterministic(&state_with(0, 0, true)),
            Decision::Run(StepName::GenerateAudience)
        );
    }

    #[test]
    fn partial_content_generates_content() {
        for (segments, content) in [(1, 0), (3, 0), (3, 2)] {
            assert_eq!(
                decide_deterministic(&state_with(segments, content, false)),
                Decision::Run(StepName::GenerateContent)
            );
        }
    }

    #[test]
    fn full_content_without_review_creates_review() {
        assert_eq!(
            decide_deterministic(&state_with(3, 3, false)),
            Decision::Run(StepName::CreateReviewTask)
        );
    }

    #[test]
    fn everything_present_is_complete() {
        assert_eq!(decide_deterministic(&state_with(2, 2, true)), Decision::Complete);
    }

    #[test]
    fn parses_known_tokens_only() {
        assert_eq!(
            parse_decision(" 'Generate_Audience' \n"),
            Some(Decision::Run(StepName::GenerateAudience))
        );
        assert_eq!(
            parse_decision("create_review."),
            Some(Decision::Run(StepName::CreateReviewTask))
        );
        assert_eq!(parse_decision("COMPLETE"), Some(Decision::Complete));
        assert_eq!(parse_decision("I think we should generate content"), None);
        assert_eq!(parse_decision(""), None);
    }

    #[tokio::test]
    async fn agreeing_model_answer_is_used() {
        let orchestrator = llm_orchestrator("generate_content");
        let decision = orchestrator.decide(&state_with(2, 0, false)).await;
        assert_eq!(decision, Decision::Run(StepName::GenerateContent));
    }

    #[tokio::test]
    async fn malformed_answer_falls_back_to_policy_not_completion() {
        let orchestrator = llm_orchestrator("let me think about it");
        let decision = orchestrator.decide(&state_with(0, 0, false)).await;
        assert_eq!(decision, Decision::Run(StepName::GenerateAudience));
    }

    #[tokio::test]
    async fn premature_completion_is_overridden() {
        let orchestrator = llm_orchestrator("complete");
        let decision = orchestrator.decide(&state_with(3, 1, false)).await;
        assert_eq!(decision, Decision::Run(StepName::GenerateContent));
    }

    #[tokio::test]
    async fn call_failure_falls_back_to_policy() {
        let orchestrator = Orchestrator::new(
            DecisionMode::Llm,
            GenerationEngine::new(Arc::new(ScriptedGenerator::failing(GenerationError::Http(
                "timeout".into(),
            )))),
        );
        let decision = orchestrator.decide(&state_with(2, 2, false)).await;
        assert_eq!(decision, Decision::Run(StepName::CreateReviewTask));
    }

    #[tokio::test]
    async fn unavailable_backend_uses_policy() {
        let orchestrator = Orchestrator::new(DecisionMode::Llm, GenerationEngine::unavailable());
        assert_eq!(
            orchestrator.decide(&state_with(2, 2, true)).await,
            Decision::Complete
        );
    }
}
