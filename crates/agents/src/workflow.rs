//! Workflow engine: runs the orchestrator → step loop for one brief until the
//! orchestrator reports completion.

use campaign_cdp::GroundingService;
use campaign_core::config::AppConfig;
use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::types::{CampaignState, Decision, StepName};
use campaign_llm::GenerationEngine;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::orchestrator::Orchestrator;
use crate::steps::{create_review_task, AudienceStep, ContentStep, StepOutput};

/// Shared by all requests; each [`run`](Self::run) owns its own state.
pub struct WorkflowEngine {
    orchestrator: Orchestrator,
    audience: AudienceStep,
    content: ContentStep,
    max_steps: usize,
}

impl WorkflowEngine {
    pub fn new(
        orchestrator: Orchestrator,
        audience: AudienceStep,
        content: ContentStep,
        max_steps: usize,
    ) -> Self {
        Self {
            orchestrator,
            audience,
            content,
            max_steps,
        }
    }

    /// Build the generation backend and optional grounding from `config`.
    /// A grounding source that cannot be set up disables grounding rather
    /// than failing startup.
    pub fn build(config: &AppConfig) -> CampaignResult<Self> {
        let generation = GenerationEngine::from_config(&config.llm)?;
        let grounding = GroundingService::from_config(&config.grounding).unwrap_or_else(|e| {
            warn!(error = %e, "Customer data grounding disabled");
            None
        });
        info!(
            provider = generation.provider_name(),
            grounded = grounding.is_some(),
            max_steps = config.workflow.max_steps,
            "Workflow engine ready"
        );
        Ok(Self::from_config(config, generation, grounding))
    }

    pub fn from_config(
        config: &AppConfig,
        engine: GenerationEngine,
        grounding: Option<GroundingService>,
    ) -> Self {
        let workflow = &config.workflow;
        Self::new(
            Orchestrator::new(workflow.decision_mode, engine.clone()),
            AudienceStep::new(engine.clone(), grounding, workflow.max_segments),
            ContentStep::new(engine, workflow.channel_routing, workflow.default_channel),
            workflow.max_steps,
        )
    }

    /// Run the full workflow for `intent_brief` and return the final state.
    pub async fn run(&self, intent_brief: &str) -> CampaignResult<CampaignState> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("campaign_run", %run_id);
        self.drive(CampaignState::new(intent_brief))
            .instrument(span)
            .await
    }

    async fn drive(&self, mut state: CampaignState) -> CampaignResult<CampaignState> {
        let start = std::time::Instant::now();
        metrics::counter!("workflow.runs").increment(1);
        info!(brief_chars = state.intent_brief.chars().count(), "Campaign run started");

        // `max_steps` bounds executed steps; the completing decision is free.
        let mut executed = 0;
        loop {
            let decision = self.orchestrator.decide(&state).await;
            state.next = Some(decision);
            debug!(step = executed, decision = %decision, "Orchestrator decided");

            let name = match decision {
                Decision::Complete => {
                    metrics::histogram!("workflow.duration_ms")
                        .record(start.elapsed().as_millis() as f64);
                    info!(
                        steps = executed,
                        segments = state.audience_segments.len(),
                        content = state.content.len(),
                        "Campaign run completed"
                    );
                    return Ok(state);
                }
                Decision::Run(name) => name,
            };

            if executed == self.max_steps {
                metrics::counter!("workflow.aborted").increment(1);
                return Err(CampaignError::Workflow(format!(
                    "workflow did not complete within {} steps, next was {name}",
                    self.max_steps
                )));
            }

            metrics::counter!("workflow.steps", "step" => name.as_str()).increment(1);
            let output = self.execute(name, &state).await;
            output.merge_into(&mut state);
            executed += 1;
        }
    }

    async fn execute(&self, name: StepName, state: &CampaignState) -> StepOutput {
        match name {
            StepName::GenerateAudience => {
                StepOutput::Audience(self.audience.run(&state.intent_brief).await)
            }
            StepName::GenerateContent => StepOutput::Content(self.content.run(state).await),
            StepName::CreateReviewTask => StepOutput::Review(create_review_task(state)),
        }
    }
}
