use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// The record threaded through one campaign workflow run.
///
/// Created per request with only `intent_brief` set, then extended in place
/// by the workflow steps. Everything except `next` is append-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CampaignState {
    pub intent_brief: String,
    #[serde(default)]
    pub audience_segments: Vec<String>,
    #[serde(default)]
    pub content: Vec<ContentPiece>,
    #[serde(default)]
    pub review_task: Option<ReviewTask>,
    /// Routing decision of the latest orchestration pass.
    #[serde(skip)]
    pub next: Option<Decision>,
}

impl CampaignState {
    pub fn new(intent_brief: impl Into<String>) -> Self {
        Self {
            intent_brief: intent_brief.into(),
            ..Self::default()
        }
    }

    /// Segments that have no content yet, in segment order.
    pub fn pending_segments(&self) -> &[String] {
        let done = self.content.len().min(self.audience_segments.len());
        &self.audience_segments[done..]
    }

    pub fn has_full_content(&self) -> bool {
        !self.audience_segments.is_empty() && self.content.len() >= self.audience_segments.len()
    }
}

/// Delivery medium for a generated asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Banner,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Banner => "banner",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated asset for one audience segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentPiece {
    /// Segment text, by value.
    pub segment: String,
    pub channel: Channel,
    pub html: String,
    /// Separate stylesheet; only banners carry one.
    #[serde(default)]
    pub css: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewTask {
    /// Fingerprint of the brief; distinct briefs may collide.
    pub id: String,
    pub title: String,
    pub details: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

/// A workflow step the orchestrator can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    GenerateAudience,
    GenerateContent,
    CreateReviewTask,
}

impl StepName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::GenerateAudience => "generate_audience",
            StepName::GenerateContent => "generate_content",
            StepName::CreateReviewTask => "create_review_task",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one orchestration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Run(StepName),
    Complete,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Run(step) => step.fmt(f),
            Decision::Complete => f.write_str("complete"),
        }
    }
}
