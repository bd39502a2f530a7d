//! Generation steps. Each step reads the campaign state and returns a
//! [`StepOutput`]; the workflow engine merges it back into the state.

pub mod audience;
pub mod content;
pub mod review;

pub use audience::AudienceStep;
pub use content::ContentStep;
pub use review::create_review_task;

use campaign_core::types::{CampaignState, ContentPiece, ReviewTask};
use tracing::warn;

/// The artifact produced by one step execution.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutput {
    Audience(Vec<String>),
    Content(Vec<ContentPiece>),
    Review(ReviewTask),
}

impl StepOutput {
    /// Merge into `state`, keeping it append-only: segments and the review
    /// task are written once, content never outgrows the segment list.
    pub fn merge_into(self, state: &mut CampaignState) {
        match self {
            StepOutput::Audience(segments) => {
                if state.audience_segments.is_empty() {
                    state.audience_segments = segments;
                } else {
                    warn!("Audience segments already set, ignoring regenerated list");
                }
            }
            StepOutput::Content(pieces) => {
                let room = state
                    .audience_segments
                    .len()
                    .saturating_sub(state.content.len());
                if pieces.len() > room {
                    warn!(
                        produced = pieces.len(),
                        room, "More content than pending segments, truncating"
                    );
                }
                state.content.extend(pieces.into_iter().take(room));
            }
            StepOutput::Review(task) => {
                if state.review_task.is_none() {
                    state.review_task = Some(task);
                } else {
                    warn!("Review task already exists, ignoring new task");
                }
            }
        }
    }
}
