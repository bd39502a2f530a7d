//! create_review_task: opens the human review task for the generated assets.

use campaign_core::types::{CampaignState, ReviewStatus, ReviewTask};
use chrono::Utc;
use sha2::{Digest, Sha256};

/// Hex characters of the brief digest kept in the task id.
const FINGERPRINT_LEN: usize = 8;

/// Characters of the brief shown in the task title.
const TITLE_BRIEF_CHARS: usize = 50;

/// Short, stable fingerprint of a brief. Identical briefs share an id and
/// distinct briefs can collide.
pub fn brief_fingerprint(intent_brief: &str) -> String {
    let digest = hex::encode(Sha256::digest(intent_brief.as_bytes()));
    format!("TASK-{}", &digest[..FINGERPRINT_LEN])
}

pub fn create_review_task(state: &CampaignState) -> ReviewTask {
    let brief_head: String = state.intent_brief.chars().take(TITLE_BRIEF_CHARS).collect();
    ReviewTask {
        id: brief_fingerprint(&state.intent_brief),
        title: format!("Review campaign: {brief_head}..."),
        details: format!(
            "Review {} content pieces for different audience segments",
            state.content.len()
        ),
        status: ReviewStatus::Pending,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::{Channel, ContentPiece};

    #[test]
    fn fingerprint_is_stable_and_fixed_width() {
        let a = brief_fingerprint("Launch a new fitness tracker");
        let b = brief_fingerprint("Launch a new fitness tracker");
        let c = brief_fingerprint("Spring sale");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), "TASK-".len() + FINGERPRINT_LEN);
        assert!(a.starts_with("TASK-"));
    }

    #[test]
    fn details_count_content_pieces() {
        let mut state = CampaignState::new("Launch a new fitness tracker");
        state.audience_segments = vec!["Runners".into(), "Cyclists".into()];
        for segment in &state.audience_segments.clone() {
            state.content.push(ContentPiece {
                segment: segment.clone(),
                channel: Channel::Email,
                html: "<p>copy</p>".into(),
                css: String::new(),
            });
        }

        let task = create_review_task(&state);
        assert_eq!(task.details, "Review 2 content pieces for different audience segments");
        assert_eq!(task.status, ReviewStatus::Pending);
        assert_eq!(task.title, "Review campaign: Launch a new fitness tracker...");
    }

    #[test]
    fn long_briefs_are_cut_on_char_boundaries() {
        let brief = "é".repeat(80);
        let state = CampaignState::new(brief);
        let task = create_review_task(&state);
        assert_eq!(task.title, format!("Review campaign: {}...", "é".repeat(50)));
    }
}
