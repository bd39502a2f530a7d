pub mod config;
pub mod error;
pub mod generation;
pub mod types;

pub use config::AppConfig;
pub use error::{CampaignError, CampaignResult};
pub use generation::{GenerationError, TextGenerator};
pub use types::{CampaignState, Channel, ContentPiece, Decision, ReviewStatus, ReviewTask, StepName};
