pub mod backends;
pub mod engine;
pub mod parsers;
pub mod prompts;
pub mod templates;

pub use backends::gemini::GeminiGenerator;
pub use backends::scripted::ScriptedGenerator;
pub use engine::GenerationEngine;
pub use templates::{PromptEngine, PromptTemplate};
