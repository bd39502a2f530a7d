//! Concrete text-generation backends.
//!
//! Each module implements [`campaign_core::generation::TextGenerator`]: a
//! remote model vendor (Gemini) or an offline scripted responder.

pub mod gemini;
pub mod scripted;
