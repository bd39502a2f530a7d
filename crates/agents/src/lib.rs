//! Campaign workflow: orchestrator, generation steps and the engine that
//! drives them to completion.

pub mod orchestrator;
pub mod steps;
pub mod workflow;

pub use orchestrator::Orchestrator;
pub use workflow::WorkflowEngine;
