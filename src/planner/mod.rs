//! Planner module - the external plan-producing boundary
//!
//! Turns a natural-language prompt into a raw step list via an LLM backend.

pub mod ollama;
pub mod traits;

pub use ollama::OllamaPlanner;
pub use traits::Planner;
