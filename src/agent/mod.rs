//! Agent module - the prompt-to-report pipeline

pub mod pipeline;

pub use pipeline::Agent;
