//! Plan module - step vocabulary, normalization, and site heuristics
//!
//! Everything between the planner's raw output and the execution engine.

pub mod heuristics;
pub mod normalizer;
pub mod step;

pub use normalizer::normalize;
pub use step::Step;
