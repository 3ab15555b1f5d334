//! webstep - natural-language browser automation
//!
//! Turns a free-text request into an ordered list of browser actions via an
//! LLM planner, normalizes them into canonical steps, and executes them
//! against a live page, returning structured logs and extracted data.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Plan**: Step vocabulary, normalizer, and per-site selector heuristics
//! - **Planner**: LLM boundary producing raw step lists from prompts
//! - **Browser**: Session capability traits and the agent-browser driver
//! - **Engine**: Sequential step dispatch with guaranteed session teardown
//! - **Agent**: Pipeline composing planner, normalizer, and engine
//!
//! # Usage
//!
//! ```rust,no_run
//! use webstep::Agent;
//!
//! #[tokio::main]
//! async fn main() {
//!     let agent = Agent::new();
//!     let report = agent
//!         .run_prompt("Get the top 5 stories from Hacker News")
//!         .await
//!         .unwrap();
//!     println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! }
//! ```

pub mod agent;
pub mod browser;
pub mod core;
pub mod engine;
pub mod plan;
pub mod planner;

// Re-export commonly used items
pub use agent::Agent;
pub use core::{Config, Result, RunReport, WebstepError};
pub use engine::Engine;
pub use plan::Step;
