//! Agent pipeline
//!
//! Composes the planner, normalizer, heuristics, and engine into the two
//! entry points callers use: run a natural-language prompt, or run a raw
//! plan submitted directly. Planning and normalization errors propagate
//! before any browsing session is opened.

use serde_json::Value;

use crate::browser::cli::CliSessionProvider;
use crate::browser::session::SessionProvider;
use crate::core::{Config, Result, RunReport};
use crate::engine::Engine;
use crate::plan::{heuristics, normalize};
use crate::planner::{OllamaPlanner, Planner};

/// Top-level pipeline from prompt to run report
pub struct Agent {
    config: Config,
    planner: Box<dyn Planner>,
    engine: Engine,
}

impl Agent {
    /// Create an agent with default configuration
    pub fn new() -> Self {
        Self::with_config(Config::load())
    }

    /// Create an agent with custom configuration
    pub fn with_config(config: Config) -> Self {
        let planner = Box::new(OllamaPlanner::from_config(&config));
        let provider = CliSessionProvider::new(config.browser.clone());
        Self::with_parts(config, planner, Box::new(provider))
    }

    /// Create an agent with an explicit planner and session provider
    ///
    /// This is the seam tests use to plug in scripted backends.
    pub fn with_parts(
        config: Config,
        planner: Box<dyn Planner>,
        provider: Box<dyn SessionProvider>,
    ) -> Self {
        let mut engine = Engine::new(provider);
        engine.set_debug(config.run.debug);

        Self {
            config,
            planner,
            engine,
        }
    }

    /// Plan from a prompt, then execute
    pub async fn run_prompt(&self, prompt: &str) -> Result<RunReport> {
        let raw = self.planner.plan(prompt).await?;

        if self.config.run.debug {
            eprintln!(
                "DEBUG: planner '{}' produced {} raw step(s)",
                self.planner.name(),
                raw.len()
            );
        }

        self.run_plan(&raw).await
    }

    /// Normalize and execute a raw plan submitted directly
    pub async fn run_plan(&self, raw: &[Value]) -> Result<RunReport> {
        let mut plan = normalize(raw)?;

        if self.config.run.site_heuristics {
            heuristics::apply(&mut plan);
        }

        if self.config.run.debug {
            eprintln!("DEBUG: executing {} canonical step(s)", plan.len());
        }

        Ok(self.engine.run(&plan).await)
    }

    /// Get current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}
