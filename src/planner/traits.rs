//! Planner trait for abstracting plan-producing backends
//!
//! Keeps the engine decoupled from any particular LLM API; tests plug in a
//! scripted planner.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::Result;

/// Produces an ordered raw step list from a natural-language prompt
///
/// The output is raw mappings, not validated steps: legacy action spellings
/// are allowed here and resolved by the normalizer. A backend that cannot
/// produce a parseable step array fails with `PlanGeneration` carrying the
/// raw model text; it never substitutes an empty plan.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Generate a raw plan from the prompt
    async fn plan(&self, prompt: &str) -> Result<Vec<Value>>;

    /// Get the planner name
    fn name(&self) -> &str;
}
