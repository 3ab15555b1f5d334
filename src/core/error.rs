//! Custom error types for webstep
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for webstep operations
#[derive(Error, Debug)]
pub enum WebstepError {
    /// A raw step is missing a required field or carries an out-of-range value
    #[error("Malformed step: field '{field}': {reason}")]
    MalformedStep { field: String, reason: String },

    /// A step's action kind is not recognized after legacy renaming
    #[error("Unsupported action kind: '{0}'")]
    UnsupportedAction(String),

    /// The browsing session could not be started
    #[error("Session acquisition failed: {0}")]
    SessionAcquisition(String),

    /// A dispatched capability call failed (navigation, selector, timeout)
    #[error("Step execution failed: {0}")]
    StepExecution(String),

    /// The external planner did not produce a parseable plan
    #[error("Plan generation failed: {message}")]
    PlanGeneration { message: String, raw: String },

    /// Browser driver plumbing errors below step granularity
    #[error("Browser error: {0}")]
    Browser(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,
}

/// Convenience Result type for webstep operations
pub type Result<T> = std::result::Result<T, WebstepError>;

impl WebstepError {
    /// Create a malformed-step error naming the offending field
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedStep {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a session acquisition error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::SessionAcquisition(msg.into())
    }

    /// Create a step execution error
    pub fn step(msg: impl Into<String>) -> Self {
        Self::StepExecution(msg.into())
    }

    /// Create a plan generation error carrying the raw model output
    pub fn plan_generation(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::PlanGeneration {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable taxonomy name for this error, used in serialized run reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedStep { .. } => "malformed_step",
            Self::UnsupportedAction(_) => "unsupported_action",
            Self::SessionAcquisition(_) => "session_acquisition",
            Self::StepExecution(_) => "step_execution",
            Self::PlanGeneration { .. } => "plan_generation",
            Self::Browser(_) => "browser",
            Self::Config(_) => "config",
            Self::Json(_) => "json",
            Self::Http(_) => "http",
            Self::Io(_) => "io",
            Self::AgentBrowserNotFound => "session_acquisition",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let err = WebstepError::malformed("timeout_ms", "must be > 0");
        assert_eq!(err.kind(), "malformed_step");
        assert!(err.to_string().contains("timeout_ms"));

        let err = WebstepError::UnsupportedAction("hover".to_string());
        assert_eq!(err.kind(), "unsupported_action");

        let err = WebstepError::plan_generation("not an array", "sure, here's a plan");
        assert_eq!(err.kind(), "plan_generation");
    }

    #[test]
    fn test_agent_browser_missing_maps_to_acquisition() {
        assert_eq!(
            WebstepError::AgentBrowserNotFound.kind(),
            "session_acquisition"
        );
    }
}
