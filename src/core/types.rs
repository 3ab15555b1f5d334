//! Shared types used across webstep modules
//!
//! Contains the run report returned to callers and the extracted-item shape.

use serde::{Deserialize, Serialize};

use crate::core::error::WebstepError;

/// One element captured by an `extract_list` step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedItem {
    /// Visible text content, if any
    pub text: Option<String>,
    /// Link target, if the element carries one
    pub href: Option<String>,
}

impl ExtractedItem {
    /// Create an item with both fields set
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            href: Some(href.into()),
        }
    }

    /// Create a text-only item
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            href: None,
        }
    }
}

/// Why a run stopped early
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFailure {
    /// Stable taxonomy kind (e.g. "step_execution", "session_acquisition")
    pub error: String,
    /// Human-readable message from the failing call
    pub message: String,
}

impl From<&WebstepError> for RunFailure {
    fn from(err: &WebstepError) -> Self {
        Self {
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Result of executing one plan
///
/// Owned exclusively by the caller after return; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Chronological log, one or two entries per dispatched step
    pub log: Vec<String>,
    /// Items captured by the last `extract_list` step
    pub extracted: Vec<ExtractedItem>,
    /// Base64 image from the last `screenshot` step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    /// Present when the run stopped before completing every step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<RunFailure>,
}

impl RunReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            extracted: Vec::new(),
            screenshot: None,
            failure: None,
        }
    }

    /// Whether the run completed every step
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Append a log entry
    pub fn push_log(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
    }

    /// Record the failure that stopped the run
    pub fn set_failure(&mut self, err: &WebstepError) {
        self.failure = Some(RunFailure::from(err));
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
