//! Ollama planner implementation
//!
//! Async HTTP client for the Ollama chat API. One request, one documented
//! response shape; any other shape is a hard decode failure rather than a
//! cascade of structural guesses.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::core::{Config, Result, WebstepError};
use crate::planner::traits::Planner;

/// System instructions pinning the canonical step format
const PLANNER_INSTRUCTIONS: &str = r#"You are a planning assistant.
Return ONLY a JSON array of steps. No explanation.

Each step must be in one of these formats:
- { "action": "open_page", "url": "https://..." }
- { "action": "click", "selector": "CSS_SELECTOR" }
- { "action": "type", "selector": "CSS_SELECTOR", "text": "TEXT" }
- { "action": "wait", "duration_ms": N }
- { "action": "extract_list", "selector": "CSS_SELECTOR", "limit": N }
- { "action": "screenshot" }"#;

/// Ollama-backed planner
#[derive(Clone)]
pub struct OllamaPlanner {
    client: Client,
    base_url: String,
    model: String,
    debug: bool,
}

/// Ollama chat request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

/// Message in a chat request
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// The one expected response shape
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

/// Message in a chat response
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaPlanner {
    /// Create a planner from configuration
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.planner.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.planner_url(),
            model: config.planner.model.clone(),
            debug: config.run.debug,
        }
    }

    /// Create a planner with a custom base URL and model
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            debug: false,
        }
    }

    /// Debug print if enabled
    fn debug_print(&self, label: &str, content: &str) {
        if self.debug {
            if content.len() > 500 {
                eprintln!("DEBUG {}: {}...", label, &content[..500]);
            } else {
                eprintln!("DEBUG {}: {}", label, content);
            }
        }
    }
}

#[async_trait]
impl Planner for OllamaPlanner {
    async fn plan(&self, prompt: &str) -> Result<Vec<Value>> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: PLANNER_INSTRUCTIONS,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    WebstepError::plan_generation(
                        format!(
                            "Cannot connect to planner at {}. Is Ollama running?",
                            self.base_url
                        ),
                        String::new(),
                    )
                } else {
                    WebstepError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WebstepError::plan_generation(
                format!("Planner returned HTTP {}", status),
                body,
            ));
        }

        let body = response.text().await?;
        self.debug_print("Planner response", &body);

        let decoded: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            WebstepError::plan_generation(format!("Unexpected response shape: {}", e), body.clone())
        })?;

        decode_plan(&decoded.message.content)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Decode the model's text output into a raw step array
///
/// Accepts a bare JSON array, optionally wrapped in a markdown code fence.
/// Anything else fails with the raw text preserved for diagnosis.
pub fn decode_plan(text: &str) -> Result<Vec<Value>> {
    let trimmed = strip_code_fence(text.trim());

    let value: Value = serde_json::from_str(trimmed).map_err(|e| {
        WebstepError::plan_generation(format!("Output is not valid JSON: {}", e), text.to_string())
    })?;

    match value {
        Value::Array(steps) => Ok(steps),
        _ => Err(WebstepError::plan_generation(
            "Output is not a JSON array",
            text.to_string(),
        )),
    }
}

/// Strip a surrounding markdown code fence, if present
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag on the opening fence line
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    rest.strip_suffix("```").map(str::trim).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bare_array() {
        let plan = decode_plan(r#"[{"action": "screenshot"}]"#).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_decode_fenced_array() {
        let text = "```json\n[{\"action\": \"wait\", \"duration_ms\": 100}]\n```";
        let plan = decode_plan(text).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0]["action"], "wait");
    }

    #[test]
    fn test_decode_prose_fails_with_raw_preserved() {
        let text = "Sure! Here is a plan for you:";
        let err = decode_plan(text).unwrap_err();
        match err {
            WebstepError::PlanGeneration { raw, .. } => assert_eq!(raw, text),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_non_array_json_fails() {
        let err = decode_plan(r#"{"action": "screenshot"}"#).unwrap_err();
        match err {
            WebstepError::PlanGeneration { message, .. } => {
                assert!(message.contains("not a JSON array"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty_array_is_allowed() {
        // An explicit empty plan is valid; only unparseable output fails.
        assert!(decode_plan("[]").unwrap().is_empty());
    }
}
